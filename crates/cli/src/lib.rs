//! Command-line front end for the stock ledger.
//!
//! Wires a [`Warehouse`](stockwatch_inventory::Warehouse) to a logging
//! [`AlertService`] and an in-memory alert bus, then replays a command script
//! (or the built-in demo) against it.

pub mod alert_service;
pub mod config;
pub mod script;
pub mod session;

pub use alert_service::AlertService;
pub use config::{Config, ConfigError};
pub use script::{Command, ScriptError, ScriptLine, parse_script};
pub use session::{LineOutcome, Session};

/// Script run when no script path is configured.
pub const DEMO_SCRIPT: &str = "\
# Seed one product, take a delivery, then ship an order that dips below the
# reorder threshold.
add P001 Laptop 0 5
receive P001 10
fulfill P001 6
";
