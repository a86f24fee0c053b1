//! Inventory domain module.
//!
//! A single-warehouse stock ledger: products keyed by id, quantity changes
//! through shipments and order fulfillment, and a synchronous low-stock hook
//! for registered observers. Pure in-process logic (no IO, no storage).

pub mod alert;
pub mod error;
pub mod observer;
pub mod product;
pub mod warehouse;

pub use alert::{LowStockAlert, PublishingObserver};
pub use error::WarehouseError;
pub use observer::StockObserver;
pub use product::Product;
pub use stockwatch_core::ProductId;
pub use warehouse::{FulfillmentOutcome, StockChange, Warehouse};
