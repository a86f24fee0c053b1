//! Domain event mechanics: the `Event` contract and a pub/sub bus for
//! distributing events to consumers outside the emitting component.

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
