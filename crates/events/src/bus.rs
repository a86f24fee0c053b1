//! Event publishing/subscription abstraction (mechanics only).
//!
//! The bus is a fan-out channel for events that have already happened. It
//! makes minimal assumptions:
//!
//! - **Transport-agnostic**: in-memory channels today, anything else later
//! - **Broadcast**: each subscriber gets its own copy of every message
//! - **No persistence**: a message published before a subscription exists is
//!   never seen by that subscription

use std::sync::Arc;
use std::sync::mpsc::Receiver;

/// A subscription to an event stream.
///
/// ## Usage Pattern
///
/// ```ignore
/// let bus = InMemoryEventBus::<LowStockAlert>::new();
/// let subscription = bus.subscribe();
///
/// // ... publish ...
///
/// for alert in subscription.drain() {
///     handle(alert);
/// }
/// ```
///
/// Subscriptions are designed for single-threaded consumption.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Collect every message that is already queued, without blocking.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }
}

/// Domain-agnostic event bus (pub/sub abstraction).
///
/// `publish()` can fail (e.g. a poisoned lock); failures are surfaced to the
/// caller, which decides whether they matter.
///
/// The trait requires `Send + Sync`: multiple threads may publish
/// concurrently.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + core::fmt::Display + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
