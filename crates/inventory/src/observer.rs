//! Low-stock notification sink.

use crate::product::Product;

/// Receives a callback when a fulfillment leaves a product below its
/// reorder threshold.
///
/// Called synchronously on the fulfilling thread, once per triggering
/// fulfillment (so possibly many times for the same product). The fulfillment
/// call does not return until every observer has returned, so implementations
/// must not block for long. The product is borrowed read-only; the warehouse
/// is mutably borrowed for the duration of the call, so an observer cannot
/// re-enter it.
pub trait StockObserver: Send + Sync {
    fn on_low_stock(&self, product: &Product);
}

impl<F> StockObserver for F
where
    F: Fn(&Product) + Send + Sync,
{
    fn on_low_stock(&self, product: &Product) {
        self(product)
    }
}
