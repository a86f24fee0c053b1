use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::warn;

use stockwatch_inventory::{Product, StockObserver};

/// Observer that reports low stock through the log.
#[derive(Debug, Default)]
pub struct AlertService {
    alerts: AtomicUsize,
}

impl AlertService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Alerts raised since construction.
    pub fn alert_count(&self) -> usize {
        self.alerts.load(Ordering::Relaxed)
    }

    pub fn message(product: &Product) -> String {
        format!(
            "Low stock for {} - only {} left!",
            product.name(),
            product.quantity()
        )
    }
}

impl StockObserver for AlertService {
    fn on_low_stock(&self, product: &Product) {
        self.alerts.fetch_add(1, Ordering::Relaxed);
        warn!(
            product_id = %product.id(),
            quantity = product.quantity(),
            reorder_threshold = product.reorder_threshold(),
            "{}",
            Self::message(product)
        );
    }
}
