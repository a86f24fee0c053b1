//! Low-stock alerts as domain events.
//!
//! [`PublishingObserver`] turns the synchronous observer callback into a
//! [`LowStockAlert`] on an [`EventBus`], so consumers outside the fulfilling
//! call chain (other threads, a reporting step at shutdown) can pick alerts up
//! from a subscription.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use stockwatch_core::ProductId;
use stockwatch_events::{Event, EventBus};

use crate::observer::StockObserver;
use crate::product::Product;

/// Snapshot of a product at the moment a fulfillment left it below its
/// reorder threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockAlert {
    pub alert_id: Uuid,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u64,
    pub reorder_threshold: u64,
    pub occurred_at: DateTime<Utc>,
}

impl LowStockAlert {
    pub fn from_product(product: &Product, occurred_at: DateTime<Utc>) -> Self {
        Self {
            alert_id: Uuid::now_v7(),
            product_id: product.id().clone(),
            product_name: product.name().to_string(),
            quantity: product.quantity(),
            reorder_threshold: product.reorder_threshold(),
            occurred_at,
        }
    }

    /// Units missing to get back to the threshold.
    pub fn shortfall(&self) -> u64 {
        self.reorder_threshold.saturating_sub(self.quantity)
    }
}

impl Event for LowStockAlert {
    fn event_type(&self) -> &'static str {
        "inventory.product.low_stock"
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

/// Observer that publishes every low-stock callback as a [`LowStockAlert`].
///
/// Publishing failures are logged and swallowed: a broken bus must not fail
/// the fulfillment that triggered the alert.
#[derive(Debug)]
pub struct PublishingObserver<B> {
    bus: B,
}

impl<B> PublishingObserver<B>
where
    B: EventBus<LowStockAlert>,
{
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }
}

impl<B> StockObserver for PublishingObserver<B>
where
    B: EventBus<LowStockAlert>,
{
    fn on_low_stock(&self, product: &Product) {
        let alert = LowStockAlert::from_product(product, Utc::now());
        if let Err(e) = self.bus.publish(alert) {
            error!(product_id = %product.id(), error = %e, "Failed to publish low-stock alert");
        }
    }
}
