use std::collections::HashMap;
use std::sync::{Arc, Weak};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use stockwatch_core::ProductId;

use crate::error::WarehouseError;
use crate::observer::StockObserver;
use crate::product::Product;

/// Quantity movement produced by a successful operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockChange {
    pub product_id: ProductId,
    pub previous_quantity: u64,
    pub quantity: u64,
}

/// Result of a successful fulfillment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FulfillmentOutcome {
    pub change: StockChange,
    /// The resulting quantity was below the reorder threshold, so a
    /// notification round ran.
    pub low_stock_notified: bool,
    /// Live observers invoked during that round.
    pub observers_notified: usize,
}

/// Single source of truth for on-hand quantities.
///
/// Not synchronised: wrap it in a `Mutex` (or own it from one task) when it
/// has to be shared across threads.
///
/// Observers are held weakly. The warehouse never keeps an observer alive;
/// once its last `Arc` is dropped it is skipped and removed on the next
/// notification round.
#[derive(Default)]
pub struct Warehouse {
    inventory: HashMap<ProductId, Product>,
    observers: Vec<Weak<dyn StockObserver>>,
}

impl Warehouse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer. Notification order is registration order;
    /// registering the same observer twice notifies it twice.
    pub fn add_observer<O>(&mut self, observer: &Arc<O>)
    where
        O: StockObserver + 'static,
    {
        let concrete: Arc<O> = Arc::clone(observer);
        let shared: Arc<dyn StockObserver> = concrete;
        self.add_shared_observer(&shared);
    }

    /// Register an observer already held as a trait object.
    pub fn add_shared_observer(&mut self, observer: &Arc<dyn StockObserver>) {
        self.observers.push(Arc::downgrade(observer));
    }

    /// Insert a product keyed by its id.
    ///
    /// Last write wins: an existing record with the same id is replaced and
    /// handed back to the caller.
    pub fn add_product(&mut self, product: Product) -> Option<Product> {
        let replaced = self.inventory.insert(product.id().clone(), product);
        if let Some(old) = &replaced {
            warn!(
                product_id = %old.id(),
                previous_quantity = old.quantity(),
                "Product replaced by add_product"
            );
        }
        replaced
    }

    /// Add `quantity` units of an inbound shipment. Never notifies.
    #[instrument(skip(self, product_id), fields(product_id = %product_id))]
    pub fn receive_shipment(
        &mut self,
        product_id: &ProductId,
        quantity: u64,
    ) -> Result<StockChange, WarehouseError> {
        let product = self
            .inventory
            .get_mut(product_id)
            .ok_or_else(|| WarehouseError::ProductNotFound(product_id.clone()))
            .inspect_err(|e| warn!(error = %e, "Shipment rejected"))?;

        let result = apply_receipt(product, quantity);
        match &result {
            Ok(change) => info!(
                product_name = %product.name(),
                new_quantity = change.quantity,
                "Received shipment"
            ),
            Err(e) => warn!(error = %e, "Shipment rejected"),
        }
        result
    }

    /// Deduct `quantity` units for an outbound order, all or nothing.
    ///
    /// When the resulting quantity is below the product's reorder threshold
    /// every live observer is called, in registration order, before this
    /// returns. This happens on every such fulfillment, including ones that
    /// start out already below the threshold.
    #[instrument(skip(self, product_id), fields(product_id = %product_id))]
    pub fn fulfill_order(
        &mut self,
        product_id: &ProductId,
        quantity: u64,
    ) -> Result<FulfillmentOutcome, WarehouseError> {
        let product = self
            .inventory
            .get_mut(product_id)
            .ok_or_else(|| WarehouseError::ProductNotFound(product_id.clone()))
            .inspect_err(|e| warn!(error = %e, "Order rejected"))?;

        let change = apply_fulfillment(product, quantity)
            .inspect_err(|e| warn!(error = %e, "Order rejected"))?;
        info!(
            product_name = %product.name(),
            new_quantity = change.quantity,
            "Fulfilled order"
        );

        let product: &Product = product;
        let low_stock_notified = product.is_low_stock();
        let observers_notified = if low_stock_notified {
            notify_observers(&mut self.observers, product)
        } else {
            0
        };

        Ok(FulfillmentOutcome {
            change,
            low_stock_notified,
            observers_notified,
        })
    }

    pub fn product(&self, product_id: &ProductId) -> Option<&Product> {
        self.inventory.get(product_id)
    }

    /// All products, ordered by id.
    pub fn products(&self) -> Vec<&Product> {
        let mut products: Vec<&Product> = self.inventory.values().collect();
        products.sort_by(|a, b| a.id().cmp(b.id()));
        products
    }

    /// Products currently below their reorder threshold, ordered by id.
    pub fn low_stock_products(&self) -> Vec<&Product> {
        self.products()
            .into_iter()
            .filter(|p| p.is_low_stock())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inventory.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inventory.is_empty()
    }

    /// Registered observers that are still alive.
    pub fn observer_count(&self) -> usize {
        self.observers.iter().filter(|w| w.strong_count() > 0).count()
    }
}

impl core::fmt::Debug for Warehouse {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Warehouse")
            .field("inventory", &self.inventory)
            .field("observers", &self.observers.len())
            .finish()
    }
}

fn apply_receipt(product: &mut Product, quantity: u64) -> Result<StockChange, WarehouseError> {
    if quantity == 0 {
        return Err(WarehouseError::InvalidQuantity {
            product_id: product.id().clone(),
            requested: quantity,
        });
    }

    let previous_quantity = product.quantity();
    let new_quantity =
        previous_quantity
            .checked_add(quantity)
            .ok_or_else(|| WarehouseError::QuantityOverflow {
                product_id: product.id().clone(),
                current: previous_quantity,
                requested: quantity,
            })?;

    product.set_quantity(new_quantity);
    Ok(StockChange {
        product_id: product.id().clone(),
        previous_quantity,
        quantity: new_quantity,
    })
}

fn apply_fulfillment(product: &mut Product, quantity: u64) -> Result<StockChange, WarehouseError> {
    if quantity == 0 {
        return Err(WarehouseError::InvalidQuantity {
            product_id: product.id().clone(),
            requested: quantity,
        });
    }

    let previous_quantity = product.quantity();
    if quantity > previous_quantity {
        return Err(WarehouseError::InsufficientStock {
            product_id: product.id().clone(),
            requested: quantity,
            available: previous_quantity,
        });
    }

    let new_quantity = previous_quantity - quantity;
    product.set_quantity(new_quantity);
    Ok(StockChange {
        product_id: product.id().clone(),
        previous_quantity,
        quantity: new_quantity,
    })
}

/// Call every live observer in order, pruning dead ones. Returns how many ran.
fn notify_observers(observers: &mut Vec<Weak<dyn StockObserver>>, product: &Product) -> usize {
    let mut notified = 0;
    observers.retain(|weak| match weak.upgrade() {
        Some(observer) => {
            debug!(product_id = %product.id(), quantity = product.quantity(), "Notifying observer");
            observer.on_low_stock(product);
            notified += 1;
            true
        }
        None => false,
    });
    notified
}
