use serde::Serialize;

use stockwatch_core::{Entity, ProductId};

/// Inventory record for one product.
///
/// Identity, name and threshold are fixed at construction. Quantity is only
/// changed by the [`Warehouse`](crate::Warehouse) that holds the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    id: ProductId,
    name: String,
    quantity: u64,
    reorder_threshold: u64,
}

impl Product {
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        quantity: u64,
        reorder_threshold: u64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            quantity,
            reorder_threshold,
        }
    }

    pub fn id(&self) -> &ProductId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    /// Exclusive lower bound: stock strictly below this is low.
    pub fn reorder_threshold(&self) -> u64 {
        self.reorder_threshold
    }

    pub fn is_low_stock(&self) -> bool {
        self.quantity < self.reorder_threshold
    }

    pub(crate) fn set_quantity(&mut self, quantity: u64) {
        self.quantity = quantity;
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_keeps_fields_as_given() {
        let product = Product::new("P001", "Laptop", 0, 5);
        assert_eq!(product.id().as_str(), "P001");
        assert_eq!(product.name(), "Laptop");
        assert_eq!(product.quantity(), 0);
        assert_eq!(product.reorder_threshold(), 5);
    }

    #[test]
    fn low_stock_is_strictly_below_threshold() {
        let mut product = Product::new("P001", "Laptop", 5, 5);
        assert!(!product.is_low_stock());

        product.set_quantity(4);
        assert!(product.is_low_stock());
    }

    #[test]
    fn zero_threshold_is_never_low() {
        let product = Product::new("P002", "Cable", 0, 0);
        assert!(!product.is_low_stock());
    }

    #[test]
    fn entity_id_matches_accessor() {
        let product = Product::new("P003", "Mouse", 1, 1);
        assert_eq!(Entity::id(&product), product.id());
    }
}
