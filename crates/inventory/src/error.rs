use thiserror::Error;

use stockwatch_core::ProductId;

/// Recoverable failures of warehouse operations.
///
/// Every variant is returned before any state change: the inventory is
/// untouched and no observer runs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WarehouseError {
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    #[error("insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: u64,
        available: u64,
    },

    #[error("invalid quantity for {product_id}: {requested} (must be positive)")]
    InvalidQuantity { product_id: ProductId, requested: u64 },

    #[error("quantity overflow for {product_id}: {current} + {requested}")]
    QuantityOverflow {
        product_id: ProductId,
        current: u64,
        requested: u64,
    },
}

impl WarehouseError {
    pub fn product_id(&self) -> &ProductId {
        match self {
            WarehouseError::ProductNotFound(id) => id,
            WarehouseError::InsufficientStock { product_id, .. }
            | WarehouseError::InvalidQuantity { product_id, .. }
            | WarehouseError::QuantityOverflow { product_id, .. } => product_id,
        }
    }
}
