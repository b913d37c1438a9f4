//! The shopping cart: items, pure transitions and the session-bound container.

mod aggregate;
mod events;
mod item;
mod limits;
mod service;

pub use aggregate::{Cart, CartTotals};
pub use events::{CartEvent, ItemAddedData, ItemRemovedData, QuantityIncreasedData};
pub use item::CartItem;
pub use limits::{DEFAULT_MAX_PER_ADD, QuantityLimits};
pub use service::CartService;

use common::ProductId;
use thiserror::Error;

/// Errors that can occur during cart operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Quantities must be positive.
    #[error("Invalid quantity: {quantity} (must be greater than 0)")]
    InvalidQuantity { quantity: u32 },

    /// A single add exceeded the configured per-add bound.
    #[error("Quantity {quantity} is above the limit of {max} per add")]
    QuantityAboveLimit { quantity: u32, max: u32 },

    /// Merging would overflow the line quantity.
    #[error("Quantity overflow for product {product_id}")]
    QuantityOverflow { product_id: ProductId },
}
