use serde::{Deserialize, Serialize};

use super::CartError;

/// Default upper bound for a single add.
pub const DEFAULT_MAX_PER_ADD: u32 = 10;

/// Bounds on the quantity accepted by one add-to-cart.
///
/// The lower bound is always 1. The upper bound is a storefront setting,
/// not a cart invariant: repeated adds may merge past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityLimits {
    max_per_add: u32,
}

impl QuantityLimits {
    /// Creates limits with the given per-add maximum (at least 1).
    pub fn new(max_per_add: u32) -> Self {
        Self {
            max_per_add: max_per_add.max(1),
        }
    }

    /// Returns the per-add maximum.
    pub fn max_per_add(&self) -> u32 {
        self.max_per_add
    }

    /// Checks a requested quantity.
    pub fn check(&self, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity { quantity });
        }
        if quantity > self.max_per_add {
            return Err(CartError::QuantityAboveLimit {
                quantity,
                max: self.max_per_add,
            });
        }
        Ok(())
    }

    /// Returns the selectable quantities, for building a picker.
    pub fn options(&self) -> impl Iterator<Item = u32> {
        1..=self.max_per_add
    }
}

impl Default for QuantityLimits {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PER_ADD)
    }
}
