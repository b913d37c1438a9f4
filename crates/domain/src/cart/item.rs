use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::{Money, Product};

/// One cart line: a product snapshot and how many of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product as it was when first added.
    pub product: Product,

    /// Always at least 1.
    pub quantity: u32,
}

impl CartItem {
    /// Creates a new cart line.
    pub fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }

    /// Returns the product identifier.
    pub fn product_id(&self) -> &ProductId {
        &self.product.id
    }

    /// Returns the snapshot unit price.
    pub fn unit_price(&self) -> Money {
        self.product.price
    }

    /// Returns unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.product.price.times(self.quantity)
    }
}
