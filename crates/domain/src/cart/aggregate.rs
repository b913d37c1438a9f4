//! Cart aggregate implementation.

use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::aggregate::Aggregate;
use crate::{Money, Product};

use super::{
    CartError, CartEvent, CartItem, QuantityLimits,
    events::{ItemAddedData, QuantityIncreasedData},
};

/// Item count and price of a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CartTotals {
    /// Sum of quantities.
    pub item_count: u64,

    /// Sum of unit price × quantity, unrounded.
    pub total_price: Money,
}

/// Shopping cart.
///
/// An ordered list of lines, first added first listed, with at most one line
/// per product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Aggregate for Cart {
    type Event = CartEvent;

    fn apply(&mut self, event: Self::Event) {
        match event {
            CartEvent::ItemAdded(data) => self.apply_item_added(data),
            CartEvent::QuantityIncreased(data) => self.apply_quantity_increased(data),
            CartEvent::ItemRemoved(data) => self.items.retain(|i| i.product.id != data.product_id),
            CartEvent::CartCleared => self.items.clear(),
        }
    }
}

// Query methods
impl Cart {
    /// Rebuilds a cart from persisted lines.
    ///
    /// Lines with a zero quantity are dropped and repeated products are merged
    /// into their first occurrence, so a hand-edited or stale mirror cannot
    /// break the one-line-per-product rule.
    pub fn from_items(items: impl IntoIterator<Item = CartItem>) -> Self {
        let mut cart = Cart::default();
        for item in items {
            if item.quantity == 0 {
                continue;
            }
            match cart.position(&item.product.id) {
                Some(idx) => {
                    let line = &mut cart.items[idx];
                    line.quantity = line.quantity.saturating_add(item.quantity);
                }
                None => cart.items.push(item),
            }
        }
        cart
    }

    /// Returns all lines in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Returns the line for a product.
    pub fn get_item(&self, product_id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|i| &i.product.id == product_id)
    }

    /// Returns the number of distinct products.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the sum of quantities.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Returns the sum of line totals at snapshot prices.
    pub fn total_price(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Returns item count and total price together.
    pub fn totals(&self) -> CartTotals {
        CartTotals {
            item_count: self.total_quantity(),
            total_price: self.total_price(),
        }
    }

    /// Consumes the cart, returning its lines.
    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }

    fn position(&self, product_id: &ProductId) -> Option<usize> {
        self.items.iter().position(|i| &i.product.id == product_id)
    }
}

// Command methods (return events)
impl Cart {
    /// Adds `quantity` of `product`.
    ///
    /// A product already in the cart has its quantity increased by `quantity`;
    /// its original snapshot is kept. Otherwise a new line is appended.
    pub fn add_to_cart(
        &self,
        product: Product,
        quantity: u32,
        limits: &QuantityLimits,
    ) -> Result<Vec<CartEvent>, CartError> {
        limits.check(quantity)?;

        match self.get_item(&product.id) {
            Some(existing) => {
                let new_quantity = existing.quantity.checked_add(quantity).ok_or_else(|| {
                    CartError::QuantityOverflow {
                        product_id: product.id.clone(),
                    }
                })?;
                Ok(vec![CartEvent::quantity_increased(
                    product.id,
                    existing.quantity,
                    new_quantity,
                )])
            }
            None => Ok(vec![CartEvent::item_added(CartItem::new(product, quantity))]),
        }
    }

    /// Removes the line for `product_id`.
    ///
    /// Removing a product that is not in the cart produces no events.
    pub fn remove_from_cart(&self, product_id: &ProductId) -> Vec<CartEvent> {
        if self.get_item(product_id).is_some() {
            vec![CartEvent::item_removed(product_id.clone())]
        } else {
            vec![]
        }
    }

    /// Empties the cart. Always produces a CartCleared event so the persisted
    /// mirror is removed even when the cart was already empty.
    pub fn clear_cart(&self) -> Vec<CartEvent> {
        vec![CartEvent::CartCleared]
    }
}

// Apply event helpers
impl Cart {
    fn apply_item_added(&mut self, data: ItemAddedData) {
        match self.position(&data.item.product.id) {
            Some(idx) => self.items[idx].quantity += data.item.quantity,
            None => self.items.push(data.item),
        }
    }

    fn apply_quantity_increased(&mut self, data: QuantityIncreasedData) {
        if let Some(idx) = self.position(&data.product_id) {
            self.items[idx].quantity = data.new_quantity;
        }
    }
}
