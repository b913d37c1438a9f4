//! Cart domain events.

use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::aggregate::DomainEvent;

use super::CartItem;

/// Events that can occur on a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CartEvent {
    /// A product not yet in the cart was appended.
    ItemAdded(ItemAddedData),

    /// A product already in the cart had its quantity increased.
    QuantityIncreased(QuantityIncreasedData),

    /// A product was removed from the cart.
    ItemRemoved(ItemRemovedData),

    /// The cart was emptied.
    CartCleared,
}

impl DomainEvent for CartEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CartEvent::ItemAdded(_) => "ItemAdded",
            CartEvent::QuantityIncreased(_) => "QuantityIncreased",
            CartEvent::ItemRemoved(_) => "ItemRemoved",
            CartEvent::CartCleared => "CartCleared",
        }
    }
}

/// Data for ItemAdded event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAddedData {
    /// The new line, product snapshot included.
    pub item: CartItem,
}

/// Data for QuantityIncreased event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityIncreasedData {
    pub product_id: ProductId,
    pub old_quantity: u32,
    pub new_quantity: u32,
}

/// Data for ItemRemoved event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRemovedData {
    pub product_id: ProductId,
}

// Event constructors
impl CartEvent {
    /// Creates an ItemAdded event.
    pub fn item_added(item: CartItem) -> Self {
        CartEvent::ItemAdded(ItemAddedData { item })
    }

    /// Creates a QuantityIncreased event.
    pub fn quantity_increased(product_id: ProductId, old_quantity: u32, new_quantity: u32) -> Self {
        CartEvent::QuantityIncreased(QuantityIncreasedData {
            product_id,
            old_quantity,
            new_quantity,
        })
    }

    /// Creates an ItemRemoved event.
    pub fn item_removed(product_id: ProductId) -> Self {
        CartEvent::ItemRemoved(ItemRemovedData { product_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Money, Product};

    #[test]
    fn test_event_types() {
        let item = CartItem::new(Product::new("1", "Mug", Money::from_cents(800), "home"), 1);
        assert_eq!(CartEvent::item_added(item).event_type(), "ItemAdded");
        assert_eq!(
            CartEvent::quantity_increased(ProductId::new("1"), 1, 3).event_type(),
            "QuantityIncreased"
        );
        assert_eq!(
            CartEvent::item_removed(ProductId::new("1")).event_type(),
            "ItemRemoved"
        );
        assert_eq!(CartEvent::CartCleared.event_type(), "CartCleared");
    }

    #[test]
    fn test_serialization_is_tagged() {
        let event = CartEvent::item_removed(ProductId::new("9"));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "ItemRemoved");
        assert_eq!(json["data"]["product_id"], "9");
    }
}
