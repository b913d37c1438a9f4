//! Placed order records.

use chrono::{DateTime, Utc};
use common::{OrderId, OwnerId, ProductId};
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartItem};
use crate::{Money, Product};

/// One line of a placed order: the product fields flattened next to the
/// ordered quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

impl OrderItem {
    /// Returns the product identifier.
    pub fn product_id(&self) -> &ProductId {
        &self.product.id
    }

    /// Returns unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.product.price.times(self.quantity)
    }
}

impl From<&CartItem> for OrderItem {
    fn from(item: &CartItem) -> Self {
        Self {
            product: item.product.clone(),
            quantity: item.quantity,
        }
    }
}

impl From<CartItem> for OrderItem {
    fn from(item: CartItem) -> Self {
        Self {
            product: item.product,
            quantity: item.quantity,
        }
    }
}

/// Flattens every cart line into an order line, keeping cart order.
pub fn order_items(cart: &Cart) -> Vec<OrderItem> {
    cart.items().iter().map(OrderItem::from).collect()
}

/// A placed order. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub owner_id: OwnerId,
    pub items: Vec<OrderItem>,
    /// Total computed at confirmation time; never recomputed.
    pub total_price: Money,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Returns the sum of ordered quantities.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_item_is_flat() {
        let product = Product::new("7", "Ring", Money::from_cents(16800), "jewelery")
            .with_rating(3.9, 70);
        let item = OrderItem::from(&CartItem::new(product, 2));

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], "7");
        assert_eq!(json["title"], "Ring");
        assert_eq!(json["quantity"], 2);
        assert_eq!(json["rating"]["count"], 70);
        assert!(json.get("product").is_none());

        let back: OrderItem = serde_json::from_value(json).unwrap();
        assert_eq!(back, item);
        assert_eq!(back.line_total(), Money::from_cents(33600));
    }

    #[test]
    fn test_order_items_keep_cart_order() {
        let cart = Cart::from_items(vec![
            CartItem::new(Product::new("2", "B", Money::from_cents(100), "x"), 1),
            CartItem::new(Product::new("1", "A", Money::from_cents(100), "x"), 3),
        ]);

        let items = order_items(&cart);
        let ids: Vec<_> = items.iter().map(|i| i.product_id().as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[test]
    fn test_item_count() {
        let order = Order {
            id: OrderId::new(),
            owner_id: OwnerId::user(&common::UserId::new("user-1")),
            items: vec![
                OrderItem::from(CartItem::new(Product::new("1", "A", Money::from_cents(1000), "x"), 2)),
                OrderItem::from(CartItem::new(Product::new("2", "B", Money::from_cents(550), "x"), 3)),
            ],
            total_price: Money::from_cents(3650),
            created_at: Utc::now(),
        };
        assert_eq!(order.item_count(), 5);
    }
}
