//! Domain layer for the storefront.
//!
//! This crate provides:
//! - `Money` and the catalog `Product` with its admin form `ProductDraft`
//! - the `Cart` aggregate, whose commands return `CartEvent`s
//! - `CartHandler` and `CartService`, the session-bound cart state container
//! - `Order` and `OrderItem`, the records of placed orders

pub mod aggregate;
pub mod cart;
pub mod command;
pub mod error;
pub mod money;
pub mod orders;
pub mod product;

pub use aggregate::{Aggregate, DomainEvent};
pub use cart::{
    Cart, CartError, CartEvent, CartItem, CartService, CartTotals, ItemAddedData,
    ItemRemovedData, QuantityIncreasedData, QuantityLimits,
};
pub use command::{CartHandler, CommandResult};
pub use error::DomainError;
pub use money::Money;
pub use orders::{Order, OrderItem, order_items};
pub use product::{MAX_RATING, Product, ProductDraft, ProductValidationError, Rating};
