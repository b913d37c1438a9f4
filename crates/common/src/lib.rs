//! Identifier types shared across the storefront crates.

pub mod types;

pub use types::{GuestId, OrderId, OwnerId, ProductId, UserId};
