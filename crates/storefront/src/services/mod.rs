//! Backend collaborator traits and in-memory implementations.

pub mod accounts;
pub mod catalog;
pub mod orders;

pub use accounts::{AccountService, InMemoryAccountService, MIN_PASSWORD_LEN, ProfileUpdate, UserProfile};
pub use catalog::{CatalogService, InMemoryCatalogService};
pub use orders::{InMemoryOrderService, OrderService};
