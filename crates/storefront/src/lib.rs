//! Storefront sessions and checkout.
//!
//! A [`Session`] bundles one shopper's cart, guest identity and signed-in
//! user. The [`CheckoutOrchestrator`] turns a session's cart into an order:
//! 1. Snapshot the cart and compute the total
//! 2. Ask the shopper to confirm
//! 3. Submit a single order to the order backend
//! 4. Clear the cart once the order is recorded
//!
//! Catalog, account and order backends sit behind the traits in [`services`].

pub mod admin;
pub mod checkout;
pub mod confirmation;
pub mod error;
pub mod services;
pub mod session;
pub mod state;

pub use admin::ProductManager;
pub use checkout::{
    CheckoutOrchestrator, CheckoutOutcome, EMPTY_CART_MESSAGE, FAILED_MESSAGE,
    IN_PROGRESS_MESSAGE, PLACED_MESSAGE,
};
pub use confirmation::{
    AlwaysConfirm, AlwaysDecline, CheckoutSummary, ConfirmationPrompt, ConfirmedTotal, Decision,
};
pub use error::{AccountError, CatalogError, OrderServiceError, Result, StorefrontError};
pub use services::{
    AccountService, CatalogService, InMemoryAccountService, InMemoryCatalogService,
    InMemoryOrderService, MIN_PASSWORD_LEN, OrderService, ProfileUpdate, UserProfile,
};
pub use session::{Session, USER_KEY};
pub use state::CheckoutState;
