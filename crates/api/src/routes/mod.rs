//! HTTP route handlers and the state they share.

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod health;
pub mod metrics;
pub mod orders;
pub mod products;
pub mod profile;

use std::sync::Arc;

use storefront::{
    AccountService, CatalogService, CheckoutOrchestrator, OrderService, ProductManager,
};

use crate::sessions::SessionRegistry;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub sessions: SessionRegistry,
    pub catalog: Arc<dyn CatalogService>,
    pub products: ProductManager<Arc<dyn CatalogService>>,
    pub accounts: Arc<dyn AccountService>,
    pub orders: Arc<dyn OrderService>,
    pub checkout: CheckoutOrchestrator<Arc<dyn OrderService>>,
}

impl AppState {
    /// Wires the state from its collaborators.
    pub fn new(
        sessions: SessionRegistry,
        catalog: Arc<dyn CatalogService>,
        accounts: Arc<dyn AccountService>,
        orders: Arc<dyn OrderService>,
    ) -> Self {
        Self {
            sessions,
            products: ProductManager::new(catalog.clone()),
            catalog,
            accounts,
            checkout: CheckoutOrchestrator::new(orders.clone()),
            orders,
        }
    }
}
