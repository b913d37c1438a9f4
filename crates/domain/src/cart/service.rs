//! Cart service providing the session-bound cart API.

use std::sync::{Mutex, MutexGuard, PoisonError};

use common::ProductId;
use store::SessionStorage;

use crate::Product;
use crate::aggregate::DomainEvent;
use crate::command::{CartHandler, CommandResult};
use crate::error::DomainError;

use super::{Cart, CartError, CartEvent, CartTotals, QuantityLimits};

/// Service for managing one session's cart.
///
/// Wraps the command handler and keeps the live cart in memory. Each
/// mutation and its persistence run under the same short lock, so readers
/// never observe a cart that differs from the persisted one. The lock is
/// never held across an await point.
pub struct CartService<S> {
    handler: CartHandler<S>,
    cart: Mutex<Cart>,
    limits: QuantityLimits,
}

impl<S: SessionStorage> CartService<S> {
    /// Opens the cart of a session, loading whatever was persisted.
    pub fn open(storage: S, limits: QuantityLimits) -> Self {
        let handler = CartHandler::new(storage);
        let cart = handler.load();

        tracing::debug!(items = cart.len(), "cart loaded from session storage");

        Self {
            handler,
            cart: Mutex::new(cart),
            limits,
        }
    }

    /// Returns a reference to the underlying command handler.
    pub fn handler(&self) -> &CartHandler<S> {
        &self.handler
    }

    /// Returns the per-add quantity bounds.
    pub fn limits(&self) -> QuantityLimits {
        self.limits
    }

    /// Adds `quantity` of `product` to the cart.
    #[tracing::instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_to_cart(
        &self,
        product: Product,
        quantity: u32,
    ) -> Result<CommandResult, DomainError> {
        let limits = self.limits;
        self.execute("add", |cart| cart.add_to_cart(product, quantity, &limits))
    }

    /// Removes a product from the cart. Absent products are ignored.
    #[tracing::instrument(skip(self))]
    pub fn remove_from_cart(&self, product_id: &ProductId) -> Result<CommandResult, DomainError> {
        self.execute("remove", |cart| Ok(cart.remove_from_cart(product_id)))
    }

    /// Empties the cart and removes its persisted copy.
    #[tracing::instrument(skip(self))]
    pub fn clear_cart(&self) -> Result<CommandResult, DomainError> {
        self.execute("clear", |cart| Ok(cart.clear_cart()))
    }

    /// Returns a copy of the current cart.
    pub fn snapshot(&self) -> Cart {
        self.lock().clone()
    }

    /// Returns the current item count and total price.
    pub fn totals(&self) -> CartTotals {
        self.lock().totals()
    }

    /// Returns true if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn execute<F>(&self, operation: &'static str, command_fn: F) -> Result<CommandResult, DomainError>
    where
        F: FnOnce(&Cart) -> Result<Vec<CartEvent>, CartError>,
    {
        let mut cart = self.lock();
        let result = self.handler.execute(&mut cart, command_fn);
        drop(cart);

        match &result {
            Ok(outcome) => {
                for event in &outcome.events {
                    tracing::debug!(event_type = event.event_type(), "cart event applied");
                }
                metrics::counter!("cart_mutations_total", "operation" => operation, "status" => "ok")
                    .increment(1);
            }
            Err(e) => {
                tracing::debug!(error = %e, operation, "cart command rejected");
                metrics::counter!("cart_mutations_total", "operation" => operation, "status" => "rejected")
                    .increment(1);
            }
        }

        result
    }

    fn lock(&self) -> MutexGuard<'_, Cart> {
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
