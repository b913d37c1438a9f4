//! Command handling infrastructure.

use store::{PersistentCartStore, SessionStorage};

use crate::aggregate::Aggregate;
use crate::cart::{Cart, CartError, CartEvent, CartItem};
use crate::error::DomainError;

/// Result of command execution.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// The cart after applying the new events.
    pub cart: Cart,

    /// The events that were generated and persisted.
    pub events: Vec<CartEvent>,
}

/// Handler for executing commands against a cart.
///
/// The handler is responsible for:
/// 1. Loading the cart from session storage
/// 2. Executing the command to produce events
/// 3. Applying the events to the in-memory cart
/// 4. Mirroring the result into session storage
pub struct CartHandler<S> {
    store: PersistentCartStore<S, CartItem>,
}

impl<S: SessionStorage> CartHandler<S> {
    /// Creates a new command handler over the given session storage.
    pub fn new(storage: S) -> Self {
        Self {
            store: PersistentCartStore::new(storage),
        }
    }

    /// Returns a reference to the underlying cart store.
    pub fn store(&self) -> &PersistentCartStore<S, CartItem> {
        &self.store
    }

    /// Loads the persisted cart.
    ///
    /// Missing or unreadable data yields an empty cart.
    pub fn load(&self) -> Cart {
        Cart::from_items(self.store.load())
    }

    /// Executes a command against `cart` and persists the outcome.
    ///
    /// The command function receives the current cart and returns either the
    /// events to apply or an error. On error the cart and the persisted copy
    /// are left untouched.
    pub fn execute<F>(&self, cart: &mut Cart, command_fn: F) -> Result<CommandResult, DomainError>
    where
        F: FnOnce(&Cart) -> Result<Vec<CartEvent>, CartError>,
    {
        let events = command_fn(cart)?;

        if events.is_empty() {
            return Ok(CommandResult {
                cart: cart.clone(),
                events,
            });
        }

        cart.apply_events(events.iter().cloned());
        self.persist(cart, &events);

        Ok(CommandResult {
            cart: cart.clone(),
            events,
        })
    }

    /// Mirrors the cart after `events` were applied.
    ///
    /// A clear removes the slot; anything else overwrites it with the full cart.
    fn persist(&self, cart: &Cart, events: &[CartEvent]) {
        if events.iter().any(|e| matches!(e, CartEvent::CartCleared)) {
            self.store.clear();
        } else {
            self.store.save(cart.items());
        }
    }
}
