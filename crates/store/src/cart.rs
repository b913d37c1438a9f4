use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{SessionSlot, SessionStorage};

/// Session storage key holding the serialized cart.
pub const CART_KEY: &str = "cart";

/// Durable mirror of the in-memory cart.
///
/// Every operation is infallible from the caller's point of view: reads fall
/// back to an empty cart, writes are best-effort and only logged on failure,
/// so storage trouble never blocks a cart mutation.
#[derive(Debug, Clone)]
pub struct PersistentCartStore<S, T> {
    slot: SessionSlot<S, Vec<T>>,
}

impl<S, T> PersistentCartStore<S, T>
where
    S: SessionStorage,
    T: Serialize + DeserializeOwned,
{
    /// Creates a cart store over the given session storage.
    pub fn new(storage: S) -> Self {
        Self {
            slot: SessionSlot::new(storage, CART_KEY),
        }
    }

    /// Returns a reference to the underlying storage.
    pub fn storage(&self) -> &S {
        self.slot.storage()
    }

    /// Loads the persisted cart.
    ///
    /// An absent, empty or unparsable slot yields an empty cart.
    pub fn load(&self) -> Vec<T> {
        match self.slot.read() {
            Ok(Some(items)) => items,
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::debug!(error = %e, "discarding unreadable persisted cart");
                Vec::new()
            }
        }
    }

    /// Overwrites the persisted cart with `items`.
    pub fn save(&self, items: &[T]) {
        let result = serde_json::to_string(items)
            .map_err(Into::into)
            .and_then(|raw| self.slot.storage().set(CART_KEY, &raw));

        if let Err(e) = result {
            tracing::warn!(error = %e, items = items.len(), "failed to persist cart");
        }
    }

    /// Removes the persisted cart so that a later load observes it as absent.
    pub fn clear(&self) {
        if let Err(e) = self.slot.remove() {
            tracing::warn!(error = %e, "failed to remove persisted cart");
        }
    }

    /// Returns true if a cart slot is present, even an empty one.
    pub fn is_persisted(&self) -> bool {
        matches!(self.slot.storage().get(CART_KEY), Ok(Some(_)))
    }
}
