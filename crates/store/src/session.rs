use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::{Result, StorageError};

/// Core trait for session-scoped key-value storage.
///
/// Operations are synchronous so that a cart mutation and its persistence
/// happen in the same step. All implementations must be thread-safe
/// (Send + Sync).
pub trait SessionStorage: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// Returns None if the slot is absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrites the slot stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes the slot entirely. Removing an absent slot is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: SessionStorage + ?Sized> SessionStorage for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

#[derive(Debug, Default)]
struct InMemorySessionState {
    slots: HashMap<String, String>,
    fail_on_write: bool,
}

/// In-memory session storage.
///
/// Clones share the same slots, the way every tab of a browser session sees
/// the same storage.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStorage {
    state: Arc<RwLock<InMemorySessionState>>,
}

impl InMemorySessionStorage {
    /// Creates a new empty session storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the storage to reject writes and removals.
    pub fn set_fail_on_write(&self, fail: bool) {
        if let Ok(mut state) = self.state.write() {
            state.fail_on_write = fail;
        }
    }

    /// Returns true if a slot exists under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.state
            .read()
            .map(|state| state.slots.contains_key(key))
            .unwrap_or(false)
    }

    /// Returns the number of occupied slots.
    pub fn len(&self) -> usize {
        self.state.read().map(|state| state.slots.len()).unwrap_or(0)
    }

    /// Returns true if no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> StorageError {
    StorageError::Unavailable("session storage lock poisoned".to_string())
}

impl SessionStorage for InMemorySessionStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(state.slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut state = self.state.write().map_err(|_| poisoned())?;

        if state.fail_on_write {
            return Err(StorageError::Unavailable("quota exceeded".to_string()));
        }

        state.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut state = self.state.write().map_err(|_| poisoned())?;

        if state.fail_on_write {
            return Err(StorageError::Unavailable("storage is read-only".to_string()));
        }

        state.slots.remove(key);
        Ok(())
    }
}
