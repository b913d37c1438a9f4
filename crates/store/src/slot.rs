use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{Result, SessionStorage};

/// A typed, JSON-encoded view of one session storage slot.
#[derive(Debug, Clone)]
pub struct SessionSlot<S, T> {
    storage: S,
    key: &'static str,
    _phantom: PhantomData<fn() -> T>,
}

impl<S, T> SessionSlot<S, T>
where
    S: SessionStorage,
    T: Serialize + DeserializeOwned,
{
    /// Creates a view of the slot stored under `key`.
    pub fn new(storage: S, key: &'static str) -> Self {
        Self {
            storage,
            key,
            _phantom: PhantomData,
        }
    }

    /// Returns the slot key.
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Returns a reference to the underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Reads and decodes the slot.
    ///
    /// Returns None if the slot is absent; malformed content is an error.
    pub fn read(&self) -> Result<Option<T>> {
        match self.storage.get(self.key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Encodes `value` and overwrites the slot.
    pub fn write(&self, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.storage.set(self.key, &raw)
    }

    /// Removes the slot.
    pub fn remove(&self) -> Result<()> {
        self.storage.remove(self.key)
    }
}
