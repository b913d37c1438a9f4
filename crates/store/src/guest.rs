use common::GuestId;

use crate::SessionStorage;

/// Session storage key holding the guest identity.
pub const GUEST_ID_KEY: &str = "guestId";

/// Issues the anonymous identity used when nobody is signed in.
///
/// The ID is created lazily on first request and then read back from the
/// session for as long as the session lives.
#[derive(Debug, Clone)]
pub struct GuestIdStore<S> {
    storage: S,
}

impl<S: SessionStorage> GuestIdStore<S> {
    /// Creates a guest ID store over the given session storage.
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Returns the session's guest ID without creating one.
    pub fn current(&self) -> Option<GuestId> {
        match self.storage.get(GUEST_ID_KEY) {
            Ok(Some(raw)) if !raw.trim().is_empty() => Some(GuestId::new(raw.trim())),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(error = %e, "guest id unreadable");
                None
            }
        }
    }

    /// Returns the session's guest ID, generating and persisting one if absent.
    ///
    /// A failed write still yields a usable ID for the current call.
    pub fn get_or_create(&self) -> GuestId {
        if let Some(existing) = self.current() {
            return existing;
        }

        let guest_id = GuestId::generate();
        if let Err(e) = self.storage.set(GUEST_ID_KEY, guest_id.as_str()) {
            tracing::warn!(error = %e, "failed to persist guest id");
        }
        tracing::debug!(%guest_id, "issued guest id");
        guest_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemorySessionStorage;

    #[test]
    fn created_lazily_and_stable() {
        let storage = InMemorySessionStorage::new();
        let guests = GuestIdStore::new(storage.clone());

        assert!(guests.current().is_none());
        assert!(!storage.contains_key(GUEST_ID_KEY));

        let first = guests.get_or_create();
        let second = guests.get_or_create();
        assert_eq!(first, second);
        assert_eq!(
            storage.get(GUEST_ID_KEY).unwrap().as_deref(),
            Some(first.as_str())
        );
    }

    #[test]
    fn separate_sessions_get_separate_ids() {
        let a = GuestIdStore::new(InMemorySessionStorage::new()).get_or_create();
        let b = GuestIdStore::new(InMemorySessionStorage::new()).get_or_create();
        assert_ne!(a, b);
    }

    #[test]
    fn blank_value_is_replaced() {
        let storage = InMemorySessionStorage::new();
        storage.set(GUEST_ID_KEY, "  ").unwrap();

        let guest_id = GuestIdStore::new(storage).get_or_create();
        assert!(!guest_id.as_str().trim().is_empty());
    }
}
