//! One shopper's browser session.

use std::sync::{Mutex, MutexGuard, PoisonError};

use common::{GuestId, OwnerId, UserId};
use domain::{CartService, QuantityLimits};
use store::{GuestIdStore, SessionSlot, SessionStorage};

use crate::state::CheckoutState;

/// Session storage key holding the signed-in user.
pub const USER_KEY: &str = "user";

/// Everything scoped to one browser session: the cart, the guest identity,
/// the signed-in user and the checkout state.
///
/// Built once per session and shared with whatever serves that session.
pub struct Session<S> {
    cart: CartService<S>,
    guests: GuestIdStore<S>,
    guest_id: Mutex<Option<GuestId>>,
    user: SessionSlot<S, UserId>,
    checkout: Mutex<CheckoutState>,
}

impl<S: SessionStorage + Clone> Session<S> {
    /// Opens a session over `storage`, restoring its persisted cart.
    pub fn open(storage: S, limits: QuantityLimits) -> Self {
        Self {
            cart: CartService::open(storage.clone(), limits),
            guests: GuestIdStore::new(storage.clone()),
            guest_id: Mutex::new(None),
            user: SessionSlot::new(storage, USER_KEY),
            checkout: Mutex::new(CheckoutState::default()),
        }
    }
}

impl<S: SessionStorage> Session<S> {
    /// Returns the session's cart.
    pub fn cart(&self) -> &CartService<S> {
        &self.cart
    }

    /// Returns the signed-in user, if any.
    pub fn current_user(&self) -> Option<UserId> {
        match self.user.read() {
            Ok(user) => user,
            Err(e) => {
                tracing::debug!(error = %e, "signed-in user unreadable");
                None
            }
        }
    }

    /// Records `user` as signed in for this session.
    pub fn sign_in(&self, user: &UserId) -> store::Result<()> {
        self.user.write(user)?;
        tracing::info!(uid = %user, "signed in");
        Ok(())
    }

    /// Signs the current user out. The cart and guest identity are kept.
    pub fn sign_out(&self) -> store::Result<()> {
        self.user.remove()
    }

    /// Returns the session's guest identity, creating it on first use.
    ///
    /// Resolved once under the session's lock, so concurrent first callers
    /// all see the same ID.
    pub fn guest_id(&self) -> GuestId {
        let mut cached = lock(&self.guest_id);
        cached.get_or_insert_with(|| self.guests.get_or_create()).clone()
    }

    /// Returns the identity orders are recorded against.
    ///
    /// The signed-in user if there is one, otherwise the guest.
    pub fn owner_id(&self) -> OwnerId {
        match self.current_user() {
            Some(user) => OwnerId::user(&user),
            None => OwnerId::guest(&self.guest_id()),
        }
    }

    /// Returns the state of the most recent checkout.
    pub fn checkout_state(&self) -> CheckoutState {
        *self.checkout_lock()
    }

    /// Moves to `Submitting` unless a checkout is already pending.
    ///
    /// Returns the state before the move, or None if a checkout is pending.
    pub(crate) fn begin_checkout(&self) -> Option<CheckoutState> {
        let mut state = self.checkout_lock();
        if !state.can_submit() {
            return None;
        }
        Some(std::mem::replace(&mut *state, CheckoutState::Submitting))
    }

    /// Records how the pending checkout ended.
    pub(crate) fn finish_checkout(&self, outcome: CheckoutState) {
        *self.checkout_lock() = outcome;
    }

    fn checkout_lock(&self) -> MutexGuard<'_, CheckoutState> {
        lock(&self.checkout)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::{GUEST_ID_KEY, InMemorySessionStorage};

    fn session(storage: &InMemorySessionStorage) -> Session<InMemorySessionStorage> {
        Session::open(storage.clone(), QuantityLimits::default())
    }

    #[test]
    fn test_guest_owner_is_prefixed_and_stable() {
        let storage = InMemorySessionStorage::new();
        let session = session(&storage);

        let owner = session.owner_id();
        assert!(owner.is_guest());
        assert_eq!(session.owner_id(), owner);
        assert_eq!(
            owner.as_str(),
            format!("guest_{}", storage.get(GUEST_ID_KEY).unwrap().unwrap())
        );
    }

    #[test]
    fn test_signed_in_owner_is_user_id() {
        let storage = InMemorySessionStorage::new();
        let session = session(&storage);
        let user = UserId::new("uid-123");

        session.sign_in(&user).unwrap();
        assert_eq!(session.owner_id().as_str(), "uid-123");

        session.sign_out().unwrap();
        assert!(session.current_user().is_none());
        assert!(session.owner_id().is_guest());
    }

    #[test]
    fn test_sign_in_survives_reopen() {
        let storage = InMemorySessionStorage::new();
        session(&storage).sign_in(&UserId::new("uid-1")).unwrap();

        assert_eq!(session(&storage).current_user(), Some(UserId::new("uid-1")));
    }

    #[test]
    fn test_only_one_checkout_at_a_time() {
        let session = session(&InMemorySessionStorage::new());

        assert_eq!(session.begin_checkout(), Some(CheckoutState::Idle));
        assert_eq!(session.begin_checkout(), None);
        assert_eq!(session.checkout_state(), CheckoutState::Submitting);

        session.finish_checkout(CheckoutState::Failed);
        assert_eq!(session.begin_checkout(), Some(CheckoutState::Failed));
    }

    #[test]
    fn test_concurrent_first_callers_share_one_guest_id() {
        let dir = tempfile::tempdir().unwrap();
        let storage = store::DirectorySessionStorage::open(dir.path()).unwrap();
        let session = Session::open(storage, QuantityLimits::default());
        let barrier = std::sync::Barrier::new(8);
        let (barrier, session) = (&barrier, &session);

        let owners: Vec<OwnerId> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(move || {
                        barrier.wait();
                        session.owner_id()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(owners.iter().all(|o| *o == owners[0]));
        let reopened = store::DirectorySessionStorage::open(dir.path()).unwrap();
        let persisted = GuestIdStore::new(reopened).current().unwrap();
        assert_eq!(owners[0], OwnerId::guest(&persisted));
    }
}
