//! Session-scoped persistence for the storefront.
//!
//! A [`SessionStorage`] is a set of string slots that lives as long as one
//! browser session. On top of it sit the typed [`SessionSlot`], the
//! [`PersistentCartStore`] mirroring the cart under the `"cart"` key and the
//! [`GuestIdStore`] issuing the session's anonymous identity under `"guestId"`.

pub mod cart;
pub mod directory;
pub mod error;
pub mod guest;
pub mod session;
pub mod slot;

pub use cart::{CART_KEY, PersistentCartStore};
pub use directory::DirectorySessionStorage;
pub use error::{Result, StorageError};
pub use guest::{GUEST_ID_KEY, GuestIdStore};
pub use session::{InMemorySessionStorage, SessionStorage};
pub use slot::SessionSlot;
