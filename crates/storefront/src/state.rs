//! Checkout state tracked on a session.

use serde::{Deserialize, Serialize};

/// Where the session's most recent checkout stands.
///
/// State transitions:
/// ```text
/// Idle ──► Submitting ──┬──► Placed
///   ▲                   └──► Failed
///   └── (any non-submitting state may start a new checkout)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CheckoutState {
    /// No checkout has run yet.
    #[default]
    Idle,

    /// An order submission is pending.
    Submitting,

    /// The last checkout placed an order.
    Placed,

    /// The last checkout failed to place an order.
    Failed,
}

impl CheckoutState {
    /// Returns true if a new checkout may start.
    pub fn can_submit(&self) -> bool {
        !matches!(self, CheckoutState::Submitting)
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutState::Idle => "Idle",
            CheckoutState::Submitting => "Submitting",
            CheckoutState::Placed => "Placed",
            CheckoutState::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for CheckoutState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
