//! Checkout orchestrator turning a session's cart into a placed order.

use common::OrderId;
use domain::{Money, order_items};
use serde::Serialize;
use store::SessionStorage;

use crate::confirmation::{CheckoutSummary, ConfirmationPrompt, Decision};
use crate::services::OrderService;
use crate::session::Session;
use crate::state::CheckoutState;

/// Shown when checking out an empty cart.
pub const EMPTY_CART_MESSAGE: &str = "Your cart is empty.";

/// Shown after an order was placed.
pub const PLACED_MESSAGE: &str = "Your order has been placed successfully!";

/// Shown when the order backend failed.
pub const FAILED_MESSAGE: &str = "Failed to place order. Please try again.";

/// Shown when a checkout is already pending for the session.
pub const IN_PROGRESS_MESSAGE: &str = "Your order is already being placed.";

/// How a checkout attempt ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckoutOutcome {
    /// Another checkout for the same session had not finished yet.
    InProgress,

    /// Nothing to order. The order backend was not contacted.
    EmptyCart,

    /// The shopper declined. Nothing changed.
    Declined,

    /// The order was recorded and the cart cleared.
    Placed { order_id: OrderId, total: Money },

    /// The order backend failed. The cart is untouched.
    Failed { reason: String },
}

impl CheckoutOutcome {
    /// Returns the message shown to the shopper, if any.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            CheckoutOutcome::InProgress => Some(IN_PROGRESS_MESSAGE),
            CheckoutOutcome::EmptyCart => Some(EMPTY_CART_MESSAGE),
            CheckoutOutcome::Declined => None,
            CheckoutOutcome::Placed { .. } => Some(PLACED_MESSAGE),
            CheckoutOutcome::Failed { .. } => Some(FAILED_MESSAGE),
        }
    }

    /// Returns true if an order was placed.
    pub fn is_placed(&self) -> bool {
        matches!(self, CheckoutOutcome::Placed { .. })
    }
}

/// Settles the session's checkout state when a checkout ends, including
/// when the checkout future is dropped mid-flight. Attempts that never
/// reach the order backend leave the previous state in place.
struct CheckoutGuard<'a, S: SessionStorage> {
    session: &'a Session<S>,
    outcome: CheckoutState,
}

impl<'a, S: SessionStorage> CheckoutGuard<'a, S> {
    fn new(session: &'a Session<S>, previous: CheckoutState) -> Self {
        Self {
            session,
            outcome: previous,
        }
    }

    fn finish(mut self, outcome: CheckoutState) {
        self.outcome = outcome;
    }
}

impl<S: SessionStorage> Drop for CheckoutGuard<'_, S> {
    fn drop(&mut self) {
        self.session.finish_checkout(self.outcome);
    }
}

/// Orchestrates checkout: confirm, submit one order, clear the cart.
///
/// Holds no lock across the confirmation or submission awaits, so the
/// session's cart stays usable while an order is pending.
pub struct CheckoutOrchestrator<O: OrderService> {
    orders: O,
}

impl<O: OrderService> CheckoutOrchestrator<O> {
    /// Creates a new orchestrator over an order backend.
    pub fn new(orders: O) -> Self {
        Self { orders }
    }

    /// Returns a reference to the order backend.
    pub fn orders(&self) -> &O {
        &self.orders
    }

    /// Runs one checkout for `session`.
    ///
    /// Never fails: every ending is a [`CheckoutOutcome`]. On success the
    /// whole cart is cleared, including lines added while the order was
    /// being submitted.
    #[tracing::instrument(skip_all)]
    pub async fn checkout<S, P>(&self, session: &Session<S>, prompt: &P) -> CheckoutOutcome
    where
        S: SessionStorage,
        P: ConfirmationPrompt + ?Sized,
    {
        metrics::counter!("checkout_attempts_total").increment(1);
        let start = std::time::Instant::now();

        let Some(previous) = session.begin_checkout() else {
            tracing::debug!("checkout already in progress");
            return CheckoutOutcome::InProgress;
        };
        let guard = CheckoutGuard::new(session, previous);

        // 1. Snapshot the cart and compute the total once
        let cart = session.cart().snapshot();
        if cart.is_empty() {
            tracing::debug!("checkout of empty cart");
            return CheckoutOutcome::EmptyCart;
        }
        let totals = cart.totals();
        let summary = CheckoutSummary::new(cart.len(), totals);

        // 2. Ask for confirmation
        if prompt.confirm(&summary).await == Decision::Declined {
            tracing::info!(total = %summary.total, "checkout declined");
            return CheckoutOutcome::Declined;
        }

        // 3. Resolve who the order belongs to
        let owner_id = session.owner_id();

        // 4. Submit the flattened snapshot
        tracing::info!(
            %owner_id,
            lines = summary.lines,
            item_count = summary.item_count,
            total = %summary.total,
            "submitting order"
        );
        let result = self
            .orders
            .create_order(&owner_id, order_items(&cart), totals.total_price)
            .await;

        metrics::histogram!("checkout_duration_seconds").record(start.elapsed().as_secs_f64());

        match result {
            Ok(order_id) => {
                if let Err(e) = session.cart().clear_cart() {
                    tracing::warn!(error = %e, %order_id, "failed to clear cart after order");
                }
                guard.finish(CheckoutState::Placed);
                metrics::counter!("checkout_completed").increment(1);
                tracing::info!(%order_id, "order placed");

                CheckoutOutcome::Placed {
                    order_id,
                    total: totals.total_price,
                }
            }
            Err(e) => {
                guard.finish(CheckoutState::Failed);
                metrics::counter!("checkout_failed").increment(1);
                tracing::warn!(error = %e, %owner_id, "failed to place order");

                CheckoutOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirmation::{AlwaysConfirm, AlwaysDecline};
    use crate::services::InMemoryOrderService;
    use domain::{Product, QuantityLimits};
    use store::InMemorySessionStorage;

    fn session_with_items() -> Session<InMemorySessionStorage> {
        let session = Session::open(InMemorySessionStorage::new(), QuantityLimits::default());
        session
            .cart()
            .add_to_cart(Product::new("1", "A", Money::from_cents(1000), "x"), 2)
            .unwrap();
        session
            .cart()
            .add_to_cart(Product::new("2", "B", Money::from_cents(550), "x"), 3)
            .unwrap();
        session
    }

    #[tokio::test]
    async fn test_placed_clears_cart() {
        let orders = InMemoryOrderService::new();
        let orchestrator = CheckoutOrchestrator::new(orders.clone());
        let session = session_with_items();

        let outcome = orchestrator.checkout(&session, &AlwaysConfirm).await;

        match &outcome {
            CheckoutOutcome::Placed { total, .. } => assert_eq!(*total, Money::from_cents(3650)),
            other => panic!("expected Placed, got {other:?}"),
        }
        assert_eq!(outcome.message(), Some(PLACED_MESSAGE));
        assert!(session.cart().is_empty());
        assert_eq!(orders.create_calls(), 1);
        assert_eq!(session.checkout_state(), CheckoutState::Placed);
    }

    #[tokio::test]
    async fn test_empty_cart_short_circuits() {
        let orders = InMemoryOrderService::new();
        let orchestrator = CheckoutOrchestrator::new(orders.clone());
        let session = Session::open(InMemorySessionStorage::new(), QuantityLimits::default());

        let outcome = orchestrator.checkout(&session, &AlwaysConfirm).await;

        assert_eq!(outcome, CheckoutOutcome::EmptyCart);
        assert_eq!(outcome.message(), Some(EMPTY_CART_MESSAGE));
        assert_eq!(orders.create_calls(), 0);
        assert_eq!(session.checkout_state(), CheckoutState::Idle);
    }

    #[tokio::test]
    async fn test_declined_changes_nothing() {
        let orders = InMemoryOrderService::new();
        let orchestrator = CheckoutOrchestrator::new(orders.clone());
        let session = session_with_items();

        let outcome = orchestrator.checkout(&session, &AlwaysDecline).await;

        assert_eq!(outcome, CheckoutOutcome::Declined);
        assert_eq!(outcome.message(), None);
        assert_eq!(session.cart().totals().item_count, 5);
        assert_eq!(orders.create_calls(), 0);
    }

    #[tokio::test]
    async fn test_failure_keeps_cart() {
        let orders = InMemoryOrderService::new();
        orders.set_fail_on_create(true);
        let orchestrator = CheckoutOrchestrator::new(orders.clone());
        let session = session_with_items();

        let outcome = orchestrator.checkout(&session, &AlwaysConfirm).await;

        assert!(matches!(outcome, CheckoutOutcome::Failed { .. }));
        assert_eq!(outcome.message(), Some(FAILED_MESSAGE));
        assert_eq!(session.cart().totals().item_count, 5);
        assert_eq!(session.checkout_state(), CheckoutState::Failed);
    }

    #[tokio::test]
    async fn test_short_circuits_keep_previous_state() {
        let orders = InMemoryOrderService::new();
        let orchestrator = CheckoutOrchestrator::new(orders.clone());
        let session = session_with_items();

        assert!(orchestrator.checkout(&session, &AlwaysConfirm).await.is_placed());
        assert_eq!(
            orchestrator.checkout(&session, &AlwaysConfirm).await,
            CheckoutOutcome::EmptyCart
        );
        assert_eq!(session.checkout_state(), CheckoutState::Placed);

        orders.set_fail_on_create(true);
        session
            .cart()
            .add_to_cart(Product::new("3", "C", Money::from_cents(300), "x"), 1)
            .unwrap();
        orchestrator.checkout(&session, &AlwaysConfirm).await;
        assert_eq!(session.checkout_state(), CheckoutState::Failed);

        let declined = orchestrator.checkout(&session, &AlwaysDecline).await;
        assert_eq!(declined, CheckoutOutcome::Declined);
        assert_eq!(session.checkout_state(), CheckoutState::Failed);
    }

    #[tokio::test]
    async fn test_outcome_serialization() {
        let json = serde_json::to_value(CheckoutOutcome::EmptyCart).unwrap();
        assert_eq!(json["status"], "empty_cart");

        let json = serde_json::to_value(CheckoutOutcome::Failed {
            reason: "down".to_string(),
        })
        .unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["reason"], "down");
    }
}
