//! The confirmation step between a cart and a submitted order.

use async_trait::async_trait;
use domain::{CartTotals, Money};
use serde::{Deserialize, Serialize};

/// What the shopper is asked to confirm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSummary {
    /// Number of distinct products.
    pub lines: usize,

    /// Sum of quantities.
    pub item_count: u64,

    /// Total that will be recorded on the order.
    pub total: Money,
}

impl CheckoutSummary {
    /// Builds a summary from cart totals.
    pub fn new(lines: usize, totals: CartTotals) -> Self {
        Self {
            lines,
            item_count: totals.item_count,
            total: totals.total_price,
        }
    }

    /// Returns the question put to the shopper.
    pub fn prompt(&self) -> String {
        format!(
            "Are you sure you want to place this order for {}?",
            self.total
        )
    }
}

/// The shopper's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Confirmed,
    Declined,
}

/// Asks the shopper to confirm a checkout.
#[async_trait]
pub trait ConfirmationPrompt: Send + Sync {
    /// Presents `summary` and waits for an answer.
    async fn confirm(&self, summary: &CheckoutSummary) -> Decision;
}

/// Confirms every checkout.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

#[async_trait]
impl ConfirmationPrompt for AlwaysConfirm {
    async fn confirm(&self, _summary: &CheckoutSummary) -> Decision {
        Decision::Confirmed
    }
}

/// Declines every checkout.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysDecline;

#[async_trait]
impl ConfirmationPrompt for AlwaysDecline {
    async fn confirm(&self, _summary: &CheckoutSummary) -> Decision {
        Decision::Declined
    }
}

/// Confirms only when the shopper agreed to exactly the total being charged.
///
/// Used where the answer was given ahead of time, such as a client echoing
/// the total it displayed.
#[derive(Debug, Clone, Copy)]
pub struct ConfirmedTotal(pub Money);

#[async_trait]
impl ConfirmationPrompt for ConfirmedTotal {
    async fn confirm(&self, summary: &CheckoutSummary) -> Decision {
        if summary.total == self.0 {
            Decision::Confirmed
        } else {
            tracing::info!(
                confirmed = %self.0,
                actual = %summary.total,
                "confirmed total does not match cart"
            );
            Decision::Declined
        }
    }
}
