//! Checkout endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use domain::Money;
use serde::{Deserialize, Serialize};
use storefront::{CheckoutOutcome, CheckoutState, CheckoutSummary, ConfirmedTotal};

use super::AppState;
use crate::error::ApiError;
use crate::sessions::{CurrentSession, ReadSession};

// -- Request types --

/// The client confirms by echoing the total it showed the shopper.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub confirmed_total_cents: i64,
}

// -- Response types --

#[derive(Debug, Serialize)]
pub struct CheckoutPreview {
    pub summary: CheckoutSummary,
    pub prompt: String,
    pub state: CheckoutState,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    #[serde(flatten)]
    pub outcome: CheckoutOutcome,
    pub message: Option<&'static str>,
}

// -- Handlers --

/// GET /checkout: what the shopper would be asked to confirm.
pub async fn preview(ReadSession(session): ReadSession) -> Json<CheckoutPreview> {
    let cart = session.cart().snapshot();
    let summary = CheckoutSummary::new(cart.len(), cart.totals());
    Json(CheckoutPreview {
        prompt: summary.prompt(),
        summary,
        state: session.checkout_state(),
    })
}

/// POST /checkout: place an order for the session's cart.
#[tracing::instrument(skip(state, session))]
pub async fn submit(
    State(state): State<Arc<AppState>>,
    CurrentSession(session): CurrentSession,
    Json(req): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<CheckoutResponse>), ApiError> {
    let prompt = ConfirmedTotal(Money::from_cents(req.confirmed_total_cents));
    let outcome = state.checkout.checkout(&session, &prompt).await;

    let status = match &outcome {
        CheckoutOutcome::Placed { .. } => StatusCode::CREATED,
        CheckoutOutcome::EmptyCart => StatusCode::UNPROCESSABLE_ENTITY,
        CheckoutOutcome::Declined | CheckoutOutcome::InProgress => StatusCode::CONFLICT,
        CheckoutOutcome::Failed { .. } => StatusCode::BAD_GATEWAY,
    };

    let message = outcome.message();
    Ok((status, Json(CheckoutResponse { outcome, message })))
}
