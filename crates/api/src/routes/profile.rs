//! Profile management for the signed-in user.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use common::UserId;
use storefront::{ProfileUpdate, StorefrontError, UserProfile};

use super::AppState;
use crate::error::ApiError;
use crate::sessions::{ReadSession, StorefrontSession};

fn signed_in(session: &StorefrontSession) -> Result<UserId, ApiError> {
    session
        .current_user()
        .ok_or(ApiError::Storefront(StorefrontError::NotSignedIn))
}

/// GET /profile
pub async fn get(
    State(state): State<Arc<AppState>>,
    ReadSession(session): ReadSession,
) -> Result<Json<UserProfile>, ApiError> {
    let uid = signed_in(&session)?;
    Ok(Json(state.accounts.get_profile(&uid).await?))
}

/// PUT /profile: update display name and/or address.
#[tracing::instrument(skip_all)]
pub async fn update(
    State(state): State<Arc<AppState>>,
    ReadSession(session): ReadSession,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<UserProfile>, ApiError> {
    let uid = signed_in(&session)?;
    Ok(Json(state.accounts.update_profile(&uid, update).await?))
}

/// DELETE /profile: delete the account and sign the session out.
#[tracing::instrument(skip_all)]
pub async fn delete(
    State(state): State<Arc<AppState>>,
    ReadSession(session): ReadSession,
) -> Result<StatusCode, ApiError> {
    let uid = signed_in(&session)?;
    state.accounts.delete_account(&uid).await?;
    session.sign_out()?;
    Ok(StatusCode::NO_CONTENT)
}
