//! Registration, sign-in and sign-out.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use storefront::UserProfile;

use super::AppState;
use crate::error::ApiError;
use crate::sessions::{CurrentSession, ReadSession};

// -- Request types --

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// -- Handlers --

/// POST /auth/register: create an account and sign the session in.
#[tracing::instrument(skip_all)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    CurrentSession(session): CurrentSession,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserProfile>), ApiError> {
    let profile = state
        .accounts
        .register(&req.email, &req.password, req.display_name.as_deref())
        .await?;
    session.sign_in(&profile.uid)?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// POST /auth/login: check credentials and sign the session in.
#[tracing::instrument(skip_all)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    CurrentSession(session): CurrentSession,
    Json(req): Json<LoginRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = state.accounts.sign_in(&req.email, &req.password).await?;
    session.sign_in(&profile.uid)?;
    Ok(Json(profile))
}

/// POST /auth/logout: sign the session out. The cart is kept.
pub async fn logout(ReadSession(session): ReadSession) -> Result<StatusCode, ApiError> {
    session.sign_out()?;
    Ok(StatusCode::NO_CONTENT)
}
