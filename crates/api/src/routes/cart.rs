//! Cart endpoints for the caller's session.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use common::ProductId;
use domain::{Cart, CartItem, Money};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::error::ApiError;
use crate::sessions::{CurrentSession, ReadSession};

// -- Request types --

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

// -- Response types --

#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub items: Vec<CartItem>,
    pub item_count: u64,
    pub total_price: Money,
    pub total_display: String,
    pub max_quantity: u32,
}

impl CartResponse {
    fn new(cart: Cart, max_quantity: u32) -> Self {
        let totals = cart.totals();
        Self {
            item_count: totals.item_count,
            total_price: totals.total_price,
            total_display: totals.total_price.to_string(),
            max_quantity,
            items: cart.into_items(),
        }
    }
}

// -- Handlers --

/// GET /cart: the session's cart with totals.
pub async fn get(ReadSession(session): ReadSession) -> Json<CartResponse> {
    let cart = session.cart();
    Json(CartResponse::new(cart.snapshot(), cart.limits().max_per_add()))
}

/// POST /cart/items: add a product, snapshotting it from the catalog.
#[tracing::instrument(skip(state, session))]
pub async fn add_item(
    State(state): State<Arc<AppState>>,
    CurrentSession(session): CurrentSession,
    Json(req): Json<AddItemRequest>,
) -> Result<Json<CartResponse>, ApiError> {
    let product = state.catalog.get_product(&req.product_id).await?;

    let cart = session.cart();
    let result = cart.add_to_cart(product, req.quantity)?;
    Ok(Json(CartResponse::new(result.cart, cart.limits().max_per_add())))
}

/// DELETE /cart/items/{product_id}: remove a product. Absent products are ignored.
#[tracing::instrument(skip(session))]
pub async fn remove_item(
    CurrentSession(session): CurrentSession,
    Path(product_id): Path<String>,
) -> Result<Json<CartResponse>, ApiError> {
    let cart = session.cart();
    let result = cart.remove_from_cart(&ProductId::new(product_id))?;
    Ok(Json(CartResponse::new(result.cart, cart.limits().max_per_add())))
}

/// DELETE /cart: empty the cart.
#[tracing::instrument(skip(session))]
pub async fn clear(CurrentSession(session): CurrentSession) -> Result<Json<CartResponse>, ApiError> {
    let cart = session.cart();
    let result = cart.clear_cart()?;
    Ok(Json(CartResponse::new(result.cart, cart.limits().max_per_add())))
}
