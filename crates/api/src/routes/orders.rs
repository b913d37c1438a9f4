//! Order history endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use common::OrderId;
use domain::Order;

use super::AppState;
use crate::error::ApiError;
use crate::sessions::ReadSession;

/// GET /orders: orders placed by the session's current identity.
#[tracing::instrument(skip(state, session))]
pub async fn list(
    State(state): State<Arc<AppState>>,
    ReadSession(session): ReadSession,
) -> Result<Json<Vec<Order>>, ApiError> {
    let owner_id = session.owner_id();
    let orders = state.orders.list_orders(&owner_id).await?;
    Ok(Json(orders))
}

/// GET /orders/{id}: one order, if it belongs to the caller.
#[tracing::instrument(skip(state, session))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    ReadSession(session): ReadSession,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let owner_id = session.owner_id();

    state
        .orders
        .get_order(order_id)
        .await?
        .filter(|order| order.owner_id == owner_id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Order {order_id} not found")))
}

fn parse_order_id(id: &str) -> Result<OrderId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid order ID: {e}")))?;
    Ok(OrderId::from_uuid(uuid))
}
