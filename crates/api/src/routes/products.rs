//! Catalog browsing and the admin product manager.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::ProductId;
use domain::{Product, ProductDraft};
use serde::Deserialize;

use super::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
}

/// GET /products: list products, optionally by `?category=`.
#[tracing::instrument(skip(state))]
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let category = query.category.as_deref().filter(|c| !c.is_empty());
    let products = state.catalog.list_products(category).await?;
    Ok(Json(products))
}

/// GET /products/categories: list distinct categories.
pub async fn categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.catalog.list_categories().await?))
}

/// GET /products/{id}: product detail.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let product = state.catalog.get_product(&ProductId::new(id)).await?;
    Ok(Json(product))
}

/// POST /products: validate and create a product.
#[tracing::instrument(skip(state, draft))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<ProductDraft>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let product = state.products.add_product(draft).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /products/{id}: validate and replace a product's fields.
#[tracing::instrument(skip(state, draft))]
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(draft): Json<ProductDraft>,
) -> Result<Json<Product>, ApiError> {
    let product = state
        .products
        .update_product(&ProductId::new(id), draft)
        .await?;
    Ok(Json(product))
}

/// DELETE /products/{id}: remove a product from the catalog.
#[tracing::instrument(skip(state))]
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.products.delete_product(&ProductId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
