//! HTTP API server with observability for the storefront.
//!
//! Hosts one storefront session per `x-session-id` header and exposes the
//! catalog, cart, checkout, order history, identity and profile over REST,
//! with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;
pub mod sessions;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use storefront::{InMemoryAccountService, InMemoryCatalogService, InMemoryOrderService};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use routes::AppState;
use sessions::{SessionBackend, SessionRegistry};

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/products",
            get(routes::products::list).post(routes::products::create),
        )
        .route("/products/categories", get(routes::products::categories))
        .route(
            "/products/{id}",
            get(routes::products::get)
                .put(routes::products::update)
                .delete(routes::products::delete),
        )
        .route(
            "/cart",
            get(routes::cart::get).delete(routes::cart::clear),
        )
        .route("/cart/items", post(routes::cart::add_item))
        .route(
            "/cart/items/{product_id}",
            axum::routing::delete(routes::cart::remove_item),
        )
        .route(
            "/checkout",
            get(routes::checkout::preview).post(routes::checkout::submit),
        )
        .route("/orders", get(routes::orders::list))
        .route("/orders/{id}", get(routes::orders::get))
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/logout", post(routes::auth::logout))
        .route(
            "/profile",
            get(routes::profile::get)
                .put(routes::profile::update)
                .delete(routes::profile::delete),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state with in-memory collaborators.
///
/// The catalog starts with sample products. Sessions are kept under
/// `config.session_dir` when set, in memory otherwise.
pub fn create_default_state(config: &Config) -> Arc<AppState> {
    let backend = match &config.session_dir {
        Some(dir) => SessionBackend::Directory(dir.clone()),
        None => SessionBackend::Memory,
    };
    let sessions = SessionRegistry::new(backend, config.quantity_limits())
        .with_idle_timeout(config.session_idle_timeout)
        .with_max_sessions(config.max_sessions);

    Arc::new(AppState::new(
        sessions,
        Arc::new(InMemoryCatalogService::with_sample_products()),
        Arc::new(InMemoryAccountService::new()),
        Arc::new(InMemoryOrderService::new()),
    ))
}
