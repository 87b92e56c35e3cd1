//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`  - Health check (no rate limit)
//! - storefront      - Cart and catalog, see [`api::routes::public_routes`]
//! - `/admin/*`      - Catalog administration, see [`api::routes::admin_routes`]
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket, stricter for admin routes
//! - **Path normalization** - Trailing slash handling
//!
//! Authentication of the admin routes is left to the deployment (reverse
//! proxy or private network).

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let storefront = api::routes::public_routes().layer(rate_limit::layer());
    let admin = api::routes::admin_routes().layer(rate_limit::admin_layer());

    let router = Router::new()
        .route("/health", get(health_handler))
        .merge(storefront)
        .nest("/admin", admin)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
