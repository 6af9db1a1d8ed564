//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /shorten`  - Create a short link
//! - `GET  /r/{code}` - Short link redirect
//! - `GET  /health`   - Storage health check
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Owner cookie** - Anonymous submitter token on `/shorten`
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = Router::new()
        .merge(api::routes::link_routes(state.clone()))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
