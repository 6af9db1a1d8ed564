//! API route configuration.

use crate::api::handlers::{redirect_handler, shorten_handler};
use crate::api::middleware::owner;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// Link routes.
///
/// # Endpoints
///
/// - `POST /shorten`  - Create a short link (owner cookie attached)
/// - `GET  /r/{code}` - Redirect to the original URL
pub fn link_routes(state: AppState) -> Router<AppState> {
    let shorten = Router::new()
        .route("/shorten", post(shorten_handler))
        .route_layer(middleware::from_fn_with_state(state, owner::layer));

    Router::new()
        .merge(shorten)
        .route("/r/{code}", get(redirect_handler))
}
