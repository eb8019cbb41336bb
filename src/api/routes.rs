//! API route configuration.

use crate::api::handlers::{redirect_handler, shorten_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Routes mounted under `/api`.
///
/// # Endpoints
///
/// - `POST /shorten` - Allocate a short code for a URL
/// - `GET  /{code}`  - Redirect to the original URL
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/{code}", get(redirect_handler))
}
