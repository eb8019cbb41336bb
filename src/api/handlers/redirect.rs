//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /api/{code}`
///
/// Mappings never change, so the redirect is a `308 Permanent Redirect`.
///
/// # Errors
///
/// Returns 404 Not Found if the code is malformed or unknown.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let original_url = state.link_service.resolve(&code).await?;

    Ok(Redirect::permanent(&original_url))
}
