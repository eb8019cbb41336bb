//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::envelope::ApiResponse;
use crate::api::dto::shorten::{ShortenData, ShortenRequest};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short code for a long URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/page" }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// { "data": { "code": "aZ3x9Q", "short_url": "http://localhost:8080/api/aZ3x9Q" } }
/// ```
///
/// The URL is stored in normalized form (see [`ShortenRequest::normalized_url`]).
///
/// # Errors
///
/// - 422 Unprocessable Entity if the body is not the expected JSON
/// - 400 Bad Request if the URL is not an absolute http(s) URL
/// - 500 Internal Server Error if no code could be allocated or saved
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<ShortenData>>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let url = payload
        .normalized_url()
        .ok_or_else(|| AppError::bad_request("Invalid url", json!({})))?;

    let mapping = state.link_service.shorten(&url).await?;
    let short_url = state.link_service.short_url(&mapping.code);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(ShortenData {
            code: mapping.code.into_inner(),
            short_url,
        })),
    ))
}
