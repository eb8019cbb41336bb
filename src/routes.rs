//! Top-level router combining API routes, health check and static files.
//!
//! # Route Structure
//!
//! - `POST /api/shorten` - Create a short code
//! - `GET  /api/{code}`  - Redirect to the original URL
//! - `GET  /health`      - Store and cache health
//! - `/static/*`         - Static assets
//!
//! # Middleware
//!
//! - **Request ID** - `x-request-id` is kept or generated, recorded in the
//!   request span and echoed on the response
//! - **Tracing** - Structured request/response logging
//! - **Panic recovery** - A panicking handler yields a 500 error envelope
//! - **Timeout** - Requests exceeding the configured duration get 408
//! - **Path normalization** - Trailing slash handling

use std::any::Any;
use std::path::Path;
use std::time::Duration;

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::tracing;
use crate::error::AppError;
use crate::state::AppState;
use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde_json::json;
use tower::Layer;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `static_dir` - directory served under `/static`
/// - `request_timeout` - upper bound on handling a single request
pub fn app_router(
    state: AppState,
    static_dir: impl AsRef<Path>,
    request_timeout: Duration,
) -> NormalizePath<Router> {
    let router = Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api::routes::api_routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state);

    with_middleware(router, request_timeout)
}

/// Wraps a router in the service middleware stack.
///
/// Layers run outermost first: path normalization, request id, tracing,
/// panic recovery, timeout.
pub fn with_middleware(router: Router, request_timeout: Duration) -> NormalizePath<Router> {
    let router = router
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(tracing::layer())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    NormalizePathLayer::trim_trailing_slash().layer(router)
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let reason = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };

    ::tracing::error!("Handler panicked: {}", reason);

    AppError::internal("Something went wrong", json!({})).into_response()
}
