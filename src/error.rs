//! HTTP-facing error type.
//!
//! Core errors ([`AllocationError`], [`StoreError`]) are mapped onto
//! [`AppError`], which renders as the `{"error": {...}}` arm of
//! [`ApiResponse`].

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::api::dto::envelope::ApiResponse;
use crate::application::services::AllocationError;
use crate::domain::repositories::StoreError;

/// Error payload returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    #[error("{message}")]
    Unprocessable { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn unprocessable(message: impl Into<String>, details: Value) -> Self {
        Self::Unprocessable {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Unprocessable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, message, details) = match self {
            AppError::Validation { message, details } => ("validation_error", message, details),
            AppError::NotFound { message, details } => ("not_found", message, details),
            AppError::Unprocessable { message, details } => {
                ("unprocessable_entity", message, details)
            }
            AppError::Internal { message, details } => ("internal_error", message, details),
        };

        ErrorInfo {
            code,
            message: message.clone(),
            details: details.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body: ApiResponse<()> = ApiResponse::Error(self.to_error_info());
        (self.status(), Json(body)).into_response()
    }
}

impl From<AllocationError> for AppError {
    fn from(e: AllocationError) -> Self {
        tracing::error!("Short code allocation failed: {}", e);

        let (message, reason) = match &e {
            AllocationError::RandomSource(_) => ("Failed to generate code", "random_source"),
            AllocationError::Store(_) => ("Failed to check code availability", "store"),
            AllocationError::Persistence(_) => ("Failed to save url", "persistence"),
            AllocationError::Exhausted { .. } => ("No free short code available", "exhausted"),
        };

        AppError::internal(message, json!({ "reason": reason }))
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(code) => {
                AppError::not_found("Original url not found", json!({ "code": code }))
            }
            other => {
                tracing::error!("Store error: {}", other);
                AppError::internal("Something went wrong", json!({}))
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&e).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Invalid url", details)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::unprocessable("Invalid body", json!({ "reason": rejection.body_text() }))
    }
}
