//! Tagged JSON envelope shared by all API responses.

use serde::Serialize;

use crate::error::ErrorInfo;

/// Either a success payload or an error, serialized as `{"data": ...}` or
/// `{"error": {...}}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiResponse<T> {
    Data(T),
    Error(ErrorInfo),
}

impl<T> ApiResponse<T> {
    pub fn data(payload: T) -> Self {
        Self::Data(payload)
    }
}
