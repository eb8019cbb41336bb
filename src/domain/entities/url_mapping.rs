//! URL mapping entity: a short code bound to its original URL.

use chrono::{DateTime, Utc};

use super::ShortCode;

/// A persisted mapping from a short code to the original URL.
///
/// Created once on successful allocation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlMapping {
    pub code: ShortCode,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
}

impl UrlMapping {
    /// Creates a new UrlMapping instance.
    pub fn new(code: ShortCode, original_url: String, created_at: DateTime<Utc>) -> Self {
        Self {
            code,
            original_url,
            created_at,
        }
    }
}
