//! Store trait for URL mappings.

use crate::domain::entities::{ShortCode, UrlMapping};
use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by a [`UrlStore`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No mapping exists for the requested code.
    #[error("short code not found: {0}")]
    NotFound(String),

    /// The code is already taken; raised by the uniqueness constraint on save.
    #[error("short code already exists: {0}")]
    Duplicate(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The backend could not be reached or answered with an unexpected error.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate(_))
    }
}

/// Durable key-value storage for short code mappings.
///
/// Implementations must enforce uniqueness of `code` at save time. That
/// constraint is the only guard against two concurrent allocations picking
/// the same code between [`UrlStore::exists`] and [`UrlStore::save`].
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlStore`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryUrlStore`] - In-process map
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlStore: Send + Sync {
    /// Returns whether a mapping for `code` exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] or [`StoreError::Unavailable`] when the
    /// backend cannot answer. Never returns [`StoreError::NotFound`].
    async fn exists(&self, code: &ShortCode) -> Result<bool, StoreError>;

    /// Durably persists a new mapping and returns it with its creation time.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Duplicate`] if `code` is already taken.
    async fn save(&self, code: &ShortCode, original_url: &str) -> Result<UrlMapping, StoreError>;

    /// Looks up the mapping for `code`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no mapping exists.
    async fn resolve(&self, code: &ShortCode) -> Result<UrlMapping, StoreError>;

    /// Checks that the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
