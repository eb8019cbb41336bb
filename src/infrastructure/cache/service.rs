//! Cache service trait and error types.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::ShortCode;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache connection error: {0}")]
    ConnectionError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Read-through cache of `short code -> original URL` for redirects.
///
/// Mappings never change once created, so entries only leave the cache by
/// TTL. Cache failures must never fail a redirect; callers fall back to the
/// store.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Returns the cached URL for `code`, `Ok(None)` on a miss.
    async fn get_url(&self, code: &ShortCode) -> CacheResult<Option<String>>;

    /// Stores a mapping. `ttl_seconds = None` uses the implementation default.
    async fn set_url(
        &self,
        code: &ShortCode,
        original_url: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;

    /// Short backend name for health reports.
    fn name(&self) -> &'static str;
}
