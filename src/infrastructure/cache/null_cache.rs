//! No-op cache implementation for disabled caching.

use super::service::{CacheResult, CacheService};
use crate::domain::entities::ShortCode;
use async_trait::async_trait;
use tracing::debug;

/// A cache implementation that does nothing.
///
/// Used when Redis is not configured or the connection fails at startup.
/// Every lookup is a miss.
pub struct NullCache;

impl NullCache {
    /// Creates a new NullCache instance.
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheService for NullCache {
    async fn get_url(&self, _code: &ShortCode) -> CacheResult<Option<String>> {
        Ok(None)
    }

    async fn set_url(
        &self,
        _code: &ShortCode,
        _original_url: &str,
        _ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_null_cache_always_misses() {
        let cache = NullCache::new();
        let code = ShortCode::new_unchecked("abc123");

        cache
            .set_url(&code, "https://example.com", None)
            .await
            .unwrap();

        assert!(cache.get_url(&code).await.unwrap().is_none());
        assert!(cache.health_check().await);
    }
}
