//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use crate::domain::entities::ShortCode;
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, info, warn};

/// Redis cache implementation for fast redirect lookups.
///
/// Uses `ConnectionManager` for automatic reconnection. Operations are
/// fail-open: errors are logged and reported as misses.
pub struct RedisCache {
    client: ConnectionManager,
    default_ttl: u64,
    key_prefix: String,
}

impl RedisCache {
    /// Connects to Redis, validates the connection with a PING, and configures the default TTL.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let mut manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        manager
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        Ok(Self {
            client: manager,
            default_ttl: default_ttl_seconds,
            key_prefix: "shorty:url:".to_string(),
        })
    }

    fn build_key(&self, code: &ShortCode) -> String {
        format!("{}{}", self.key_prefix, code)
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_url(&self, code: &ShortCode) -> CacheResult<Option<String>> {
        let key = self.build_key(code);
        let mut conn = self.client.clone();

        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(url)) => {
                debug!("Cache HIT: {}", code);
                Ok(Some(url))
            }
            Ok(None) => {
                debug!("Cache MISS: {}", code);
                Ok(None)
            }
            Err(e) => {
                warn!("Redis GET error for {}: {}", code, e);
                Ok(None)
            }
        }
    }

    async fn set_url(
        &self,
        code: &ShortCode,
        original_url: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let key = self.build_key(code);
        let mut conn = self.client.clone();
        let ttl = ttl_seconds.unwrap_or(self.default_ttl);

        if let Err(e) = conn.set_ex::<_, _, ()>(&key, original_url, ttl).await {
            warn!("Redis SET error for {}: {}", code, e);
        } else {
            debug!("Cache SET: {} (TTL: {}s)", code, ttl);
        }

        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
