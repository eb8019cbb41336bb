//! Link creation and resolution service.

use std::sync::Arc;

use tracing::{debug, error};

use crate::application::services::Allocator;
use crate::domain::entities::{ShortCode, UrlMapping};
use crate::domain::repositories::{StoreError, UrlStore};
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;

/// Service behind the HTTP handlers.
///
/// Shortening goes through the [`Allocator`]; resolving reads the cache first
/// and falls back to the store, filling the cache in the background.
pub struct LinkService {
    allocator: Arc<Allocator>,
    store: Arc<dyn UrlStore>,
    cache: Arc<dyn CacheService>,
    base_url: String,
}

impl LinkService {
    /// Creates a new link service.
    pub fn new(
        allocator: Arc<Allocator>,
        store: Arc<dyn UrlStore>,
        cache: Arc<dyn CacheService>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            allocator,
            store,
            cache,
            base_url: base_url.into(),
        }
    }

    /// Allocates a short code for an already validated URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] for any allocation failure.
    pub async fn shorten(&self, original_url: &str) -> Result<UrlMapping, AppError> {
        let mapping = self.allocator.allocate(original_url).await?;
        debug!("Allocated {} for {}", mapping.code, mapping.original_url);
        Ok(mapping)
    }

    /// Resolves a raw path segment to the original URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is malformed or unknown.
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn resolve(&self, raw_code: &str) -> Result<String, AppError> {
        let code = ShortCode::parse(raw_code).ok_or_else(|| {
            AppError::from(StoreError::NotFound(raw_code.to_string()))
        })?;

        match self.cache.get_url(&code).await {
            Ok(Some(url)) => return Ok(url),
            Ok(None) => {}
            Err(e) => error!("Cache error: {}", e),
        }

        let mapping = self.store.resolve(&code).await?;

        let cache = self.cache.clone();
        let url = mapping.original_url.clone();
        tokio::spawn(async move {
            if let Err(e) = cache.set_url(&code, &url, None).await {
                error!("Failed to cache URL: {}", e);
            }
        });

        Ok(mapping.original_url)
    }

    /// Builds the public short URL for a code.
    pub fn short_url(&self, code: &ShortCode) -> String {
        code.to_url(&self.base_url)
    }

    /// Checks that the backing store is reachable.
    pub async fn store_health(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }

    pub fn cache(&self) -> &Arc<dyn CacheService> {
        &self.cache
    }
}
