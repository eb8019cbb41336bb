//! In-process implementation of the URL store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::domain::entities::{ShortCode, UrlMapping};
use crate::domain::repositories::{StoreError, UrlStore};

/// URL store backed by a concurrent hash map.
///
/// Uniqueness is enforced atomically through the map's entry API. Contents
/// are lost on restart, so this backend suits development and tests.
#[derive(Debug, Default)]
pub struct MemoryUrlStore {
    storage: DashMap<String, (String, DateTime<Utc>)>,
}

impl MemoryUrlStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored mappings.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl UrlStore for MemoryUrlStore {
    async fn exists(&self, code: &ShortCode) -> Result<bool, StoreError> {
        Ok(self.storage.contains_key(code.as_str()))
    }

    async fn save(&self, code: &ShortCode, original_url: &str) -> Result<UrlMapping, StoreError> {
        match self.storage.entry(code.as_str().to_owned()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate(code.to_string())),
            Entry::Vacant(slot) => {
                let created_at = Utc::now();
                slot.insert((original_url.to_owned(), created_at));
                Ok(UrlMapping::new(
                    code.clone(),
                    original_url.to_owned(),
                    created_at,
                ))
            }
        }
    }

    async fn resolve(&self, code: &ShortCode) -> Result<UrlMapping, StoreError> {
        let entry = self
            .storage
            .get(code.as_str())
            .ok_or_else(|| StoreError::NotFound(code.to_string()))?;

        let (original_url, created_at) = entry.value();
        Ok(UrlMapping::new(code.clone(), original_url.clone(), *created_at))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
