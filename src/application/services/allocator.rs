//! Short code allocation against the URL store.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::entities::{ShortCode, UrlMapping};
use crate::domain::repositories::{StoreError, UrlStore};
use crate::utils::code_generator::{CodeGenerator, RandomSourceError};

/// Default number of candidates generated per allocation.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// What to do when every candidate in the attempt budget collided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExhaustionPolicy {
    /// Save the last candidate anyway and let the store's uniqueness
    /// constraint decide. The save can still fail with a duplicate error.
    #[default]
    SaveLast,
    /// Give up with [`AllocationError::Exhausted`] without saving.
    Fail,
}

/// How collisions are detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AllocationStrategy {
    /// Probe [`UrlStore::exists`] for each candidate, then save the first
    /// free one. A concurrent writer can still take the code between the
    /// probe and the save; the save then fails with a persistence error.
    #[default]
    ProbeThenSave,
    /// Skip the probe and retry when the save reports a duplicate.
    InsertOnly,
}

/// Allocation tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocatorConfig {
    pub max_attempts: u32,
    pub exhaustion_policy: ExhaustionPolicy,
    pub strategy: AllocationStrategy,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            exhaustion_policy: ExhaustionPolicy::default(),
            strategy: AllocationStrategy::default(),
        }
    }
}

/// Errors returned by [`Allocator::allocate`].
#[derive(Debug, Error)]
pub enum AllocationError {
    #[error("failed to generate short code: {0}")]
    RandomSource(#[from] RandomSourceError),

    /// The existence probe failed. Never retried.
    #[error("failed to check short code: {0}")]
    Store(#[source] StoreError),

    /// The final save failed, including a duplicate discovered at write time.
    #[error("failed to save url mapping: {0}")]
    Persistence(#[source] StoreError),

    #[error("no free short code after {attempts} attempts")]
    Exhausted { attempts: u32 },
}

/// Produces a short code that is not in use and persists the mapping.
///
/// Holds no mutable state; one instance is shared by all requests.
pub struct Allocator {
    store: Arc<dyn UrlStore>,
    generator: CodeGenerator,
    config: AllocatorConfig,
}

impl Allocator {
    /// Creates an allocator. An attempt budget of 0 is treated as 1.
    pub fn new(store: Arc<dyn UrlStore>, generator: CodeGenerator, config: AllocatorConfig) -> Self {
        let config = AllocatorConfig {
            max_attempts: config.max_attempts.max(1),
            ..config
        };

        Self {
            store,
            generator,
            config,
        }
    }

    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    /// Allocates a code for `original_url` and saves the mapping.
    ///
    /// The URL is expected to be validated by the caller. Identical URLs
    /// receive independent codes.
    ///
    /// # Errors
    ///
    /// - [`AllocationError::RandomSource`] if no entropy is available
    /// - [`AllocationError::Store`] if an existence probe fails
    /// - [`AllocationError::Persistence`] if the save fails
    /// - [`AllocationError::Exhausted`] only with [`ExhaustionPolicy::Fail`]
    pub async fn allocate(&self, original_url: &str) -> Result<UrlMapping, AllocationError> {
        match self.config.strategy {
            AllocationStrategy::ProbeThenSave => self.probe_then_save(original_url).await,
            AllocationStrategy::InsertOnly => self.insert_only(original_url).await,
        }
    }

    async fn probe_then_save(&self, original_url: &str) -> Result<UrlMapping, AllocationError> {
        let max_attempts = self.config.max_attempts;
        let mut attempt = 0;

        let code = loop {
            let candidate = self.generator.generate()?;
            attempt += 1;

            let taken = self
                .store
                .exists(&candidate)
                .await
                .map_err(AllocationError::Store)?;

            if !taken {
                break candidate;
            }

            debug!(code = %candidate, attempt, "short code collision");

            if attempt >= max_attempts {
                match self.config.exhaustion_policy {
                    ExhaustionPolicy::Fail => {
                        return Err(AllocationError::Exhausted { attempts: attempt });
                    }
                    ExhaustionPolicy::SaveLast => {
                        warn!(
                            code = %candidate,
                            attempts = attempt,
                            "attempt budget exhausted, saving last candidate despite collision"
                        );
                        break candidate;
                    }
                }
            }
        };

        self.save(&code, original_url).await
    }

    async fn insert_only(&self, original_url: &str) -> Result<UrlMapping, AllocationError> {
        let max_attempts = self.config.max_attempts;

        for attempt in 1..=max_attempts {
            let candidate = self.generator.generate()?;

            match self.store.save(&candidate, original_url).await {
                Ok(mapping) => return Ok(mapping),
                Err(e) if e.is_duplicate() && attempt < max_attempts => {
                    debug!(code = %candidate, attempt, "short code collision on insert");
                }
                Err(e) if e.is_duplicate()
                    && self.config.exhaustion_policy == ExhaustionPolicy::Fail =>
                {
                    return Err(AllocationError::Exhausted { attempts: attempt });
                }
                Err(e) => return Err(AllocationError::Persistence(e)),
            }
        }

        Err(AllocationError::Exhausted {
            attempts: max_attempts,
        })
    }

    async fn save(&self, code: &ShortCode, original_url: &str) -> Result<UrlMapping, AllocationError> {
        self.store
            .save(code, original_url)
            .await
            .map_err(AllocationError::Persistence)
    }
}
