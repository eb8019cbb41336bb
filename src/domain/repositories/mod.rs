//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access so the allocation logic never touches a
//! database handle directly. Concrete stores live in
//! `crate::infrastructure::persistence` and are injected at construction.
//!
//! # Available Repositories
//!
//! - [`UrlStore`] - Short code existence checks, saves and lookups
//!
//! Mock implementations are generated via `mockall` for unit tests.

pub mod url_store;

pub use url_store::{StoreError, UrlStore};

#[cfg(test)]
pub use url_store::MockUrlStore;
