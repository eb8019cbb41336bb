//! URL store implementations.
//!
//! # Stores
//!
//! - [`PgUrlStore`] - PostgreSQL via SQLx, schema managed by embedded migrations
//! - [`MemoryUrlStore`] - In-process map for development and tests

pub mod memory_url_store;
pub mod pg_url_store;

pub use memory_url_store::MemoryUrlStore;
pub use pg_url_store::PgUrlStore;
