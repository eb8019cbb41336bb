//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`ShortCode`] - An opaque code drawn from a fixed alphabet
//! - [`UrlMapping`] - A short code bound to its original URL
//!
//! Entities are plain data structures without I/O.

pub mod short_code;
pub mod url_mapping;

pub use short_code::{
    DEFAULT_ALPHABET, DEFAULT_CODE_LENGTH, MAX_CODE_LENGTH, RESERVED_CODES, ShortCode,
};
pub use url_mapping::UrlMapping;
