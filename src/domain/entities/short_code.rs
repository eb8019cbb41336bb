//! Short code value type.

use serde::Serialize;
use std::fmt;

/// The default 62-symbol alphabet: digits, upper case, lower case.
pub const DEFAULT_ALPHABET: &[u8; 62] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Default number of symbols in a generated code.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Longest code accepted from the outside world (matches the `urls.code` column).
pub const MAX_CODE_LENGTH: usize = 32;

/// Codes that coincide with static path segments under `/api` and so could
/// never be reached through `GET /api/{code}`.
pub const RESERVED_CODES: &[&str] = &["shorten"];

/// An opaque short code identifying a [`super::UrlMapping`].
///
/// Codes produced by the generator are trusted and wrapped with
/// [`ShortCode::new_unchecked`]. Codes coming from request paths go through
/// [`ShortCode::parse`], which only checks the shape; whether a code is in use
/// is decided by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ShortCode(String);

impl ShortCode {
    /// Wraps a code produced by a trusted source without validation.
    pub fn new_unchecked(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Parses a code from untrusted input.
    ///
    /// Returns `None` if the input is empty, longer than [`MAX_CODE_LENGTH`],
    /// or contains anything other than ASCII letters and digits.
    pub fn parse(input: &str) -> Option<Self> {
        if input.is_empty() || input.len() > MAX_CODE_LENGTH {
            return None;
        }

        if !input.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return None;
        }

        Some(Self(input.to_string()))
    }

    /// Whether the code is shadowed by a static route.
    pub fn is_reserved(&self) -> bool {
        RESERVED_CODES.contains(&self.0.as_str())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Builds the public short URL under `base_url`.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/api/{}", base_url.trim_end_matches('/'), self.0)
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ShortCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShortCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
