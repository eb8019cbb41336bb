//! DTOs for link shortening endpoint.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The original URL to shorten (must be absolute HTTP/HTTPS).
    #[validate(
        url(message = "Invalid URL format"),
        custom(function = "validate_http_scheme")
    )]
    pub url: String,
}

impl ShortenRequest {
    /// The URL in its parsed, serialized form.
    ///
    /// Parsing drops tab and newline characters, punycodes the host and
    /// percent-encodes non-ASCII path bytes, so the result is always a valid
    /// `Location` header value. Returns `None` if the URL does not parse.
    pub fn normalized_url(&self) -> Option<String> {
        url::Url::parse(&self.url).ok().map(String::from)
    }
}

/// Payload of a successful shorten call.
#[derive(Debug, Serialize)]
pub struct ShortenData {
    pub code: String,
    pub short_url: String,
}

fn validate_http_scheme(value: &str) -> Result<(), ValidationError> {
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() => Ok(()),
        _ => Err(ValidationError::new("scheme")
            .with_message("URL must use http or https".into())),
    }
}
