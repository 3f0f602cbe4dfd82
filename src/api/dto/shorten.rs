//! DTOs for link creation endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to shorten a URL with a generated code.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The destination URL (must be HTTP or HTTPS after normalization).
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub url: String,
}

/// Request to shorten a URL under a caller-chosen alias.
///
/// The alias is deliberately unchecked here: length and character-set rules
/// live in the service layer so every violation reports `invalid_alias`
/// rather than a generic validation failure.
#[derive(Debug, Deserialize, Validate)]
pub struct CustomShortenRequest {
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub url: String,

    pub alias: String,
}

/// Successful shorten response.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub code: String,
    pub short_url: String,
}
