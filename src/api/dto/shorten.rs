//! DTOs for the link shortening endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::UrlRecord;

/// Request to shorten a single URL.
///
/// `urlOriginal` is accepted as an alias for older frontends.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The original URL to shorten (must be an absolute HTTP/HTTPS URL).
    #[serde(alias = "urlOriginal")]
    #[validate(
        length(min = 1, max = 2048, message = "URL must be 1-2048 characters"),
        url(message = "Invalid URL format")
    )]
    pub url: String,
}

/// A newly created short link.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    pub short_url: String,
    pub created_at: DateTime<Utc>,
}

impl ShortenResponse {
    pub fn from_record(record: UrlRecord, short_url: String) -> Self {
        Self {
            id: record.id,
            original_url: record.original_url,
            short_code: record.short_code,
            short_url,
            created_at: record.created_at,
        }
    }
}
