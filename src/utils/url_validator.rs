//! Validation of URLs submitted for shortening.
//!
//! URLs are checked, not rewritten: the accepted value is the input with
//! surrounding whitespace removed, so a resolved link returns exactly what
//! was submitted.

use url::Url;

/// Maximum accepted URL length, matching the `urls.original_url` column.
pub const MAX_URL_LENGTH: usize = 2048;

/// Reasons a URL is rejected.
#[derive(Debug, thiserror::Error)]
pub enum UrlValidationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("URL exceeds {MAX_URL_LENGTH} characters ({0})")]
    TooLong(usize),

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,
}

/// Checks that `input` is an absolute `http`/`https` URL with a host.
///
/// Returns the trimmed input on success.
///
/// # Errors
///
/// See [`UrlValidationError`] for the individual rejection reasons.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(validate_url(" https://example.com/a ").unwrap(), "https://example.com/a");
/// assert!(validate_url("ftp://example.com").is_err());
/// assert!(validate_url("/relative/path").is_err());
/// ```
pub fn validate_url(input: &str) -> Result<&str, UrlValidationError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    let length = trimmed.chars().count();
    if length > MAX_URL_LENGTH {
        return Err(UrlValidationError::TooLong(length));
    }

    let url = Url::parse(trimmed).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(trimmed)
}
