//! Short link creation and resolution service.

use std::sync::Arc;

use serde_json::json;

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::code_generator::CodeGenerator;
use crate::utils::url_validator::validate_url;

/// Default number of insert attempts before giving up on a unique code.
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// Service for creating and resolving short links.
///
/// The service keeps no mutable state of its own. Code uniqueness is left to
/// the repository's storage constraint, and the code generator is an explicit
/// dependency so tests can script it.
///
/// Both operations are cancel-safe: dropping a pending future aborts the
/// single storage call in flight, and a write either commits whole or not at
/// all.
pub struct ShortenerService<R: UrlRepository + ?Sized> {
    repository: Arc<R>,
    generator: Arc<dyn CodeGenerator>,
    max_attempts: usize,
}

impl<R: UrlRepository + ?Sized> ShortenerService<R> {
    /// Creates a new shortener service with [`DEFAULT_MAX_ATTEMPTS`].
    pub fn new(repository: Arc<R>, generator: Arc<dyn CodeGenerator>) -> Self {
        Self {
            repository,
            generator,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Overrides the number of insert attempts. Values below 1 are raised to 1.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Shortens `original_url` on behalf of `owner_id`.
    ///
    /// The URL is validated here even if the caller already did so. It is
    /// stored exactly as given, minus surrounding whitespace.
    ///
    /// # Collision Handling
    ///
    /// A fresh code is generated for each attempt. When storage rejects the
    /// code as a duplicate the attempt is repeated with a new code, up to
    /// `max_attempts` times. No other error is retried.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is not an absolute http(s)
    /// URL or `owner_id` is blank.
    ///
    /// Returns [`AppError::CodeGenerationExhausted`] if every attempt collided.
    ///
    /// Returns [`AppError::Internal`] on storage failures.
    pub async fn shorten(&self, original_url: &str, owner_id: &str) -> Result<UrlRecord, AppError> {
        let original_url = validate_url(original_url).map_err(|e| {
            AppError::bad_request("Invalid URL", json!({ "reason": e.to_string() }))
        })?;

        let owner_id = owner_id.trim();
        if owner_id.is_empty() {
            return Err(AppError::bad_request(
                "Owner id must not be empty",
                json!({ "field": "owner_id" }),
            ));
        }

        for attempt in 1..=self.max_attempts {
            let new_record = NewUrlRecord {
                original_url: original_url.to_string(),
                short_code: self.generator.generate(),
                owner_id: owner_id.to_string(),
            };

            match self.repository.insert(new_record).await {
                Ok(record) => {
                    metrics::counter!("tinylink_links_created_total").increment(1);
                    tracing::info!(
                        id = record.id,
                        code = %record.short_code,
                        attempt,
                        "Short link created"
                    );
                    return Ok(record);
                }
                Err(e) if e.is_conflict() => {
                    metrics::counter!("tinylink_code_collisions_total").increment(1);
                    tracing::warn!(attempt, "code collision, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        metrics::counter!("tinylink_code_generation_exhausted_total").increment(1);
        tracing::error!(
            attempts = self.max_attempts,
            code_length = self.generator.code_length(),
            "Failed to generate unique code"
        );

        Err(AppError::exhausted(
            "Failed to generate unique code",
            json!({
                "reason": "Too many collisions",
                "attempts": self.max_attempts,
            }),
        ))
    }

    /// Resolves a short code to its original URL.
    ///
    /// Blank codes resolve to `None` without touching storage. Matching is
    /// exact and case-sensitive.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage failures.
    pub async fn resolve(&self, short_code: &str) -> Result<Option<String>, AppError> {
        if short_code.trim().is_empty() {
            return Ok(None);
        }

        let found = self
            .repository
            .find_by_code(short_code)
            .await?
            .map(|record| record.original_url);

        let outcome = if found.is_some() { "hit" } else { "miss" };
        metrics::counter!("tinylink_resolve_total", "outcome" => outcome).increment(1);

        if found.is_none() {
            tracing::debug!(code = %short_code, "Short code not found");
        }

        Ok(found)
    }

    /// Checks that the repository is reachable.
    pub async fn health_check(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }
}
