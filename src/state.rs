//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::api::middleware::owner::OwnerCookie;
use crate::application::services::ShortenerService;
use crate::domain::repositories::UrlRepository;

/// Shortener service over whichever repository the server was started with.
pub type DynShortenerService = ShortenerService<dyn UrlRepository>;

#[derive(Clone)]
pub struct AppState {
    pub shortener: Arc<DynShortenerService>,
    /// Prefix for returned short links, without trailing slash.
    pub base_url: String,
    pub owner_cookie: OwnerCookie,
}

impl AppState {
    pub fn new(
        shortener: Arc<DynShortenerService>,
        base_url: impl Into<String>,
        owner_cookie: OwnerCookie,
    ) -> Self {
        Self {
            shortener,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            owner_cookie,
        }
    }

    /// Builds the public short URL for `code`.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/r/{}", self.base_url, code)
    }
}
