//! Anonymous owner cookie middleware.
//!
//! Every shorten request is attributed to an opaque owner token kept by the
//! client in the `owner_id` cookie. A missing or malformed cookie gets a fresh
//! token, which is sent back with `Set-Cookie`. Handlers read the token via
//! the [`OwnerId`] request extension.

use axum::{
    extract::{Request, State},
    http::{
        HeaderMap, HeaderValue,
        header::{COOKIE, SET_COOKIE},
    },
    middleware::Next,
    response::Response,
};
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::owner_token::{generate_owner_token, is_valid_owner_token};

/// Name of the cookie carrying the owner token.
pub const OWNER_COOKIE_NAME: &str = "owner_id";

/// Owner token of the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerId(pub String);

/// Attributes of the issued owner cookie.
#[derive(Debug, Clone)]
pub struct OwnerCookie {
    pub max_age_days: u64,
    /// Adds the `Secure` attribute. Disable only for plain-HTTP local setups.
    pub secure: bool,
}

impl OwnerCookie {
    pub fn new(max_age_days: u64, secure: bool) -> Self {
        Self {
            max_age_days,
            secure,
        }
    }

    /// Renders the `Set-Cookie` value for `token`.
    pub fn header_value(&self, token: &str) -> String {
        let max_age = self.max_age_days.saturating_mul(24 * 60 * 60);
        let secure = if self.secure { "; Secure" } else { "" };

        format!(
            "{OWNER_COOKIE_NAME}={token}; Max-Age={max_age}; Path=/; HttpOnly; SameSite=Strict{secure}"
        )
    }
}

impl Default for OwnerCookie {
    fn default() -> Self {
        Self::new(30, true)
    }
}

/// Extracts a cookie value by name from the `Cookie` header.
fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|cookie_header| cookie_header.to_str().ok())
        .flat_map(|cookie_str| cookie_str.split(';'))
        .find_map(|cookie| {
            let mut parts = cookie.trim().splitn(2, '=');
            match (parts.next(), parts.next()) {
                (Some(key), Some(value)) if key == name => Some(value.trim().to_string()),
                _ => None,
            }
        })
}

/// Attaches an [`OwnerId`] to the request, issuing a new cookie when needed.
///
/// # Example
///
/// ```rust,ignore
/// let routes = Router::new()
///     .route("/shorten", post(shorten_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), owner::layer));
/// ```
///
/// # Errors
///
/// Returns [`AppError::Internal`] if a new token cannot be generated.
pub async fn layer(
    State(st): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let existing = read_cookie(req.headers(), OWNER_COOKIE_NAME)
        .filter(|token| is_valid_owner_token(token));

    let (token, issued) = match existing {
        Some(token) => (token, false),
        None => (generate_owner_token()?, true),
    };

    req.extensions_mut().insert(OwnerId(token.clone()));

    let mut response = next.run(req).await;

    if issued {
        let value = HeaderValue::from_str(&st.owner_cookie.header_value(&token)).map_err(|e| {
            AppError::internal(
                "Failed to build owner cookie",
                json!({ "reason": e.to_string() }),
            )
        })?;
        response.headers_mut().append(SET_COOKIE, value);
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; owner_id=abc123; lang=en"),
        );

        assert_eq!(
            read_cookie(&headers, OWNER_COOKIE_NAME).as_deref(),
            Some("abc123")
        );
    }

    #[test]
    fn test_read_cookie_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark"));

        assert!(read_cookie(&headers, OWNER_COOKIE_NAME).is_none());
        assert!(read_cookie(&HeaderMap::new(), OWNER_COOKIE_NAME).is_none());
    }

    #[test]
    fn test_read_cookie_ignores_prefix_match() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("owner_id_old=zzz"));

        assert!(read_cookie(&headers, OWNER_COOKIE_NAME).is_none());
    }

    #[test]
    fn test_cookie_header_value() {
        let value = OwnerCookie::default().header_value("deadbeef");

        assert!(value.starts_with("owner_id=deadbeef;"));
        assert!(value.contains("Max-Age=2592000"));
        assert!(value.contains("HttpOnly"));
        assert!(value.contains("SameSite=Strict"));
        assert!(value.ends_with("; Secure"));
    }

    #[test]
    fn test_cookie_without_secure() {
        let value = OwnerCookie::new(1, false).header_value("t");
        assert!(value.contains("Max-Age=86400"));
        assert!(!value.contains("Secure"));
    }
}
