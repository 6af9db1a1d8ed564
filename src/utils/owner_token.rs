//! Anonymous owner tokens.
//!
//! A token is an opaque correlation id held by the client in a cookie. It
//! carries no authority; it only groups links created by the same client.

use crate::error::AppError;
use serde_json::json;

/// Random bytes per token before hex encoding.
const TOKEN_BYTES: usize = 16;

/// Longest token accepted back from a client.
pub const MAX_OWNER_TOKEN_LENGTH: usize = 64;

/// Generates a new 32-character lowercase hex token.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the OS random source fails.
pub fn generate_owner_token() -> Result<String, AppError> {
    let mut buffer = [0u8; TOKEN_BYTES];

    getrandom::fill(&mut buffer).map_err(|e| {
        AppError::internal(
            "Failed to generate owner token",
            json!({ "reason": e.to_string() }),
        )
    })?;

    Ok(hex::encode(buffer))
}

/// Returns `true` if a client-supplied token is well formed.
///
/// Accepts 1 to [`MAX_OWNER_TOKEN_LENGTH`] characters of `[A-Za-z0-9-]`, which
/// covers both our hex tokens and UUIDs issued by older clients.
pub fn is_valid_owner_token(token: &str) -> bool {
    !token.is_empty()
        && token.len() <= MAX_OWNER_TOKEN_LENGTH
        && token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_token_format() {
        let token = generate_owner_token().unwrap();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(is_valid_owner_token(&token));
    }

    #[test]
    fn test_tokens_differ() {
        assert_ne!(generate_owner_token().unwrap(), generate_owner_token().unwrap());
    }

    #[test]
    fn test_token_validation() {
        assert!(is_valid_owner_token("3f2504e0-4f89-11d3-9a0c-0305e82c3301"));
        assert!(!is_valid_owner_token(""));
        assert!(!is_valid_owner_token("has space"));
        assert!(!is_valid_owner_token("semi;colon"));
        assert!(!is_valid_owner_token(&"a".repeat(MAX_OWNER_TOKEN_LENGTH + 1)));
    }
}
