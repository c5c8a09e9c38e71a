//! Bearer-token authentication for the editor API.
//!
//! Every `/api` route requires `Authorization: Bearer <token>` matching
//! the shared editor token from configuration.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use secrecy::ExposeSecret;
use sha2::{Digest, Sha256};

use crate::error::AppError;
use crate::state::AppState;

/// Extractor that requires the shared editor token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(_auth: RequireEditor) -> impl IntoResponse {
///     StatusCode::NO_CONTENT
/// }
/// ```
pub struct RequireEditor;

impl FromRequestParts<AppState> for RequireEditor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let presented = header
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized)?;

        if tokens_match(presented, state.config().editor_token.expose_secret()) {
            Ok(Self)
        } else {
            Err(AppError::Unauthorized)
        }
    }
}

/// Compare tokens without leaking length or prefix timing.
///
/// Both sides are hashed first so the byte comparison always runs over
/// fixed-length digests.
fn tokens_match(presented: &str, expected: &str) -> bool {
    let a = Sha256::digest(presented.as_bytes());
    let b = Sha256::digest(expected.as_bytes());
    a == b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_tokens_accepted() {
        assert!(tokens_match("abc123", "abc123"));
    }

    #[test]
    fn test_mismatched_tokens_rejected() {
        assert!(!tokens_match("abc123", "abc124"));
        assert!(!tokens_match("abc", "abc123"));
        assert!(!tokens_match("", "abc123"));
    }
}
