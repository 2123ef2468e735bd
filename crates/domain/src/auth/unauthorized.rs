//! Classification of 401 responses.
//!
//! The backend tags an expired access token with a stable machine-readable
//! code in the 401 body; every other 401 cause is fatal for the session.

use serde::Deserialize;

use crate::error::AuthError;

/// Sentinel code the backend sends when the access token has expired,
/// as opposed to any other 401 cause.
pub const TOKEN_EXPIRED_CODE: &str = "token.expired";

/// Machine-readable portion of a 401 body.
#[derive(Debug, Deserialize)]
struct UnauthorizedBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Classifies a 401 response body.
///
/// Returns [`AuthError::TokenExpired`] when the body carries the
/// [`TOKEN_EXPIRED_CODE`] sentinel, and [`AuthError::TokenRejected`] for
/// every other 401 (missing body, unparseable body, or a different code).
#[must_use]
pub fn classify_unauthorized(body: &[u8]) -> AuthError {
    let Ok(parsed) = serde_json::from_slice::<UnauthorizedBody>(body) else {
        return AuthError::TokenRejected("unauthorized".to_string());
    };

    match parsed.code {
        Some(code) if code == TOKEN_EXPIRED_CODE => AuthError::TokenExpired,
        Some(code) => AuthError::TokenRejected(parsed.message.unwrap_or(code)),
        None => AuthError::TokenRejected(
            parsed.message.unwrap_or_else(|| "unauthorized".to_string()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn expired_sentinel_is_transient() {
        let body = br#"{"code":"token.expired"}"#;
        assert_eq!(classify_unauthorized(body), AuthError::TokenExpired);
    }

    #[test]
    fn other_code_is_fatal() {
        let body = br#"{"code":"other.error"}"#;
        assert_eq!(
            classify_unauthorized(body),
            AuthError::TokenRejected("other.error".to_string())
        );
    }

    #[test]
    fn message_is_preferred_over_code() {
        let body = br#"{"code":"token.revoked","message":"token was revoked"}"#;
        assert_eq!(
            classify_unauthorized(body),
            AuthError::TokenRejected("token was revoked".to_string())
        );
    }

    #[test]
    fn empty_or_unparseable_body_is_fatal() {
        assert_eq!(
            classify_unauthorized(b""),
            AuthError::TokenRejected("unauthorized".to_string())
        );
        assert_eq!(
            classify_unauthorized(b"not json"),
            AuthError::TokenRejected("unauthorized".to_string())
        );
    }
}
