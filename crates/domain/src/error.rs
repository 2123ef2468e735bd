//! Authentication error taxonomy

use thiserror::Error;

/// Errors raised by the session and request layer.
///
/// The variants split into three propagation classes:
/// - `Credentials` is surfaced to the sign-in caller with no state mutated.
/// - `TokenExpired` is transient and absorbed by the refresh coordinator;
///   callers only observe it indirectly if the subsequent refresh fails.
/// - `TokenRejected` and `RefreshFailed` are fatal for the session and
///   trigger a global sign-out (or propagate to the route guard in a
///   server-rendering context).
///
/// `Clone` is required so a single failed refresh can settle every queued
/// request with the same error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Sign-in was rejected by the backend.
    #[error("credentials rejected: {0}")]
    Credentials(String),

    /// The access token expired; recoverable via the refresh token.
    #[error("access token expired")]
    TokenExpired,

    /// Authorization failed for a reason refresh cannot fix (revoked,
    /// malformed, unknown cause).
    #[error("authorization rejected: {0}")]
    TokenRejected(String),

    /// The refresh-token exchange itself failed or timed out.
    #[error("token refresh failed: {0}")]
    RefreshFailed(String),

    /// Transport-level failure; propagated to the caller unchanged.
    #[error("network error: {0}")]
    Network(String),
}

impl AuthError {
    /// Returns true if this error terminates the session.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::TokenRejected(_) | Self::RefreshFailed(_))
    }
}

/// Result type alias for auth operations.
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fatal_classification() {
        assert!(AuthError::TokenRejected("revoked".to_string()).is_fatal());
        assert!(AuthError::RefreshFailed("timeout".to_string()).is_fatal());
        assert!(!AuthError::TokenExpired.is_fatal());
        assert!(!AuthError::Credentials("bad password".to_string()).is_fatal());
        assert!(!AuthError::Network("connection reset".to_string()).is_fatal());
    }

    #[test]
    fn display_messages() {
        assert_eq!(AuthError::TokenExpired.to_string(), "access token expired");
        assert_eq!(
            AuthError::RefreshFailed("boom".to_string()).to_string(),
            "token refresh failed: boom"
        );
    }
}
