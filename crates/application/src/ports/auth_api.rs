//! Auth backend port

use async_trait::async_trait;
use portico_domain::{AuthResult, Credentials, Session, TokenPair};

/// Result of a successful sign-in: the token pair to persist and the
/// session derived from the returned claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInOutcome {
    /// Tokens to hand to the token store.
    pub tokens: TokenPair,
    /// Identity and claims for the in-memory session.
    pub session: Session,
}

/// Port for the authentication endpoints of the backend.
///
/// Covers only the unauthenticated surface (sign-in and the refresh-token
/// exchange); authenticated calls go through the dispatcher so they benefit
/// from transparent token renewal.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchanges credentials for a token pair and claims.
    ///
    /// # Errors
    ///
    /// Returns [`portico_domain::AuthError::Credentials`] when the backend
    /// rejects the credentials, [`portico_domain::AuthError::Network`] on
    /// transport failures.
    async fn sign_in(&self, credentials: &Credentials) -> AuthResult<SignInOutcome>;

    /// Exchanges a refresh token for a rotated token pair.
    ///
    /// # Errors
    ///
    /// Returns [`portico_domain::AuthError::RefreshFailed`] when the backend
    /// rejects the exchange, [`portico_domain::AuthError::Network`] on
    /// transport failures.
    async fn refresh(&self, refresh_token: &str) -> AuthResult<TokenPair>;
}
