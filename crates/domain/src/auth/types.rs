//! Credentials, tokens and session state

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sign-in credentials.
///
/// Ephemeral: sent to the sign-in endpoint once and never persisted.
/// `Debug` redacts the password so credentials can appear in log events
/// without leaking the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account identifier (an email address).
    pub email: String,
    /// Account secret.
    pub password: String,
}

impl Credentials {
    /// Creates credentials for a sign-in attempt.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// An access/refresh token pair.
///
/// Owned exclusively by the token store; mutated only by sign-in and by a
/// successful refresh, cleared on sign-out or an unrecoverable auth failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived credential attached to each request.
    pub access_token: String,
    /// Longer-lived credential used solely to obtain a new access token.
    pub refresh_token: String,
}

impl TokenPair {
    /// Creates a new token pair.
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

/// Persistence attributes applied to both entries of a stored token pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreOptions {
    /// Seconds the entries remain valid before the store expires them.
    pub max_age_secs: i64,
    /// Request path scope that receives the tokens (`/` means every route).
    pub path: String,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            max_age_secs: crate::settings::DEFAULT_TOKEN_MAX_AGE_SECS,
            path: "/".to_string(),
        }
    }
}

/// The authenticated user's identity and claims.
///
/// Lives only in memory for the lifetime of the process; `None` when
/// unauthenticated. The field names match the identity-check endpoint's
/// response body so a session can be deserialized from it directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Account identifier.
    pub email: String,
    /// Permission claims granted by the backend.
    #[serde(default)]
    pub permissions: Vec<String>,
    /// Role claims granted by the backend.
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Session {
    /// Creates a session from sign-in claims.
    #[must_use]
    pub fn new(email: impl Into<String>, permissions: Vec<String>, roles: Vec<String>) -> Self {
        Self {
            email: email.into(),
            permissions,
            roles,
        }
    }
}
