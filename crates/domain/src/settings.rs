//! Client settings
//!
//! Configuration for the session client: backend location, timeouts and
//! token persistence attributes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::auth::StoreOptions;

/// Seconds both stored tokens remain valid: 30 days.
pub const DEFAULT_TOKEN_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 30;

/// Unauthenticated entry point (the sign-in page).
pub const ENTRY_PATH: &str = "/";

/// Authenticated landing page.
pub const HOME_PATH: &str = "/dashboard";

/// Settings for a session client instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Backend base URL.
    pub base_url: String,
    /// Timeout for ordinary outbound requests, in milliseconds.
    pub request_timeout_ms: u64,
    /// Timeout for the refresh-token exchange, in milliseconds.
    /// A timed-out refresh counts as a failed refresh.
    pub refresh_timeout_ms: u64,
    /// Seconds the persisted tokens remain valid.
    pub token_max_age_secs: i64,
    /// Path scope applied to both persisted token entries.
    pub token_path_scope: String,
    /// Destination for unauthenticated users.
    pub entry_path: String,
    /// Destination after a successful sign-in.
    pub home_path: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3333".to_string(),
            request_timeout_ms: 30_000,
            refresh_timeout_ms: 10_000,
            token_max_age_secs: DEFAULT_TOKEN_MAX_AGE_SECS,
            token_path_scope: "/".to_string(),
            entry_path: ENTRY_PATH.to_string(),
            home_path: HOME_PATH.to_string(),
        }
    }
}

impl ClientSettings {
    /// Creates settings for the given backend.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Persistence attributes for stored token pairs.
    #[must_use]
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            max_age_secs: self.token_max_age_secs,
            path: self.token_path_scope.clone(),
        }
    }

    /// Timeout applied to ordinary outbound requests.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Timeout applied to the refresh-token exchange.
    #[must_use]
    pub const fn refresh_timeout(&self) -> Duration {
        Duration::from_millis(self.refresh_timeout_ms)
    }
}
