//! Reqwest-backed client for the authentication endpoints.
//!
//! Implements the `AuthApi` port against the backend's wire contract:
//! `POST /sessions` for sign-in and `POST /refresh` for the refresh-token
//! exchange (the refresh token rotates every cycle).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use portico_application::ports::{AuthApi, SignInOutcome};
use portico_domain::{AuthError, AuthResult, ClientSettings, Credentials, Session, TokenPair};

/// Sign-in request body.
#[derive(Debug, Serialize)]
struct SignInBody<'a> {
    email: &'a str,
    password: &'a str,
}

/// Sign-in response: tokens plus the claims the session is derived from.
#[derive(Debug, Deserialize)]
struct SessionResponse {
    token: String,
    #[serde(rename = "refreshToken")]
    refresh_token: String,
    #[serde(default)]
    permissions: Vec<String>,
    #[serde(default)]
    roles: Vec<String>,
}

/// Refresh request body.
#[derive(Debug, Serialize)]
struct RefreshBody<'a> {
    #[serde(rename = "refreshToken")]
    refresh_token: &'a str,
}

/// Refresh response: the rotated token pair.
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    token: String,
    #[serde(rename = "refreshToken")]
    refresh_token: String,
}

/// Machine-readable portion of an auth error body.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Auth endpoint client backed by `reqwest::Client`.
pub struct HttpAuthApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpAuthApi {
    /// Creates a client for the backend named in `settings`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the client cannot be
    /// built.
    pub fn new(settings: &ClientSettings) -> AuthResult<Self> {
        let base = Url::parse(&settings.base_url)
            .map_err(|e| AuthError::Network(format!("invalid base URL: {e}")))?;

        let client = Client::builder()
            .user_agent("Portico/0.1.0")
            .build()
            .map_err(|e| AuthError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base.as_str().trim_end_matches('/').to_string(),
            timeout: settings.request_timeout(),
        })
    }

    /// Extracts a human-readable message from an error body, falling back
    /// to the given default.
    fn error_message(body: &[u8], fallback: &str) -> String {
        serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|parsed| parsed.message)
            .unwrap_or_else(|| fallback.to_string())
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn sign_in(&self, credentials: &Credentials) -> AuthResult<SignInOutcome> {
        let url = format!("{}/sessions", self.base_url);
        let body = SignInBody {
            email: &credentials.email,
            password: &credentials.password,
        };

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .bytes()
                .await
                .map(|bytes| bytes.to_vec())
                .unwrap_or_default();
            let message =
                Self::error_message(&body, &format!("sign-in rejected with status {status}"));
            // Only a 4xx is a verdict on the credentials; a failing backend
            // is a transport problem.
            return Err(if status.is_server_error() {
                AuthError::Network(message)
            } else {
                AuthError::Credentials(message)
            });
        }

        let parsed: SessionResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Network(format!("failed to parse sign-in response: {e}")))?;

        Ok(SignInOutcome {
            tokens: TokenPair::new(parsed.token, parsed.refresh_token),
            session: Session::new(credentials.email.clone(), parsed.permissions, parsed.roles),
        })
    }

    async fn refresh(&self, refresh_token: &str) -> AuthResult<TokenPair> {
        let url = format!("{}/refresh", self.base_url);
        let body = RefreshBody { refresh_token };

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .bytes()
                .await
                .map(|bytes| bytes.to_vec())
                .unwrap_or_default();
            return Err(AuthError::RefreshFailed(Self::error_message(
                &body,
                &format!("refresh rejected with status {status}"),
            )));
        }

        let parsed: RefreshResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Network(format!("failed to parse refresh response: {e}")))?;

        Ok(TokenPair::new(parsed.token, parsed.refresh_token))
    }
}
