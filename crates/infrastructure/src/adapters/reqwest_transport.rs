//! HTTP transport implementation using reqwest.
//!
//! This adapter implements the `HttpTransport` port. It resolves paths
//! against the configured base URL, attaches the bearer credential and a
//! per-request id, and returns the response regardless of status; only
//! transport-level failures are errors.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use url::Url;

use portico_application::ports::HttpTransport;
use portico_domain::{ApiRequest, ApiResponse, AuthError, AuthResult, ClientSettings, HttpMethod};

/// HTTP transport backed by `reqwest::Client`.
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Creates a transport for the backend named in `settings`.
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

    /// Creates a transport around an existing reqwest client.
    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Converts the domain method to a reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Maps reqwest errors to the domain network error.
    fn map_error(error: &reqwest::Error, timeout: Duration) -> AuthError {
        if error.is_timeout() {
            return AuthError::Network(format!(
                "request timed out after {}ms",
                timeout.as_millis()
            ));
        }
        if error.is_connect() {
            return AuthError::Network(format!("connection failed: {error}"));
        }
        AuthError::Network(error.to_string())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(
        &self,
        request: &ApiRequest,
        bearer: Option<&str>,
    ) -> AuthResult<ApiResponse> {
        let url = format!("{}{}", self.base_url, request.path);
        let request_id = uuid::Uuid::new_v4();

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), &url)
            .header("x-request-id", request_id.to_string())
            .timeout(self.timeout);

        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        tracing::debug!(method = request.method.as_str(), %url, %request_id, "dispatching request");

        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_error(&e, self.timeout))?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| AuthError::Network(format!("failed to read body: {e}")))?
            .to_vec();

        Ok(ApiResponse::new(status, headers, body))
    }
}
