//! HTTP transport port

use async_trait::async_trait;
use portico_domain::{ApiRequest, ApiResponse, AuthResult};

/// Port for raw HTTP execution.
///
/// The transport performs exactly one network call: it resolves the request
/// path against the backend base URL, attaches the given bearer credential
/// (if any) and returns the response regardless of status. Only
/// transport-level failures are errors.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Executes the request once.
    ///
    /// # Errors
    ///
    /// Returns [`portico_domain::AuthError::Network`] when the call cannot
    /// be completed (connection failure, timeout, invalid URL).
    async fn execute(&self, request: &ApiRequest, bearer: Option<&str>)
    -> AuthResult<ApiResponse>;
}
