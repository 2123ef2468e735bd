//! Authorized request dispatcher.
//!
//! Attaches the bearer credential to every outbound request and intercepts
//! authorization failures: expired tokens are handed to the refresh
//! coordinator and the request is replayed with the new token; every other
//! 401 is fatal for the session.

use std::sync::{Arc, OnceLock, RwLock};

use portico_domain::{ApiRequest, ApiResponse, AuthError, AuthResult, classify_unauthorized};

use crate::auth::RefreshCoordinator;
use crate::ports::{HttpTransport, SessionTerminator, TokenStore};

/// Request dispatcher with transparent token renewal.
///
/// The bearer credential is read fresh from the token store at send time;
/// the only cached value is the in-memory default applied right after
/// sign-in and after a refresh completes, used when the store has no entry.
pub struct AuthorizedClient {
    transport: Arc<dyn HttpTransport>,
    store: Arc<dyn TokenStore>,
    coordinator: Arc<RefreshCoordinator>,
    /// Bound once during wiring in browser-like hosts; never bound in
    /// server-rendering contexts, where fatal errors must propagate.
    terminator: OnceLock<Arc<dyn SessionTerminator>>,
    default_bearer: RwLock<Option<String>>,
}

impl AuthorizedClient {
    /// Creates a dispatcher without a session terminator (server-rendering
    /// mode: fatal auth failures propagate to the caller).
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        store: Arc<dyn TokenStore>,
        coordinator: Arc<RefreshCoordinator>,
    ) -> Self {
        Self {
            transport,
            store,
            coordinator,
            terminator: OnceLock::new(),
            default_bearer: RwLock::new(None),
        }
    }

    /// Binds the session-terminated capability (browser-like mode).
    ///
    /// May be called at most once; later calls are ignored.
    pub fn bind_terminator(&self, terminator: Arc<dyn SessionTerminator>) {
        let _ = self.terminator.set(terminator);
    }

    /// Replaces the in-memory default bearer credential.
    pub fn set_default_bearer(&self, bearer: Option<String>) {
        if let Ok(mut default) = self.default_bearer.write() {
            *default = bearer;
        }
    }

    /// Sends a request with the current access token attached.
    ///
    /// A 401 tagged `token.expired` is absorbed: the request joins the
    /// refresh cycle and is resubmitted exactly once with the new token;
    /// that resubmission's outcome is the final outcome. Any other response
    /// is returned unchanged.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Network`] for transport failures, unchanged.
    /// - [`AuthError::TokenRejected`] for a 401 refresh cannot fix.
    /// - [`AuthError::RefreshFailed`] when the triggered refresh fails.
    ///
    /// Fatal errors run the sign-out path first when a terminator is bound.
    pub async fn send(&self, request: ApiRequest) -> AuthResult<ApiResponse> {
        let bearer = self.current_bearer().await;
        let response = self.transport.execute(&request, bearer.as_deref()).await?;

        if !response.is_unauthorized() {
            return Ok(response);
        }

        match classify_unauthorized(&response.body) {
            AuthError::TokenExpired => {
                tracing::debug!(path = %request.path, "access token expired, joining refresh cycle");
                match self.coordinator.recover().await {
                    Ok(token) => {
                        self.set_default_bearer(Some(token.clone()));
                        self.transport.execute(&request, Some(&token)).await
                    }
                    Err(error) => self.fail(error).await,
                }
            }
            error => self.fail(error).await,
        }
    }

    /// The bearer credential for this send: the stored access token, or the
    /// in-memory default when the store has no entry.
    async fn current_bearer(&self) -> Option<String> {
        match self.store.get().await {
            Some(pair) => Some(pair.access_token),
            None => self
                .default_bearer
                .read()
                .ok()
                .and_then(|default| default.clone()),
        }
    }

    /// Terminates the session (when the capability is bound) and fails the
    /// call with the fatal error.
    async fn fail(&self, error: AuthError) -> AuthResult<ApiResponse> {
        tracing::warn!(%error, "fatal authorization failure");
        if let Some(terminator) = self.terminator.get() {
            terminator.terminate().await;
        }
        Err(error)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use portico_domain::{Credentials, StoreOptions, TokenPair};

    use super::*;
    use crate::auth::MemoryTokenStore;
    use crate::ports::{AuthApi, SignInOutcome};

    fn unauthorized(code: &str) -> ApiResponse {
        ApiResponse::new(
            401,
            HashMap::new(),
            format!(r#"{{"code":"{code}"}}"#).into_bytes(),
        )
    }

    fn ok_body(body: &str) -> ApiResponse {
        ApiResponse::new(200, HashMap::new(), body.as_bytes().to_vec())
    }

    /// Transport double: pops scripted responses and records the bearer
    /// attached to each execution.
    struct ScriptedTransport {
        responses: Mutex<Vec<AuthResult<ApiResponse>>>,
        bearers: Mutex<Vec<Option<String>>>,
    }

    impl ScriptedTransport {
        fn new(mut responses: Vec<AuthResult<ApiResponse>>) -> Self {
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                bearers: Mutex::new(Vec::new()),
            }
        }

        fn bearers(&self) -> Vec<Option<String>> {
            self.bearers.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpTransport for ScriptedTransport {
        async fn execute(
            &self,
            _request: &ApiRequest,
            bearer: Option<&str>,
        ) -> AuthResult<ApiResponse> {
            self.bearers
                .lock()
                .unwrap()
                .push(bearer.map(str::to_string));
            self.responses
                .lock()
                .unwrap()
                .pop()
                .expect("transport script exhausted")
        }
    }

    struct RotatingAuthApi;

    #[async_trait]
    impl AuthApi for RotatingAuthApi {
        async fn sign_in(&self, _credentials: &Credentials) -> AuthResult<SignInOutcome> {
            panic!("sign_in is not part of the dispatch flow");
        }

        async fn refresh(&self, _refresh_token: &str) -> AuthResult<TokenPair> {
            Ok(TokenPair::new("T2", "R2"))
        }
    }

    #[derive(Default)]
    struct CountingTerminator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SessionTerminator for CountingTerminator {
        async fn terminate(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    async fn client_with(
        responses: Vec<AuthResult<ApiResponse>>,
    ) -> (AuthorizedClient, Arc<ScriptedTransport>, Arc<MemoryTokenStore>) {
        let transport = Arc::new(ScriptedTransport::new(responses));
        let store = Arc::new(MemoryTokenStore::new());
        store
            .set(TokenPair::new("T1", "R1"), StoreOptions::default())
            .await;
        let coordinator = Arc::new(RefreshCoordinator::new(
            store.clone(),
            Arc::new(RotatingAuthApi),
            StoreOptions::default(),
            Duration::from_secs(10),
        ));
        let client = AuthorizedClient::new(transport.clone(), store.clone(), coordinator);
        (client, transport, store)
    }

    #[tokio::test]
    async fn attaches_stored_token_and_passes_success_through() {
        let (client, transport, _store) = client_with(vec![Ok(ok_body("{}"))]).await;

        let response = client.send(ApiRequest::get("/me")).await.unwrap();
        assert!(response.is_success());
        assert_eq!(transport.bearers(), vec![Some("T1".to_string())]);
    }

    #[tokio::test]
    async fn non_unauthorized_failures_pass_through_unchanged() {
        let (client, _transport, _store) =
            client_with(vec![Ok(ApiResponse::new(500, HashMap::new(), Vec::new()))]).await;

        let response = client.send(ApiRequest::get("/metrics")).await.unwrap();
        assert_eq!(response.status, 500);
    }

    #[tokio::test]
    async fn network_errors_propagate_unchanged() {
        let (client, _transport, _store) = client_with(vec![Err(AuthError::Network(
            "connection refused".to_string(),
        ))])
        .await;

        let error = client.send(ApiRequest::get("/me")).await.unwrap_err();
        assert_eq!(error, AuthError::Network("connection refused".to_string()));
    }

    #[tokio::test]
    async fn expired_token_is_refreshed_and_request_replayed() {
        let (client, transport, store) =
            client_with(vec![Ok(unauthorized("token.expired")), Ok(ok_body("{}"))]).await;

        let response = client.send(ApiRequest::get("/me")).await.unwrap();
        assert!(response.is_success());

        // First attempt with the stale token, replay with the rotated one.
        assert_eq!(
            transport.bearers(),
            vec![Some("T1".to_string()), Some("T2".to_string())]
        );
        assert_eq!(store.get().await.unwrap(), TokenPair::new("T2", "R2"));
    }

    #[tokio::test]
    async fn fatal_unauthorized_terminates_session_when_bound() {
        let (client, _transport, _store) =
            client_with(vec![Ok(unauthorized("other.error"))]).await;
        let terminator = Arc::new(CountingTerminator::default());
        client.bind_terminator(terminator.clone());

        let error = client.send(ApiRequest::get("/me")).await.unwrap_err();
        assert_eq!(error, AuthError::TokenRejected("other.error".to_string()));
        assert_eq!(terminator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn fatal_unauthorized_propagates_in_server_context() {
        let (client, _transport, store) =
            client_with(vec![Ok(unauthorized("other.error"))]).await;

        let error = client.send(ApiRequest::get("/me")).await.unwrap_err();
        assert!(error.is_fatal());
        // No terminator bound: the store is untouched, the guard decides.
        assert!(store.get().await.is_some());
    }

    #[tokio::test]
    async fn default_bearer_is_used_when_store_is_empty() {
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(ok_body("{}"))]));
        let store = Arc::new(MemoryTokenStore::new());
        let coordinator = Arc::new(RefreshCoordinator::new(
            store.clone(),
            Arc::new(RotatingAuthApi),
            StoreOptions::default(),
            Duration::from_secs(10),
        ));
        let client = AuthorizedClient::new(transport.clone(), store, coordinator);
        client.set_default_bearer(Some("T0".to_string()));

        client.send(ApiRequest::get("/me")).await.unwrap();
        assert_eq!(transport.bearers(), vec![Some("T0".to_string())]);
    }
}
