//! Session lifecycle management.
//!
//! Sign-in, sign-out and eager revalidation on process start. The session
//! is non-empty exactly when a sign-in or identity check has succeeded
//! since the last token mutation.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use portico_domain::{ApiRequest, AuthResult, ClientSettings, Credentials, Session};

use crate::auth::AuthorizedClient;
use crate::ports::{AuthApi, Navigator, SessionTerminator, TokenStore};

/// In-memory session state and the operations that mutate it.
///
/// Per-browser-session singleton on the client side; server-rendering
/// contexts do not construct one (they only read the token store through
/// the route guards).
pub struct SessionManager {
    store: Arc<dyn TokenStore>,
    api: Arc<dyn AuthApi>,
    client: Arc<AuthorizedClient>,
    navigator: Arc<dyn Navigator>,
    settings: ClientSettings,
    session: RwLock<Option<Session>>,
}

impl SessionManager {
    /// Creates a manager with no authenticated session.
    pub fn new(
        store: Arc<dyn TokenStore>,
        api: Arc<dyn AuthApi>,
        client: Arc<AuthorizedClient>,
        navigator: Arc<dyn Navigator>,
        settings: ClientSettings,
    ) -> Self {
        Self {
            store,
            api,
            client,
            navigator,
            settings,
            session: RwLock::new(None),
        }
    }

    /// Returns the current user, or `None` when unauthenticated.
    pub async fn current_user(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    /// Returns true iff a user is signed in.
    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// Exchanges credentials for a session.
    ///
    /// On success the token pair is persisted, the dispatcher's default
    /// bearer is updated, the session is set from the returned claims and
    /// the navigator moves to the authenticated area.
    ///
    /// # Errors
    ///
    /// On failure nothing is mutated and the error is surfaced to the
    /// caller without retry.
    pub async fn sign_in(&self, credentials: Credentials) -> AuthResult<Session> {
        let outcome = self.api.sign_in(&credentials).await?;

        self.store
            .set(outcome.tokens.clone(), self.settings.store_options())
            .await;
        self.client
            .set_default_bearer(Some(outcome.tokens.access_token.clone()));
        *self.session.write().await = Some(outcome.session.clone());

        tracing::info!(email = %outcome.session.email, "signed in");
        self.navigator.navigate(&self.settings.home_path);
        Ok(outcome.session)
    }

    /// Revalidates a persisted token pair on process start.
    ///
    /// Fetches the identity-check endpoint through the dispatcher, so an
    /// expired access token is renewed transparently. Any failure performs
    /// a full sign-out: the session is never "authenticated" with a stale
    /// token.
    pub async fn restore(&self) -> Option<Session> {
        self.store.get().await?;

        let identity = match self.client.send(ApiRequest::get("/me")).await {
            Ok(response) if response.is_success() => response.json::<Session>().ok(),
            Ok(_) | Err(_) => None,
        };

        match identity {
            Some(session) => {
                *self.session.write().await = Some(session.clone());
                Some(session)
            }
            None => {
                tracing::warn!("stored tokens failed revalidation, signing out");
                self.sign_out().await;
                None
            }
        }
    }

    /// Clears the token store and the session, then navigates to the entry
    /// point. Idempotent.
    pub async fn sign_out(&self) {
        self.store.clear().await;
        self.client.set_default_bearer(None);
        *self.session.write().await = None;
        self.navigator.navigate(&self.settings.entry_path);
    }
}

#[async_trait]
impl SessionTerminator for SessionManager {
    async fn terminate(&self) {
        self.sign_out().await;
    }
}
