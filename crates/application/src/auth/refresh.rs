//! Refresh cycle coordination.
//!
//! At most one refresh-token exchange is in flight at any time. Every
//! request that fails with an expired access token during that window joins
//! the same cycle and is settled, in FIFO order, with the cycle's outcome.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, oneshot};

use portico_domain::{AuthError, AuthResult, StoreOptions, TokenPair};

use crate::ports::{AuthApi, TokenStore};

/// A queued request waiting for the in-flight refresh to settle.
///
/// One-shot: fulfilled with the new access token or rejected with the
/// refresh error, exactly once.
type Waiter = oneshot::Sender<AuthResult<String>>;

/// Flag plus FIFO queue, mutated only under the coordinator's mutex.
#[derive(Default)]
struct RefreshState {
    refreshing: bool,
    waiters: VecDeque<Waiter>,
}

/// Deduplicates concurrent refresh attempts into a single in-flight
/// exchange.
///
/// The first caller to observe the idle state becomes the cycle leader and
/// starts the exchange as a detached task; every caller (leader included)
/// suspends on a one-shot handle that resolves when the cycle settles. The coordinator is
/// an owned value, not a global: isolated server-side dispatchers each get
/// their own and never share state.
pub struct RefreshCoordinator {
    store: Arc<dyn TokenStore>,
    api: Arc<dyn AuthApi>,
    options: StoreOptions,
    refresh_timeout: Duration,
    state: Mutex<RefreshState>,
}

impl RefreshCoordinator {
    /// Creates a coordinator in the idle state.
    pub fn new(
        store: Arc<dyn TokenStore>,
        api: Arc<dyn AuthApi>,
        options: StoreOptions,
        refresh_timeout: Duration,
    ) -> Self {
        Self {
            store,
            api,
            options,
            refresh_timeout,
            state: Mutex::new(RefreshState::default()),
        }
    }

    /// Joins the current refresh cycle, starting one if none is in flight.
    ///
    /// Resolves with the new access token once the cycle settles. The
    /// caller is expected to resubmit its original request exactly once
    /// with that token.
    ///
    /// The cycle itself runs as a detached task: a caller whose future is
    /// dropped mid-wait cannot strand the flag or the queued waiters.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::RefreshFailed`] when the exchange fails, times
    /// out, or no refresh token is stored. A failed cycle clears the token
    /// store: a failed refresh is terminal for the session.
    pub async fn recover(self: &Arc<Self>) -> AuthResult<String> {
        let (tx, rx) = oneshot::channel();
        let leads = {
            let mut state = self.state.lock().await;
            state.waiters.push_back(tx);
            if state.refreshing {
                false
            } else {
                state.refreshing = true;
                true
            }
        };

        if leads {
            let coordinator = Arc::clone(self);
            tokio::spawn(async move { coordinator.run_cycle().await });
        }

        match rx.await {
            Ok(outcome) => outcome,
            Err(_) => Err(AuthError::RefreshFailed(
                "refresh cycle dropped its waiters".to_string(),
            )),
        }
    }

    /// Runs one Idle -> Refreshing -> Idle cycle and settles every waiter.
    async fn run_cycle(&self) {
        // Re-read the refresh token fresh from the store: it may have
        // rotated since the failed request was issued.
        let refresh_token = self.store.get().await.map(|pair| pair.refresh_token);

        let outcome = match refresh_token {
            Some(token) => {
                tracing::debug!("starting refresh-token exchange");
                self.exchange(&token).await
            }
            None => Err(AuthError::RefreshFailed(
                "no refresh token in store".to_string(),
            )),
        };

        match &outcome {
            Ok(pair) => {
                self.store.set(pair.clone(), self.options.clone()).await;
                tracing::info!("access token refreshed");
            }
            Err(error) => {
                self.store.clear().await;
                tracing::warn!(%error, "token refresh failed, session is terminal");
            }
        }

        // Reset the flag and take the queue in one critical section, so a
        // failure arriving after this point starts a fresh cycle instead of
        // joining a settled one.
        let waiters = {
            let mut state = self.state.lock().await;
            state.refreshing = false;
            std::mem::take(&mut state.waiters)
        };

        // Whatever went wrong inside the cycle, the session outcome is the
        // same: the refresh failed and that is fatal.
        let result = outcome.map(|pair| pair.access_token).map_err(|error| match error {
            AuthError::RefreshFailed(_) => error,
            other => AuthError::RefreshFailed(other.to_string()),
        });
        for waiter in waiters {
            // A dropped receiver means the caller went away; nothing to replay.
            let _ = waiter.send(result.clone());
        }
    }

    /// Performs the exchange, bounded by the refresh timeout.
    async fn exchange(&self, refresh_token: &str) -> AuthResult<TokenPair> {
        match tokio::time::timeout(self.refresh_timeout, self.api.refresh(refresh_token)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(AuthError::RefreshFailed(format!(
                "refresh endpoint did not answer within {}ms",
                self.refresh_timeout.as_millis()
            ))),
        }
    }
}
