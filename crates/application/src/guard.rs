//! Route guards for server-rendered data loaders.
//!
//! Higher-order wrappers around a page's loader: [`require_auth`] keeps
//! unauthenticated requests out of protected pages, [`require_guest`] keeps
//! authenticated requests out of guest-only pages. Guards run server-side,
//! where nothing can navigate, so they return a redirect decision for the
//! host to act on.

use std::future::Future;

use portico_domain::{AuthResult, ENTRY_PATH, HOME_PATH};

use crate::ports::TokenStore;

/// Decision produced by a guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome<T> {
    /// The loader ran; here is its value.
    Proceed(T),
    /// The host must redirect instead of rendering.
    Redirect {
        /// Destination path.
        destination: String,
    },
}

impl<T> GuardOutcome<T> {
    fn redirect(destination: &str) -> Self {
        Self::Redirect {
            destination: destination.to_string(),
        }
    }
}

/// Runs `loader` only for authenticated requests.
///
/// Without a stored access token the request is redirected to the entry
/// page. A fatal auth failure raised inside the loader (a rejected token or
/// a failed refresh, surfaced synchronously because server contexts carry
/// no session terminator) clears both stored tokens and redirects.
///
/// # Errors
///
/// Non-fatal loader errors propagate unchanged.
pub async fn require_auth<T, F, Fut>(
    store: &dyn TokenStore,
    loader: F,
) -> AuthResult<GuardOutcome<T>>
where
    F: FnOnce() -> Fut + Send,
    Fut: Future<Output = AuthResult<T>> + Send,
{
    if store.get().await.is_none() {
        return Ok(GuardOutcome::redirect(ENTRY_PATH));
    }

    match loader().await {
        Ok(value) => Ok(GuardOutcome::Proceed(value)),
        Err(error) if error.is_fatal() => {
            tracing::warn!(%error, "loader hit a fatal auth failure, clearing tokens");
            store.clear().await;
            Ok(GuardOutcome::redirect(ENTRY_PATH))
        }
        Err(error) => Err(error),
    }
}

/// Runs `loader` only for unauthenticated requests; authenticated ones are
/// redirected to the authenticated landing page.
///
/// # Errors
///
/// Loader errors propagate unchanged.
pub async fn require_guest<T, F, Fut>(
    store: &dyn TokenStore,
    loader: F,
) -> AuthResult<GuardOutcome<T>>
where
    F: FnOnce() -> Fut + Send,
    Fut: Future<Output = AuthResult<T>> + Send,
{
    if store.get().await.is_some() {
        return Ok(GuardOutcome::redirect(HOME_PATH));
    }

    loader().await.map(GuardOutcome::Proceed)
}
