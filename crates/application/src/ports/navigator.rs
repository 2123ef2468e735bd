//! Navigation and session-termination capabilities

use async_trait::async_trait;

/// Port for navigating the hosting environment to a destination path.
///
/// In a browser-like host this pushes a route; the demo binary logs the
/// transition. Injected rather than detected so server-side contexts, which
/// cannot navigate, simply never receive one.
pub trait Navigator: Send + Sync {
    /// Moves the user to the given destination.
    fn navigate(&self, destination: &str);
}

/// Capability to terminate the session on a fatal auth failure.
///
/// Injected into the dispatcher when the environment can run the sign-out
/// path (clear stores, drop the session, navigate to the entry point). When
/// absent, fatal failures propagate synchronously to the caller, who is
/// responsible for redirecting (see the route guards).
#[async_trait]
pub trait SessionTerminator: Send + Sync {
    /// Runs the global sign-out path. Idempotent.
    async fn terminate(&self);
}
