//! Portico Application - Session coordination core
//!
//! This crate holds the ports (trait boundaries to infrastructure) and the
//! coordination logic of the session client:
//!
//! - [`RefreshCoordinator`]: deduplicates concurrent refresh-token exchanges
//!   into a single in-flight cycle with FIFO replay of queued requests
//! - [`AuthorizedClient`]: the request dispatcher that attaches the bearer
//!   credential and intercepts authorization failures
//! - [`SessionManager`]: sign-in / sign-out / eager revalidation and the
//!   in-memory session state
//! - Route guards for server-rendered data loaders

pub mod auth;
pub mod guard;
pub mod ports;

pub use auth::{AuthorizedClient, MemoryTokenStore, RefreshCoordinator, SessionManager};
pub use guard::{GuardOutcome, require_auth, require_guest};
pub use ports::{AuthApi, HttpTransport, Navigator, SessionTerminator, SignInOutcome, TokenStore};
