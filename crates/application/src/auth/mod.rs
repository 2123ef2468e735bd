//! Session handling core.
//!
//! This module provides:
//! - An in-memory token store for server-side contexts and tests
//! - The refresh coordinator (single in-flight exchange, FIFO replay)
//! - The authorized request dispatcher
//! - The session manager (sign-in, sign-out, eager revalidation)

mod dispatcher;
mod refresh;
mod session;
mod token_store;

pub use dispatcher::AuthorizedClient;
pub use refresh::RefreshCoordinator;
pub use session::SessionManager;
pub use token_store::MemoryTokenStore;
