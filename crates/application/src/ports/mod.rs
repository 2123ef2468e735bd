//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external
//! systems. Each port is a trait implemented by adapters in the
//! infrastructure layer (or by in-process implementations for tests and
//! server-side contexts).

mod auth_api;
mod http_transport;
mod navigator;
mod token_store;

pub use auth_api::{AuthApi, SignInOutcome};
pub use http_transport::HttpTransport;
pub use navigator::{Navigator, SessionTerminator};
pub use token_store::TokenStore;
