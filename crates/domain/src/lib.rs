//! Portico Domain - Core session types
//!
//! This crate defines the domain model for the Portico session client.
//! All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod error;
pub mod request;
pub mod response;
pub mod settings;

pub use auth::{
    Credentials, Session, StoreOptions, TOKEN_EXPIRED_CODE, TokenPair, classify_unauthorized,
};
pub use error::{AuthError, AuthResult};
pub use request::{ApiRequest, HttpMethod};
pub use response::ApiResponse;
pub use settings::{ClientSettings, DEFAULT_TOKEN_MAX_AGE_SECS, ENTRY_PATH, HOME_PATH};
