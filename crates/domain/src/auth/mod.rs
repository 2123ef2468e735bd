//! Authentication domain types.
//!
//! This module provides:
//! - Sign-in credentials and the persisted token pair
//! - The in-memory session derived from backend claims
//! - Classification of 401 responses into recoverable and fatal failures

mod types;
mod unauthorized;

pub use types::{Credentials, Session, StoreOptions, TokenPair};
pub use unauthorized::{TOKEN_EXPIRED_CODE, classify_unauthorized};
