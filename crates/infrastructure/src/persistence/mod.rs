//! Persisted state adapters.

mod cookie_store;

pub use cookie_store::CookieFileStore;
