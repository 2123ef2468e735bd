//! Portico Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports defined in the
//! application layer: a reqwest-backed HTTP transport, the auth endpoint
//! client, and a cookie-style file-persisted token store.

pub mod adapters;
pub mod auth;
pub mod persistence;

pub use adapters::ReqwestTransport;
pub use auth::HttpAuthApi;
pub use persistence::CookieFileStore;
