//! Token store port

use async_trait::async_trait;
use portico_domain::{StoreOptions, TokenPair};

/// Port for the persisted, request-scoped token store.
///
/// The store owns the token pair exclusively. Both entries are written with
/// the same [`StoreOptions`] and expire together. Implementations must treat
/// an unavailable backing store as empty on read: the user is simply
/// unauthenticated, never errored.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Returns the current token pair, or `None` if absent or expired.
    async fn get(&self) -> Option<TokenPair>;

    /// Replaces the stored token pair.
    async fn set(&self, pair: TokenPair, options: StoreOptions);

    /// Removes the stored token pair. Idempotent.
    async fn clear(&self);
}
