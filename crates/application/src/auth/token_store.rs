//! In-memory token storage with expiry tracking.
//!
//! This is the per-process store used by server-side contexts and tests.
//! A server handling many concurrent callers constructs one per invocation;
//! stores are never shared across unrelated users.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use portico_domain::{StoreOptions, TokenPair};

use crate::ports::TokenStore;

/// A stored pair with its persistence attributes.
#[derive(Debug, Clone)]
struct StoredPair {
    pair: TokenPair,
    options: StoreOptions,
    set_at: DateTime<Utc>,
}

impl StoredPair {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.set_at + chrono::Duration::seconds(self.options.max_age_secs)
    }
}

/// Thread-safe in-memory token store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    current: RwLock<Option<StoredPair>>,
}

impl MemoryTokenStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self) -> Option<TokenPair> {
        let current = self.current.read().await;
        current.as_ref().and_then(|stored| {
            if stored.is_expired(Utc::now()) {
                None
            } else {
                Some(stored.pair.clone())
            }
        })
    }

    async fn set(&self, pair: TokenPair, options: StoreOptions) {
        let mut current = self.current.write().await;
        *current = Some(StoredPair {
            pair,
            options,
            set_at: Utc::now(),
        });
    }

    async fn clear(&self) {
        let mut current = self.current.write().await;
        *current = None;
    }
}
