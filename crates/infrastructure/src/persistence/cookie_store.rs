//! Cookie-style file-persisted token store.
//!
//! The token pair is stored as two named entries in a JSON file, mirroring
//! a browser cookie jar: each entry carries its own max-age and path
//! attribute, and expiry is enforced on read. Clearing both entries is how
//! sign-out is expressed on disk.
//!
//! Failure mode: an unavailable or malformed file is treated as an empty
//! store, so the user is simply unauthenticated.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use portico_application::ports::TokenStore;
use portico_domain::{StoreOptions, TokenPair};

/// Entry name for the access token.
const ACCESS_TOKEN_ENTRY: &str = "portico.token";

/// Entry name for the refresh token.
const REFRESH_TOKEN_ENTRY: &str = "portico.refreshToken";

/// A single named entry with its persistence attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredEntry {
    name: String,
    value: String,
    max_age_secs: i64,
    path: String,
    set_at: DateTime<Utc>,
}

impl StoredEntry {
    fn new(name: &str, value: String, options: &StoreOptions, set_at: DateTime<Utc>) -> Self {
        Self {
            name: name.to_string(),
            value,
            max_age_secs: options.max_age_secs,
            path: options.path.clone(),
            set_at,
        }
    }

    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.set_at + chrono::Duration::seconds(self.max_age_secs)
    }
}

/// On-disk layout.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    schema_version: u32,
    #[serde(default)]
    entries: Vec<StoredEntry>,
}

/// File-backed token store.
#[derive(Debug, Clone)]
pub struct CookieFileStore {
    file_path: PathBuf,
}

impl CookieFileStore {
    /// Creates a store backed by the given file.
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    /// Default store location under the user's config directory.
    #[must_use]
    pub fn default_location() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("portico").join("cookies.json"))
    }

    /// Reads the store file; any failure yields an empty store.
    async fn load(&self) -> StoreFile {
        let Ok(content) = tokio::fs::read(&self.file_path).await else {
            return StoreFile::default();
        };

        match serde_json::from_slice(&content) {
            Ok(file) => file,
            Err(error) => {
                tracing::warn!(%error, path = %self.file_path.display(), "malformed token store, treating as empty");
                StoreFile::default()
            }
        }
    }

    /// Writes the store file, creating parent directories as needed.
    /// A write failure leaves the user unauthenticated on the next read;
    /// it is logged, not surfaced.
    async fn persist(&self, file: &StoreFile) {
        if let Some(parent) = self.file_path.parent()
            && let Err(error) = tokio::fs::create_dir_all(parent).await
        {
            tracing::warn!(%error, path = %parent.display(), "failed to create token store directory");
            return;
        }

        let content = match serde_json::to_vec_pretty(file) {
            Ok(content) => content,
            Err(error) => {
                tracing::warn!(%error, "failed to serialize token store");
                return;
            }
        };

        if let Err(error) = tokio::fs::write(&self.file_path, content).await {
            tracing::warn!(%error, path = %self.file_path.display(), "failed to write token store");
        }
    }

    fn entry_value(file: &StoreFile, name: &str, now: DateTime<Utc>) -> Option<String> {
        file.entries
            .iter()
            .find(|entry| entry.name == name && !entry.is_expired(now))
            .map(|entry| entry.value.clone())
    }
}

#[async_trait]
impl TokenStore for CookieFileStore {
    async fn get(&self) -> Option<TokenPair> {
        let file = self.load().await;
        let now = Utc::now();

        let access_token = Self::entry_value(&file, ACCESS_TOKEN_ENTRY, now)?;
        let refresh_token = Self::entry_value(&file, REFRESH_TOKEN_ENTRY, now)?;
        Some(TokenPair {
            access_token,
            refresh_token,
        })
    }

    async fn set(&self, pair: TokenPair, options: StoreOptions) {
        let now = Utc::now();
        let file = StoreFile {
            schema_version: 1,
            entries: vec![
                StoredEntry::new(ACCESS_TOKEN_ENTRY, pair.access_token, &options, now),
                StoredEntry::new(REFRESH_TOKEN_ENTRY, pair.refresh_token, &options, now),
            ],
        };
        self.persist(&file).await;
    }

    async fn clear(&self) {
        if let Err(error) = tokio::fs::remove_file(&self.file_path).await
            && error.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!(%error, path = %self.file_path.display(), "failed to clear token store");
        }
    }
}
