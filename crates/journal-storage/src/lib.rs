//! Entry storage backends.
//!
//! The [`EntryStore`] trait is the only seam between the entry facade and
//! persistence. Backends differ in how they evaluate an [`EntryQuery`], but
//! all of them must return exactly the entries it matches, newest first,
//! at most `limit` of them.

#![doc = include_str!("../README.md")]

pub mod memory;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use journal_core::{Entry, EntryPatch, EntryQuery, Result, Scope, StorageConfig};

pub use memory::MemoryEntryStore;
pub use sqlite::SqliteEntryStore;

// ============================================================================
// Backend trait
// ============================================================================

/// Persistence backend for journal entries.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Persist a new entry. The id must not already exist.
    async fn insert(&self, entry: &Entry) -> Result<()>;

    /// Entries matching `query`, ordered by creation time, newest first.
    async fn find(&self, query: &EntryQuery) -> Result<Vec<Entry>>;

    /// A single entry by id.
    async fn get(&self, id: &str) -> Result<Option<Entry>>;

    /// Apply `patch` to the entry `id` and bump its modification time past
    /// both its previous value and `now`.
    ///
    /// Returns the updated record, or `None` if no such entry exists.
    async fn update(&self, id: &str, patch: &EntryPatch, now: DateTime<Utc>)
    -> Result<Option<Entry>>;

    /// Remove the entry `id`. Returns whether it existed.
    async fn delete(&self, id: &str) -> Result<bool>;

    /// Distinct non-empty categories visible under `scope`, sorted.
    async fn categories(&self, scope: Scope) -> Result<Vec<String>>;

    /// Backend name for logs and health output.
    fn name(&self) -> &str;
}

// ============================================================================
// Backend selection
// ============================================================================

/// URL that selects the in-memory backend.
pub const MEMORY_URL: &str = "memory";

/// Open the backend named by `config.url`.
///
/// `memory` gives a [`MemoryEntryStore`]; anything starting with `sqlite:`
/// gives a [`SqliteEntryStore`] with its schema in place.
pub async fn open(config: &StorageConfig) -> Result<Arc<dyn EntryStore>> {
    let url = config.url.trim();
    if url == MEMORY_URL {
        log::info!("Using in-memory entry store");
        return Ok(Arc::new(MemoryEntryStore::new()));
    }

    if url.starts_with("sqlite:") {
        let store = SqliteEntryStore::connect(url, config.max_connections).await?;
        return Ok(Arc::new(store));
    }

    Err(journal_core::Error::config(format!(
        "Unsupported storage url '{url}' (expected '{MEMORY_URL}' or 'sqlite://<path>')"
    )))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use journal_core::Error;

    #[tokio::test]
    async fn test_open_memory() {
        let store = open(&StorageConfig::memory()).await.unwrap();
        assert_eq!(store.name(), "memory");
    }

    #[tokio::test]
    async fn test_open_sqlite_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            url: format!("sqlite://{}", dir.path().join("journal.db").display()),
            ..StorageConfig::default()
        };
        let store = open(&config).await.unwrap();
        assert_eq!(store.name(), "sqlite");
        assert!(dir.path().join("journal.db").exists());
    }

    #[tokio::test]
    async fn test_open_rejects_unknown_scheme() {
        let config = StorageConfig {
            url: "mongodb://localhost/journal".to_string(),
            ..StorageConfig::default()
        };
        let err = open(&config).await.err().unwrap();
        assert!(matches!(err, Error::Config(_)));
    }
}
