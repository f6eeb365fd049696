//! In-memory entry store.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use journal_core::{Entry, EntryPatch, EntryQuery, Error, Result, Scope};
use tokio::sync::RwLock;

use crate::EntryStore;

/// Process-local [`EntryStore`] backed by a hash map.
///
/// Contents are lost on drop. Mutations hold the write lock for their whole
/// read-modify-write, so concurrent updates serialize.
#[derive(Debug, Default)]
pub struct MemoryEntryStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryEntryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl EntryStore for MemoryEntryStore {
    async fn insert(&self, entry: &Entry) -> Result<()> {
        let mut entries = self.entries.write().await;
        if entries.contains_key(&entry.id) {
            return Err(Error::storage(format!("Duplicate entry id: {}", entry.id)));
        }
        entries.insert(entry.id.clone(), entry.clone());
        Ok(())
    }

    async fn find(&self, query: &EntryQuery) -> Result<Vec<Entry>> {
        let entries = self.entries.read().await;
        let mut found: Vec<Entry> = entries
            .values()
            .filter(|e| query.matches(e))
            .cloned()
            .collect();

        found.sort_by(|a, b| {
            b.date_created
                .cmp(&a.date_created)
                .then_with(|| b.id.cmp(&a.id))
        });
        found.truncate(query.limit);
        Ok(found)
    }

    async fn get(&self, id: &str) -> Result<Option<Entry>> {
        Ok(self.entries.read().await.get(id).cloned())
    }

    async fn update(
        &self,
        id: &str,
        patch: &EntryPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Entry>> {
        let mut entries = self.entries.write().await;
        let Some(entry) = entries.get_mut(id) else {
            return Ok(None);
        };
        patch.apply_to(entry);
        entry.touch(now);
        Ok(Some(entry.clone()))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.entries.write().await.remove(id).is_some())
    }

    async fn categories(&self, scope: Scope) -> Result<Vec<String>> {
        let entries = self.entries.read().await;
        let categories: BTreeSet<&str> = entries
            .values()
            .filter(|e| scope.permits(e) && !e.category.is_empty())
            .map(|e| e.category.as_str())
            .collect();
        Ok(categories.into_iter().map(str::to_string).collect())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;
    use journal_core::{NewEntry, timestamp_now};

    fn entry_at(title: &str, category: &str, shared: bool, offset_secs: i64) -> Entry {
        let at = timestamp_now() + Duration::seconds(offset_secs);
        NewEntry::new(title, "body", category)
            .shared(shared)
            .into_entry_at(Entry::generate_id(), at)
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = MemoryEntryStore::new();
        let entry = entry_at("A", "Work", false, 0);
        store.insert(&entry).await.unwrap();

        assert_eq!(store.get(&entry.id).await.unwrap(), Some(entry));
        assert_eq!(store.get("missing").await.unwrap(), None);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_insert_fails() {
        let store = MemoryEntryStore::new();
        let entry = entry_at("A", "Work", false, 0);
        store.insert(&entry).await.unwrap();
        assert!(matches!(store.insert(&entry).await, Err(Error::Storage(_))));
    }

    #[tokio::test]
    async fn test_find_orders_newest_first_and_limits() {
        let store = MemoryEntryStore::new();
        for i in 0..5 {
            store
                .insert(&entry_at(&format!("E{i}"), "c", false, i))
                .await
                .unwrap();
        }

        let query = EntryQuery::new(Scope::Unrestricted).with_limit(3);
        let titles: Vec<_> = store
            .find(&query)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, ["E4", "E3", "E2"]);
    }

    #[tokio::test]
    async fn test_update_missing_is_none() {
        let store = MemoryEntryStore::new();
        let patch = EntryPatch::new().title("x");
        assert!(store.update("nope", &patch, timestamp_now()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_bumps_modified_even_with_stale_clock() {
        let store = MemoryEntryStore::new();
        let entry = entry_at("A", "c", false, 0);
        store.insert(&entry).await.unwrap();

        let stale = entry.date_modified - Duration::seconds(30);
        let updated = store
            .update(&entry.id, &EntryPatch::new().title("B"), stale)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "B");
        assert!(updated.date_modified > entry.date_modified);
        assert_eq!(updated.date_created, entry.date_created);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryEntryStore::new();
        let entry = entry_at("A", "c", false, 0);
        store.insert(&entry).await.unwrap();
        assert!(store.delete(&entry.id).await.unwrap());
        assert!(!store.delete(&entry.id).await.unwrap());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_categories_respect_scope() {
        let store = MemoryEntryStore::new();
        store.insert(&entry_at("a", "Work", false, 0)).await.unwrap();
        store.insert(&entry_at("b", "Home", true, 1)).await.unwrap();
        store.insert(&entry_at("c", "", true, 2)).await.unwrap();
        store.insert(&entry_at("d", "Home", false, 3)).await.unwrap();

        assert_eq!(
            store.categories(Scope::Unrestricted).await.unwrap(),
            ["Home", "Work"]
        );
        assert_eq!(store.categories(Scope::SharedOnly).await.unwrap(), ["Home"]);
    }
}
