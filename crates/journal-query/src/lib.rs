//! Entry service facade.
//!
//! [`EntryService`] is the only path from request handlers to an
//! [`EntryStore`]. It owns write validation, filter normalisation, grouping,
//! and the "no such entry" to [`Error::NotFound`] translation. Visibility is
//! decided upstream; every read takes the [`Scope`] the caller was granted.

#![doc = include_str!("../README.md")]

use std::collections::BTreeMap;
use std::sync::Arc;

use journal_core::{
    Entry, EntryPatch, EntryQuery, Error, NewEntry, Result, Scope, UNCATEGORIZED, timestamp_now,
};
use journal_storage::EntryStore;
use serde::Deserialize;

/// Entries keyed by category label, each group newest first.
pub type GroupedEntries = BTreeMap<String, Vec<Entry>>;

/// Optional list filters as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListFilter {
    /// Case-insensitive literal substring.
    pub search: Option<String>,
    /// Exact category, or `"all"`.
    pub category: Option<String>,
}

impl ListFilter {
    /// Filter on a search term.
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            ..Self::default()
        }
    }

    /// Filter on a category.
    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Self::default()
        }
    }

    fn to_query(&self, scope: Scope) -> EntryQuery {
        EntryQuery::new(scope)
            .with_category(self.category.as_deref())
            .with_search(self.search.as_deref())
    }
}

// ============================================================================
// Service
// ============================================================================

/// Facade over an [`EntryStore`].
#[derive(Clone)]
pub struct EntryService {
    store: Arc<dyn EntryStore>,
}

impl std::fmt::Debug for EntryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryService")
            .field("store", &self.store.name())
            .finish()
    }
}

impl EntryService {
    /// Service over `store`.
    pub fn new(store: Arc<dyn EntryStore>) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn EntryStore> {
        &self.store
    }

    /// Validate and persist a new entry.
    pub async fn create(&self, fields: NewEntry) -> Result<Entry> {
        require_text("title", &fields.title)?;
        require_text("content", &fields.content)?;
        require_text("category", &fields.category)?;

        let entry = fields.into_entry_at(Entry::generate_id(), timestamp_now());
        self.store.insert(&entry).await?;
        log::info!("Created entry {}", entry.id);
        Ok(entry)
    }

    /// Entries visible under `scope` that pass `filter`, newest first.
    pub async fn list(&self, scope: Scope, filter: &ListFilter) -> Result<Vec<Entry>> {
        self.store.find(&filter.to_query(scope)).await
    }

    /// Like [`list`](Self::list) without the category filter, partitioned
    /// by category. Empty categories are grouped under
    /// [`UNCATEGORIZED`].
    pub async fn list_grouped(&self, scope: Scope, search: Option<&str>) -> Result<GroupedEntries> {
        let query = EntryQuery::new(scope).with_search(search);
        let entries = self.store.find(&query).await?;
        Ok(group_by_category(entries))
    }

    /// Unscoped lookup by id.
    pub async fn get(&self, id: &str) -> Result<Option<Entry>> {
        self.store.get(id).await
    }

    /// Apply `patch` to entry `id`.
    ///
    /// An empty patch returns the stored record untouched.
    pub async fn update(&self, id: &str, patch: &EntryPatch) -> Result<Entry> {
        if let Some(title) = &patch.title {
            require_text("title", title)?;
        }

        let updated = if patch.is_empty() {
            self.store.get(id).await?
        } else {
            self.store.update(id, patch, timestamp_now()).await?
        };

        let entry = updated.ok_or_else(|| entry_not_found(id))?;
        if !patch.is_empty() {
            log::info!("Updated entry {id}");
        }
        Ok(entry)
    }

    /// Hard-delete entry `id`. Returns whether it existed.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let removed = self.store.delete(id).await?;
        if removed {
            log::info!("Deleted entry {id}");
        }
        Ok(removed)
    }

    /// Distinct non-empty categories visible under `scope`, ascending.
    pub async fn categories(&self, scope: Scope) -> Result<Vec<String>> {
        self.store.categories(scope).await
    }
}

/// The error returned for an unknown entry id.
pub fn entry_not_found(id: &str) -> Error {
    Error::not_found(format!("Entry {id} not found"))
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(format!("Field '{field}' must not be empty")));
    }
    Ok(())
}

fn group_by_category(entries: Vec<Entry>) -> GroupedEntries {
    let mut grouped = GroupedEntries::new();
    for entry in entries {
        let label = if entry.category.is_empty() {
            UNCATEGORIZED.to_string()
        } else {
            entry.category.clone()
        };
        grouped.entry(label).or_default().push(entry);
    }
    grouped
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use journal_storage::MemoryEntryStore;
    use proptest::prelude::*;

    fn service() -> EntryService {
        EntryService::new(Arc::new(MemoryEntryStore::new()))
    }

    async fn seeded() -> (EntryService, Vec<Entry>) {
        let svc = service();
        let mut created = Vec::new();
        for (title, content, category, tags, shared) in [
            ("Homework", "algebra", "School", vec!["math"], false),
            ("Team sync", "weekly", "Work", vec![], true),
            ("Idle", "nothing", "Misc", vec!["networking"], true),
            ("Diary", "private WORK thoughts", "Personal", vec![], false),
        ] {
            let entry = svc
                .create(NewEntry::new(title, content, category).with_tags(tags).shared(shared))
                .await
                .unwrap();
            created.push(entry);
        }
        (svc, created)
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamps() {
        let svc = service();
        let entry = svc
            .create(NewEntry::new("A", "B", "C").with_tags(["t"]))
            .await
            .unwrap();

        assert!(!entry.id.is_empty());
        assert!(!entry.is_shared);
        assert_eq!(entry.tags, ["t"]);
        assert_eq!(entry.date_created, entry.date_modified);
        assert_eq!(svc.get(&entry.id).await.unwrap(), Some(entry));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_required_fields() {
        let svc = service();
        for fields in [
            NewEntry::new("", "B", "C"),
            NewEntry::new("A", "  ", "C"),
            NewEntry::new("A", "B", ""),
        ] {
            let err = svc.create(fields).await.unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "{err}");
        }
        assert!(svc.list(Scope::Unrestricted, &ListFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let svc = service();
        let a = svc.create(NewEntry::new("A", "B", "C")).await.unwrap();
        let b = svc.create(NewEntry::new("A", "B", "C")).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_list_search_is_case_insensitive_across_fields() {
        let (svc, _) = seeded().await;
        let found = svc
            .list(Scope::Unrestricted, &ListFilter::search("work"))
            .await
            .unwrap();
        let mut titles: Vec<_> = found.iter().map(|e| e.title.as_str()).collect();
        titles.sort_unstable();
        assert_eq!(titles, ["Diary", "Homework", "Idle"]);
    }

    #[tokio::test]
    async fn test_list_viewer_scope_cannot_be_widened() {
        let (svc, _) = seeded().await;
        let filter = ListFilter {
            search: Some("work".into()),
            category: Some("all".into()),
        };
        let found = svc.list(Scope::SharedOnly, &filter).await.unwrap();
        assert!(found.iter().all(|e| e.is_shared));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Idle");

        let personal = svc
            .list(Scope::SharedOnly, &ListFilter::category("Personal"))
            .await
            .unwrap();
        assert!(personal.is_empty());
    }

    #[tokio::test]
    async fn test_list_category_all_is_unfiltered() {
        let (svc, created) = seeded().await;
        let all = svc
            .list(Scope::Unrestricted, &ListFilter::category("all"))
            .await
            .unwrap();
        assert_eq!(all.len(), created.len());
        assert!(all.windows(2).all(|w| w[0].date_created >= w[1].date_created));
    }

    #[tokio::test]
    async fn test_list_grouped_labels_uncategorized() {
        let svc = service();
        let store = svc.store().clone();
        let loose = NewEntry::new("Loose", "x", "").into_entry();
        store.insert(&loose).await.unwrap();
        svc.create(NewEntry::new("Filed", "x", "Work")).await.unwrap();

        let grouped = svc.list_grouped(Scope::Unrestricted, None).await.unwrap();
        let keys: Vec<_> = grouped.keys().map(String::as_str).collect();
        assert_eq!(keys, [UNCATEGORIZED, "Work"]);
        assert_eq!(grouped[UNCATEGORIZED][0].id, loose.id);
    }

    #[tokio::test]
    async fn test_list_grouped_respects_scope_and_search() {
        let (svc, _) = seeded().await;
        let grouped = svc
            .list_grouped(Scope::SharedOnly, Some("WEEK"))
            .await
            .unwrap();
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped["Work"][0].title, "Team sync");
    }

    #[tokio::test]
    async fn test_update_changes_only_present_fields() {
        let (svc, created) = seeded().await;
        let before = &created[0];

        let after = svc.update(&before.id, &EntryPatch::new().title("X")).await.unwrap();
        assert_eq!(after.title, "X");
        assert_eq!(after.content, before.content);
        assert_eq!(after.category, before.category);
        assert_eq!(after.tags, before.tags);
        assert_eq!(after.is_shared, before.is_shared);
        assert_eq!(after.date_created, before.date_created);
        assert!(after.date_modified > before.date_modified);
        assert_eq!(svc.get(&before.id).await.unwrap(), Some(after));
    }

    #[tokio::test]
    async fn test_update_may_clear_optional_fields() {
        let (svc, created) = seeded().await;
        let patch = EntryPatch::new().category("").tags(Vec::<String>::new());
        let after = svc.update(&created[0].id, &patch).await.unwrap();
        assert!(after.category.is_empty());
        assert!(after.tags.is_empty());
    }

    #[tokio::test]
    async fn test_update_empty_patch_is_noop() {
        let (svc, created) = seeded().await;
        let same = svc.update(&created[1].id, &EntryPatch::new()).await.unwrap();
        assert_eq!(same, created[1]);
    }

    #[tokio::test]
    async fn test_update_rejects_blank_title() {
        let (svc, created) = seeded().await;
        let err = svc
            .update(&created[0].id, &EntryPatch::new().title(" "))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_unknown_is_not_found() {
        let svc = service();
        for patch in [EntryPatch::new(), EntryPatch::new().shared(true)] {
            let err = svc.update("nope", &patch).await.unwrap_err();
            assert!(err.is_not_found());
        }
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let (svc, created) = seeded().await;
        assert!(svc.delete(&created[0].id).await.unwrap());
        assert!(!svc.delete(&created[0].id).await.unwrap());
    }

    #[tokio::test]
    async fn test_categories_by_scope() {
        let (svc, _) = seeded().await;
        assert_eq!(
            svc.categories(Scope::Unrestricted).await.unwrap(),
            ["Misc", "Personal", "School", "Work"]
        );
        assert_eq!(svc.categories(Scope::SharedOnly).await.unwrap(), ["Misc", "Work"]);
    }

    #[test]
    fn test_list_filter_from_json() {
        let filter: ListFilter = serde_json::from_str(r#"{"search":"x"}"#).unwrap();
        assert_eq!(filter, ListFilter::search("x"));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_viewer_never_sees_private_entries(
            shared in proptest::collection::vec(any::<bool>(), 1..8),
            search in proptest::option::of("[a-z]{0,3}"),
            category in proptest::option::of("all|c[0-2]|"),
        ) {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            rt.block_on(async {
                let svc = service();
                for (i, is_shared) in shared.iter().enumerate() {
                    svc.create(
                        NewEntry::new(format!("t{i}"), "abc", format!("c{}", i % 3))
                            .with_tags(["xyz"])
                            .shared(*is_shared),
                    )
                    .await
                    .unwrap();
                }

                let filter = ListFilter { search: search.clone(), category };
                let listed = svc.list(Scope::SharedOnly, &filter).await.unwrap();
                prop_assert!(listed.iter().all(|e| e.is_shared));

                let grouped = svc.list_grouped(Scope::SharedOnly, search.as_deref()).await.unwrap();
                prop_assert!(grouped.values().flatten().all(|e| e.is_shared));
                Ok(())
            })?;
        }
    }
}
