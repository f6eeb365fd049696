//! Scoped entry filter.
//!
//! An [`EntryQuery`] describes one list request. Every store backend must
//! return exactly the entries for which [`EntryQuery::matches`] holds,
//! newest first, at most [`EntryQuery::limit`] of them. The in-memory store
//! evaluates `matches` directly; SQL backends translate the same clauses.
//!
//! Filters apply in a fixed order:
//!
//! 1. Scope (hard; a shared-only scope cannot be widened by anything else)
//! 2. Category equality, unless absent, empty, or [`ALL_CATEGORIES`]
//! 3. Case-insensitive literal substring search over title, content, and tags

use crate::entry::Entry;
use crate::role::Scope;

/// Maximum number of entries returned by a single list call.
pub const DEFAULT_LIMIT: usize = 50;

/// Category value that means "do not filter by category".
pub const ALL_CATEGORIES: &str = "all";

/// Group label used for entries whose category is empty.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// A single scoped list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryQuery {
    /// Visibility restriction.
    pub scope: Scope,
    /// Exact category to keep, already normalised.
    pub category: Option<String>,
    /// Lower-cased search needle, already normalised.
    pub search: Option<String>,
    /// Result cap.
    pub limit: usize,
}

impl EntryQuery {
    /// Unfiltered query under `scope`, capped at [`DEFAULT_LIMIT`].
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            category: None,
            search: None,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Restrict to one category. Empty and [`ALL_CATEGORIES`] clear the filter.
    pub fn with_category(mut self, category: Option<&str>) -> Self {
        self.category = category
            .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
            .map(str::to_string);
        self
    }

    /// Restrict to entries containing `search`. Empty clears the filter.
    pub fn with_search(mut self, search: Option<&str>) -> Self {
        self.search = search.filter(|s| !s.is_empty()).map(str::to_lowercase);
        self
    }

    /// Override the result cap.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Whether `entry` passes scope, category, and search.
    pub fn matches(&self, entry: &Entry) -> bool {
        if !self.scope.permits(entry) {
            return false;
        }

        if let Some(category) = &self.category {
            if entry.category != *category {
                return false;
            }
        }

        match &self.search {
            Some(needle) => {
                contains_folded(&entry.title, needle)
                    || contains_folded(&entry.content, needle)
                    || entry.tags.iter().any(|tag| contains_folded(tag, needle))
            }
            None => true,
        }
    }
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
