//! The journal entry record and its write payloads.
//!
//! [`Entry`] is the only persisted entity. It is created from a [`NewEntry`]
//! and mutated through an [`EntryPatch`], where each field is independently
//! optional: `None` leaves the stored value alone, `Some` replaces it (an
//! empty string or empty tag list is a value, not an omission).

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single journal record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Server-generated identifier, immutable.
    pub id: String,
    /// Non-empty title.
    pub title: String,
    /// Free text body.
    pub content: String,
    /// Free-form category; empty means uncategorized.
    pub category: String,
    /// Tags, order irrelevant for matching.
    pub tags: Vec<String>,
    /// Whether viewers may see this entry.
    pub is_shared: bool,
    /// Set once at creation.
    pub date_created: DateTime<Utc>,
    /// Updated on every successful mutation.
    pub date_modified: DateTime<Utc>,
}

impl Entry {
    /// Generate a fresh entry identifier.
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Advance `date_modified` to `now`, or one microsecond past its
    /// current value when the clock has not moved forward.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.date_modified = next_modified(self.date_modified, now);
    }
}

/// The current time at the microsecond precision every store keeps.
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// The modification timestamp that follows `previous` when the clock reads `now`.
pub fn next_modified(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

/// Fields supplied when creating an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntry {
    /// Title, required and non-empty.
    pub title: String,
    /// Body, required and non-empty.
    pub content: String,
    /// Category, required and non-empty.
    pub category: String,
    /// Tags, defaults to empty.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Visibility, defaults to private.
    #[serde(default)]
    pub is_shared: bool,
}

impl NewEntry {
    /// Start a private, untagged entry.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            category: category.into(),
            tags: Vec::new(),
            is_shared: false,
        }
    }

    /// Set the tags.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the visibility flag.
    pub fn shared(mut self, is_shared: bool) -> Self {
        self.is_shared = is_shared;
        self
    }

    /// Materialise the record with a fresh id and the current time.
    pub fn into_entry(self) -> Entry {
        self.into_entry_at(Entry::generate_id(), timestamp_now())
    }

    /// Materialise the record with the given id and creation time.
    pub fn into_entry_at(self, id: String, now: DateTime<Utc>) -> Entry {
        Entry {
            id,
            title: self.title,
            content: self.content,
            category: self.category,
            tags: self.tags,
            is_shared: self.is_shared,
            date_created: now,
            date_modified: now,
        }
    }
}

/// Partial update payload.
///
/// JSON `null` and an absent key both deserialize to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EntryPatch {
    /// Replacement title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Replacement body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Replacement category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Replacement tag list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Replacement visibility flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_shared: Option<bool>,
}

impl EntryPatch {
    /// An empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the content.
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set the category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the tags.
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Set the visibility flag.
    pub fn shared(mut self, is_shared: bool) -> Self {
        self.is_shared = Some(is_shared);
        self
    }

    /// Whether no field is present.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.category.is_none()
            && self.tags.is_none()
            && self.is_shared.is_none()
    }

    /// Copy every present field onto `entry`. Timestamps are left alone.
    pub fn apply_to(&self, entry: &mut Entry) {
        if let Some(title) = &self.title {
            entry.title.clone_from(title);
        }
        if let Some(content) = &self.content {
            entry.content.clone_from(content);
        }
        if let Some(category) = &self.category {
            entry.category.clone_from(category);
        }
        if let Some(tags) = &self.tags {
            entry.tags.clone_from(tags);
        }
        if let Some(is_shared) = self.is_shared {
            entry.is_shared = is_shared;
        }
    }
}
