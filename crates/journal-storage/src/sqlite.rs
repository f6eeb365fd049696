//! SQLite entry store.
//!
//! One table, `entries`. Timestamps are stored as integer microseconds
//! since the epoch and tags as a JSON array. Scope and category filters
//! and ordering run in SQL; the text search runs over the fetched rows
//! through [`EntryQuery::matches`] so case folding is identical to the
//! in-memory backend.

use std::path::PathBuf;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use journal_core::{Entry, EntryPatch, EntryQuery, Error, Result, Scope, expand_tilde};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::{QueryBuilder, Row, Sqlite};

use crate::EntryStore;

const SCHEMA: [&str; 4] = [
    "CREATE TABLE IF NOT EXISTS entries (
        id            TEXT PRIMARY KEY NOT NULL,
        title         TEXT NOT NULL,
        content       TEXT NOT NULL,
        category      TEXT NOT NULL DEFAULT '',
        tags          TEXT NOT NULL DEFAULT '[]',
        is_shared     INTEGER NOT NULL DEFAULT 0,
        date_created  INTEGER NOT NULL,
        date_modified INTEGER NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_entries_category ON entries (category)",
    "CREATE INDEX IF NOT EXISTS idx_entries_is_shared ON entries (is_shared)",
    "CREATE INDEX IF NOT EXISTS idx_entries_date_created ON entries (date_created)",
];

const COLUMNS: &str =
    "id, title, content, category, tags, is_shared, date_created, date_modified";

const MEMORY_DSN: &str = "sqlite::memory:";

/// [`EntryStore`] backed by a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteEntryStore {
    pool: SqlitePool,
}

impl SqliteEntryStore {
    /// Connect to `url` and make sure the schema exists.
    ///
    /// Accepts `sqlite://path`, `sqlite:path` (a leading `~` is expanded)
    /// and `sqlite::memory:`. Missing database files and parent directories
    /// are created.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let (options, max_connections) = if url == MEMORY_DSN {
            // Every connection to :memory: is its own database.
            let options = SqliteConnectOptions::from_str(url).map_err(db_error)?;
            (options, 1)
        } else {
            let path = database_path(url)?;
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| Error::io_with_path(e, parent))?;
            }
            let options = SqliteConnectOptions::new()
                .filename(&path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal);
            (options, max_connections.max(1))
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(db_error)?;

        let store = Self { pool };
        store.migrate().await?;
        log::info!("Opened SQLite entry store at {url}");
        Ok(store)
    }

    /// A private in-memory database.
    pub async fn in_memory() -> Result<Self> {
        Self::connect(MEMORY_DSN, 1).await
    }

    async fn migrate(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(db_error)?;
        }
        Ok(())
    }

    /// Close the pool, waiting for checked-out connections.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl EntryStore for SqliteEntryStore {
    async fn insert(&self, entry: &Entry) -> Result<()> {
        let sql = format!("INSERT INTO entries ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?)");
        sqlx::query(&sql)
            .bind(&entry.id)
            .bind(&entry.title)
            .bind(&entry.content)
            .bind(&entry.category)
            .bind(serde_json::to_string(&entry.tags)?)
            .bind(entry.is_shared)
            .bind(entry.date_created.timestamp_micros())
            .bind(entry.date_modified.timestamp_micros())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    async fn find(&self, query: &EntryQuery) -> Result<Vec<Entry>> {
        if query.limit == 0 {
            return Ok(Vec::new());
        }

        let mut qb: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM entries WHERE 1 = 1"));

        if query.scope.is_shared_only() {
            qb.push(" AND is_shared = 1");
        }
        if let Some(category) = &query.category {
            qb.push(" AND category = ").push_bind(category.as_str());
        }
        qb.push(" ORDER BY date_created DESC, id DESC");
        if query.search.is_none() {
            let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);
            qb.push(" LIMIT ").push_bind(limit);
        }

        // Rows stream in recency order; stop reading once the cap is met.
        let mut rows = qb.build().fetch(&self.pool);
        let mut found = Vec::new();
        while let Some(row) = rows.try_next().await.map_err(db_error)? {
            let entry = entry_from_row(&row)?;
            if query.matches(&entry) {
                found.push(entry);
                if found.len() >= query.limit {
                    break;
                }
            }
        }
        Ok(found)
    }

    async fn get(&self, id: &str) -> Result<Option<Entry>> {
        let sql = format!("SELECT {COLUMNS} FROM entries WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;
        row.as_ref().map(entry_from_row).transpose()
    }

    async fn update(
        &self,
        id: &str,
        patch: &EntryPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Entry>> {
        let tags = patch.tags.as_ref().map(serde_json::to_string).transpose()?;

        // Single statement: the patch and the timestamp bump are atomic.
        let sql = format!(
            "UPDATE entries SET
                title         = COALESCE(?, title),
                content       = COALESCE(?, content),
                category      = COALESCE(?, category),
                tags          = COALESCE(?, tags),
                is_shared     = COALESCE(?, is_shared),
                date_modified = MAX(?, date_modified + 1)
             WHERE id = ?
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(patch.title.as_deref())
            .bind(patch.content.as_deref())
            .bind(patch.category.as_deref())
            .bind(tags)
            .bind(patch.is_shared)
            .bind(now.timestamp_micros())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;
        row.as_ref().map(entry_from_row).transpose()
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM entries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn categories(&self, scope: Scope) -> Result<Vec<String>> {
        let mut qb: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new("SELECT DISTINCT category FROM entries WHERE category <> ''");
        if scope.is_shared_only() {
            qb.push(" AND is_shared = 1");
        }
        qb.push(" ORDER BY category");

        let rows = qb.build().fetch_all(&self.pool).await.map_err(db_error)?;
        rows.iter()
            .map(|row| row.try_get::<String, _>("category").map_err(db_error))
            .collect()
    }

    fn name(&self) -> &str {
        "sqlite"
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn database_path(url: &str) -> Result<PathBuf> {
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .filter(|p| !p.is_empty())
        .ok_or_else(|| Error::config(format!("Invalid sqlite url '{url}'")))?;
    Ok(expand_tilde(path))
}

fn entry_from_row(row: &SqliteRow) -> Result<Entry> {
    let tags: String = row.try_get("tags").map_err(db_error)?;
    Ok(Entry {
        id: row.try_get("id").map_err(db_error)?,
        title: row.try_get("title").map_err(db_error)?,
        content: row.try_get("content").map_err(db_error)?,
        category: row.try_get("category").map_err(db_error)?,
        tags: serde_json::from_str(&tags)?,
        is_shared: row.try_get("is_shared").map_err(db_error)?,
        date_created: from_micros(row.try_get("date_created").map_err(db_error)?)?,
        date_modified: from_micros(row.try_get("date_modified").map_err(db_error)?)?,
    })
}

fn from_micros(micros: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros)
        .ok_or_else(|| Error::storage(format!("Timestamp out of range: {micros}")))
}

fn db_error(err: sqlx::Error) -> Error {
    Error::storage(err.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_database_path() {
        assert_eq!(
            database_path("sqlite://data/journal.db").unwrap(),
            PathBuf::from("data/journal.db")
        );
        assert_eq!(
            database_path("sqlite:journal.db").unwrap(),
            PathBuf::from("journal.db")
        );
        assert_eq!(
            database_path("sqlite:///var/lib/journal.db").unwrap(),
            PathBuf::from("/var/lib/journal.db")
        );
        assert!(database_path("sqlite://").is_err());
    }

    #[test]
    fn test_database_path_expands_tilde() {
        let path = database_path("sqlite://~/journal.db").unwrap();
        assert!(!path.starts_with("~"));
        assert!(path.ends_with("journal.db"));
    }

    #[test]
    fn test_from_micros_round_trips_precision() {
        let now = journal_core::timestamp_now();
        assert_eq!(from_micros(now.timestamp_micros()).unwrap(), now);
    }

    #[tokio::test]
    async fn test_schema_is_idempotent() {
        let store = SqliteEntryStore::in_memory().await.unwrap();
        store.migrate().await.unwrap();
        assert_eq!(store.name(), "sqlite");
    }
}
