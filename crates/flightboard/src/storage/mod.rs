//! Storage layer for flightboard.
//!
//! `SQLite`-backed persistence for the recent-search list: at most
//! `max_recent` distinct entries, most recent first.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::recent::{RecentSearch, StoredRecent, RECENT_KEY};

const MEMORY_PATH: &str = ":memory:";

/// Storage engine for recent searches.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
    /// Namespace for the recent-search list.
    list_key: String,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            path,
            conn,
            list_key: RECENT_KEY.to_string(),
        })
    }

    /// Create an in-memory storage instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(MEMORY_PATH),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(MEMORY_PATH),
            conn,
            list_key: RECENT_KEY.to_string(),
        })
    }

    /// Use a different namespace for the recent-search list.
    #[must_use]
    pub fn with_list_key(mut self, list_key: impl Into<String>) -> Self {
        self.list_key = list_key.into();
        self
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The namespace of the recent-search list.
    #[must_use]
    pub fn list_key(&self) -> &str {
        &self.list_key
    }

    /// Record `entry` as the most recent search.
    ///
    /// An equal entry already in the list is moved to the front rather than
    /// duplicated. The list is then cut to `max_recent` entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn save_recent(&self, entry: &RecentSearch, max_recent: usize) -> Result<()> {
        let hash = entry.compute_hash();
        let searched_at = Utc::now().to_rfc3339();

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM recent_searches WHERE list_key = ?1 AND entry_hash = ?2",
            params![self.list_key, hash],
        )?;
        tx.execute(
            r"
            INSERT INTO recent_searches
                (list_key, entry_hash, origin, destination, depart, ret_depart, searched_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
            params![
                self.list_key,
                hash,
                entry.origin,
                entry.destination,
                entry.depart,
                entry.ret_depart,
                searched_at,
            ],
        )?;
        let pruned = prune(&tx, &self.list_key, max_recent)?;
        tx.commit()?;

        debug!(
            hash = &hash[..16],
            pruned,
            "Saved recent search {}",
            entry.route()
        );
        Ok(())
    }

    /// The stored entries, most recent first, at most `limit` of them.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn recent_entries(&self, limit: usize) -> Result<Vec<StoredRecent>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT id, origin, destination, depart, ret_depart, searched_at
            FROM recent_searches WHERE list_key = ?1
            ORDER BY id DESC LIMIT ?2
            ",
        )?;

        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let entries = stmt
            .query_map(params![self.list_key, limit_i64], Self::row_to_recent)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// The recent searches, most recent first, at most `limit` of them.
    ///
    /// Read failures are logged and yield an empty list.
    #[must_use]
    pub fn load_recent(&self, limit: usize) -> Vec<RecentSearch> {
        match self.recent_entries(limit) {
            Ok(entries) => entries.into_iter().map(|stored| stored.search).collect(),
            Err(e) => {
                warn!("Failed to read recent searches: {e}");
                Vec::new()
            }
        }
    }

    /// Remove every recent search. Returns the number removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn clear_recent(&self) -> Result<usize> {
        let affected = self.conn.execute(
            "DELETE FROM recent_searches WHERE list_key = ?1",
            [&self.list_key],
        )?;
        if affected > 0 {
            info!("Cleared {} recent searches", affected);
        }
        Ok(affected)
    }

    /// Number of stored recent searches.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count_recent(&self) -> Result<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM recent_searches WHERE list_key = ?1",
            [&self.list_key],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let recent_searches = self.count_recent()?;

        let newest: Option<String> = self
            .conn
            .query_row(
                "SELECT searched_at FROM recent_searches WHERE list_key = ?1 ORDER BY id DESC LIMIT 1",
                [&self.list_key],
                |row| row.get(0),
            )
            .optional()?;
        let newest_search = newest
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        let db_size_bytes = if self.path.as_os_str() == MEMORY_PATH {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            recent_searches,
            newest_search,
            db_size_bytes,
            schema_version: migrations::schema_version(&self.conn)?,
        })
    }

    fn row_to_recent(row: &rusqlite::Row) -> rusqlite::Result<StoredRecent> {
        let searched_at: String = row.get(5)?;
        let searched_at = DateTime::parse_from_rfc3339(&searched_at)
            .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

        Ok(StoredRecent {
            id: row.get(0)?,
            search: RecentSearch {
                origin: row.get(1)?,
                destination: row.get(2)?,
                depart: row.get(3)?,
                ret_depart: row.get(4)?,
            },
            searched_at,
        })
    }
}

/// Keep only the newest `keep` rows of the list.
fn prune(conn: &Connection, list_key: &str, keep: usize) -> Result<usize> {
    let keep_i64 = i64::try_from(keep).unwrap_or(i64::MAX);
    let affected = conn.execute(
        r"
        DELETE FROM recent_searches WHERE list_key = ?1 AND id NOT IN (
            SELECT id FROM recent_searches WHERE list_key = ?1 ORDER BY id DESC LIMIT ?2
        )
        ",
        params![list_key, keep_i64],
    )?;
    Ok(affected)
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    /// Number of stored recent searches.
    pub recent_searches: i64,
    /// When the newest entry was saved.
    pub newest_search: Option<DateTime<Utc>>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
    /// Schema version recorded in the database.
    pub schema_version: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recent::DEFAULT_MAX_RECENT;

    fn create_test_storage() -> Storage {
        Storage::open_in_memory().expect("failed to create test storage")
    }

    fn entry(origin: &str, destination: &str) -> RecentSearch {
        RecentSearch {
            origin: origin.to_string(),
            destination: destination.to_string(),
            depart: "2025-12-01".to_string(),
            ret_depart: String::new(),
        }
    }

    fn routes(entries: &[RecentSearch]) -> Vec<String> {
        entries
            .iter()
            .map(|e| format!("{}-{}", e.origin, e.destination))
            .collect()
    }

    #[test]
    fn test_open_in_memory() {
        let storage = create_test_storage();
        assert_eq!(storage.path(), Path::new(":memory:"));
        assert_eq!(storage.list_key(), RECENT_KEY);
        assert!(storage.load_recent(DEFAULT_MAX_RECENT).is_empty());
    }

    #[test]
    fn test_most_recent_first() {
        let storage = create_test_storage();
        storage.save_recent(&entry("DEL", "BOM"), 6).unwrap();
        storage.save_recent(&entry("BOM", "GOI"), 6).unwrap();
        storage.save_recent(&entry("BLR", "DEL"), 6).unwrap();

        let recent = storage.load_recent(6);
        assert_eq!(routes(&recent), ["BLR-DEL", "BOM-GOI", "DEL-BOM"]);
    }

    #[test]
    fn test_resubmitting_moves_to_front_without_duplicates() {
        let storage = create_test_storage();
        storage.save_recent(&entry("DEL", "BOM"), 6).unwrap();
        storage.save_recent(&entry("BOM", "GOI"), 6).unwrap();
        storage.save_recent(&entry("DEL", "BOM"), 6).unwrap();

        let recent = storage.load_recent(6);
        assert_eq!(routes(&recent), ["DEL-BOM", "BOM-GOI"]);
        assert_eq!(storage.count_recent().unwrap(), 2);
    }

    #[test]
    fn test_distinct_by_all_fields() {
        let storage = create_test_storage();
        let one_way = entry("DEL", "BOM");
        let mut round = entry("DEL", "BOM");
        round.ret_depart = "2025-12-05".to_string();

        storage.save_recent(&one_way, 6).unwrap();
        storage.save_recent(&round, 6).unwrap();
        assert_eq!(storage.load_recent(6), [round, one_way]);
    }

    #[test]
    fn test_keeps_at_most_max_recent() {
        let storage = create_test_storage();
        for i in 0..10 {
            storage
                .save_recent(&entry(&format!("O{i}"), "DEL"), DEFAULT_MAX_RECENT)
                .unwrap();
        }

        let recent = storage.load_recent(100);
        assert_eq!(recent.len(), DEFAULT_MAX_RECENT);
        assert_eq!(recent[0].origin, "O9");
        assert_eq!(recent[5].origin, "O4");
    }

    #[test]
    fn test_load_recent_respects_limit() {
        let storage = create_test_storage();
        for origin in ["A", "B", "C"] {
            storage.save_recent(&entry(origin, "DEL"), 6).unwrap();
        }
        assert_eq!(storage.load_recent(2).len(), 2);
    }

    #[test]
    fn test_clear_recent() {
        let storage = create_test_storage();
        storage.save_recent(&entry("DEL", "BOM"), 6).unwrap();
        storage.save_recent(&entry("BOM", "DEL"), 6).unwrap();

        assert_eq!(storage.clear_recent().unwrap(), 2);
        assert!(storage.load_recent(6).is_empty());
        assert_eq!(storage.clear_recent().unwrap(), 0);
    }

    #[test]
    fn test_list_keys_are_separate() {
        let storage = create_test_storage();
        storage.save_recent(&entry("DEL", "BOM"), 6).unwrap();

        let other = storage.with_list_key("other");
        assert!(other.load_recent(6).is_empty());
        other.save_recent(&entry("GOI", "BLR"), 6).unwrap();
        assert_eq!(other.count_recent().unwrap(), 1);
    }

    #[test]
    fn test_read_failure_yields_empty_list() {
        let storage = create_test_storage();
        storage.save_recent(&entry("DEL", "BOM"), 6).unwrap();
        storage
            .conn
            .execute("DROP TABLE recent_searches", [])
            .unwrap();

        assert!(storage.recent_entries(6).is_err());
        assert!(storage.load_recent(6).is_empty());
    }

    #[test]
    fn test_recent_entries_have_timestamps() {
        let storage = create_test_storage();
        let before = Utc::now() - chrono::Duration::seconds(1);
        storage.save_recent(&entry("DEL", "BOM"), 6).unwrap();

        let entries = storage.recent_entries(6).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].searched_at >= before);
    }

    #[test]
    fn test_stats() {
        let storage = create_test_storage();
        let stats = storage.stats().unwrap();
        assert_eq!(stats.recent_searches, 0);
        assert!(stats.newest_search.is_none());
        assert_eq!(stats.db_size_bytes, 0);
        assert_eq!(stats.schema_version, migrations::CURRENT_VERSION);

        storage.save_recent(&entry("DEL", "BOM"), 6).unwrap();
        let stats = storage.stats().unwrap();
        assert_eq!(stats.recent_searches, 1);
        assert!(stats.newest_search.is_some());
    }

    #[test]
    fn test_open_file_database() {
        let dir = std::env::temp_dir().join(format!("flightboard_storage_{}", std::process::id()));
        let path = dir.join("nested").join("recent.db");

        {
            let storage = Storage::open(&path).unwrap();
            storage.save_recent(&entry("DEL", "BOM"), 6).unwrap();
        }
        let storage = Storage::open(&path).unwrap();
        assert_eq!(routes(&storage.load_recent(6)), ["DEL-BOM"]);
        assert!(storage.stats().unwrap().db_size_bytes > 0);

        drop(storage);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
