//! `SQLite` schema definitions for flightboard.

/// SQL statement to create the recent-searches table.
///
/// `list_key` namespaces the list; `entry_hash` is unique per list so a
/// re-submitted search replaces its old row.
pub const CREATE_RECENT_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS recent_searches (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    list_key TEXT NOT NULL,
    entry_hash TEXT NOT NULL,
    origin TEXT NOT NULL,
    destination TEXT NOT NULL,
    depart TEXT NOT NULL,
    ret_depart TEXT NOT NULL,
    searched_at TEXT NOT NULL,
    UNIQUE (list_key, entry_hash)
)
";

/// SQL statement to create an index for newest-first listing.
pub const CREATE_LIST_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_recent_list ON recent_searches(list_key, id DESC)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_RECENT_TABLE,
    CREATE_LIST_INDEX,
    CREATE_METADATA_TABLE,
];
