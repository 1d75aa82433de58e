//! SQLite-backed persistence for bookmarks and archive settings.
//!
//! Bookmarks live in `saved_cases`, one row per case id. Counters and flags
//! live in a small `settings` key/value table. Opt-in via the `store` feature.

use rusqlite::{params, Connection, OptionalExtension};

use super::filter::SavedSet;
use super::saved::ArchiveStore;
use crate::error::{ArchiveError, Result};

const VISITOR_COUNT_KEY: &str = "visitor_count";
const WARNING_ACCEPTED_KEY: &str = "warning_accepted";

/// SQLite-backed archive store.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a store at the given path. `:memory:` is accepted.
    pub fn open_or_create(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .map_err(|e| ArchiveError::Storage(format!("failed to open store at '{path}': {e}")))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS saved_cases (
                id  TEXT PRIMARY KEY NOT NULL
            );
            CREATE TABLE IF NOT EXISTS settings (
                key    TEXT PRIMARY KEY NOT NULL,
                value  TEXT NOT NULL
            );",
        )?;

        tracing::debug!(path, "opened archive store");
        Ok(Self { conn })
    }

    fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    /// Number of bookmarked cases.
    pub fn saved_count(&self) -> Result<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM saved_cases", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}

impl ArchiveStore for SqliteStore {
    fn load_saved_ids(&self) -> Result<SavedSet> {
        let mut stmt = self.conn.prepare("SELECT id FROM saved_cases")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut ids = SavedSet::new();
        for row in rows {
            ids.insert(row?);
        }
        Ok(ids)
    }

    fn save_saved_ids(&mut self, ids: &SavedSet) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM saved_cases", [])?;
        {
            let mut stmt = tx.prepare("INSERT INTO saved_cases (id) VALUES (?1)")?;
            for id in ids {
                stmt.execute(params![id])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn load_visitor_count(&self) -> Result<u64> {
        match self.get_setting(VISITOR_COUNT_KEY)? {
            Some(raw) => raw.parse().map_err(|e| {
                ArchiveError::Storage(format!("corrupt visitor count '{raw}': {e}"))
            }),
            None => Ok(0),
        }
    }

    fn increment_visitor_count(&mut self) -> Result<u64> {
        let next = self.load_visitor_count()? + 1;
        self.set_setting(VISITOR_COUNT_KEY, &next.to_string())?;
        Ok(next)
    }

    fn warning_accepted(&self) -> Result<bool> {
        Ok(self.get_setting(WARNING_ACCEPTED_KEY)?.as_deref() == Some("true"))
    }

    fn accept_warning(&mut self) -> Result<u64> {
        if self.warning_accepted()? {
            return self.load_visitor_count();
        }
        self.set_setting(WARNING_ACCEPTED_KEY, "true")?;
        self.increment_visitor_count()
    }
}
