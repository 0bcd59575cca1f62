use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::ReelError;
use crate::models::WatchedEntry;

const SCHEMA_V1: &str = include_str!("../../../migrations/001_snapshot.sql");

/// Key the watched list snapshot is stored under.
pub const WATCHED_KEY: &str = "watched";

/// A durable key/value byte store.
///
/// `store` must replace the value in one step: a reader sees either the
/// previous value or the new one, never a mix.
pub trait KeyValueStore: Send {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, ReelError>;
    fn store(&self, key: &str, value: &[u8]) -> Result<(), ReelError>;
}

/// SQLite-backed snapshot storage.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open (or create) the database at the given path and run migrations.
    pub fn open(path: &Path) -> Result<Self, ReelError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        run_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, ReelError> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;
        Ok(Self { conn })
    }
}

impl KeyValueStore for Storage {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, ReelError> {
        self.conn
            .query_row(
                "SELECT value FROM snapshot WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    fn store(&self, key: &str, value: &[u8]) -> Result<(), ReelError> {
        self.conn.execute(
            "INSERT INTO snapshot (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
               value = excluded.value,
               updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

// ── Snapshot codec ──────────────────────────────────────────────

/// Serialize the full watched list.
pub fn encode_snapshot(entries: &[WatchedEntry]) -> Result<Vec<u8>, ReelError> {
    Ok(serde_json::to_vec(entries)?)
}

/// Parse a stored watched list.
pub fn decode_snapshot(bytes: &[u8]) -> Result<Vec<WatchedEntry>, ReelError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Load the watched list, treating a missing or unreadable snapshot as empty.
pub fn load_watched(store: &dyn KeyValueStore) -> Vec<WatchedEntry> {
    let bytes = match store.load(WATCHED_KEY) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read watched snapshot, starting empty");
            return Vec::new();
        }
    };

    // Older snapshots were written as a bare `null` before anything was watched.
    if bytes.trim_ascii() == b"null" {
        return Vec::new();
    }

    decode_snapshot(&bytes).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Corrupt watched snapshot, starting empty");
        Vec::new()
    })
}

fn run_migrations(conn: &Connection) -> Result<(), ReelError> {
    let version: i32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .unwrap_or(0);

    if version < 1 {
        conn.execute_batch(SCHEMA_V1)?;
        conn.pragma_update(None, "user_version", 1)?;
    }
    Ok(())
}
