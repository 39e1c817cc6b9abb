//! SQLite-backed durable key-value store. One `settings` table keyed by
//! text, upserted on write.

use rusqlite::Connection;

use std::env;
use std::sync::OnceLock;

use crate::identity::device_uuid::{KeyValueStore, StoreError};

pub fn new_connection_result() -> Result<Connection, rusqlite::Error> {
    let db_url = get_database_url();
    let db_path = db_url.strip_prefix("sqlite://").unwrap_or(&db_url);
    let conn = Connection::open(db_path).map_err(|e| {
        eprintln!(
            "Failed to open database at '{}': {} (cwd: {:?})",
            db_path,
            e,
            std::env::current_dir()
        );
        e
    })?;

    // Set busy timeout first (this doesn't require any locks)
    let _ = conn.execute("PRAGMA busy_timeout = 5000;", []);

    // Try to enable WAL mode (only needs to succeed once per database)
    let _ = conn.execute("PRAGMA journal_mode = WAL;", []);

    // NORMAL sync is safe with WAL mode
    let _ = conn.execute("PRAGMA synchronous = NORMAL;", []);

    Ok(conn)
}

static RESOLVED_DB_PATH: OnceLock<String> = OnceLock::new();

fn get_database_url() -> String {
    RESOLVED_DB_PATH
        .get_or_init(|| {
            let db_path = env::var("DATABASE_URL").unwrap_or_else(|_| "identity.db".to_string());

            // Convert relative paths to absolute to avoid issues with working directory changes
            if !db_path.starts_with('/')
                && !db_path.starts_with("sqlite://")
                && db_path != ":memory:"
                && let Ok(cwd) = env::current_dir()
            {
                return cwd.join(&db_path).to_string_lossy().to_string();
            }

            db_path
        })
        .clone()
}

fn create_settings_table(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at INTEGER DEFAULT (strftime('%s', 'now'))
        )",
        [],
    )?;
    Ok(())
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::WriteFailed(err.to_string())
    }
}

/// Durable store over a SQLite connection. Entries survive process restarts
/// within the same installation.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the store at the path resolved from `DATABASE_URL`
    pub fn open() -> Result<Self, rusqlite::Error> {
        Self::from_connection(new_connection_result()?)
    }

    pub fn from_connection(conn: Connection) -> Result<Self, rusqlite::Error> {
        create_settings_table(&conn)?;
        Ok(SqliteStore { conn })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Option<String> {
        self.conn
            .query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .ok()
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, strftime('%s', 'now'))
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = strftime('%s', 'now')",
            rusqlite::params![key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::device_uuid::{DEVICE_UUID_KEY, get_or_create};

    fn new_test_store() -> SqliteStore {
        let conn = Connection::open_in_memory().expect("Failed to create in-memory database");
        SqliteStore::from_connection(conn).expect("Failed to create settings table")
    }

    #[test]
    fn test_get_missing_key_is_absent() {
        let store = new_test_store();
        assert_eq!(store.get("deviceUUID"), None);
    }

    #[test]
    fn test_put_then_get_roundtrip() {
        let store = new_test_store();
        store.put("deviceUUID", "abc-123").unwrap();
        assert_eq!(store.get("deviceUUID"), Some("abc-123".to_string()));
    }

    #[test]
    fn test_put_overwrites_existing_value() {
        let store = new_test_store();
        store.put("deviceUUID", "first").unwrap();
        store.put("deviceUUID", "second").unwrap();
        assert_eq!(store.get("deviceUUID"), Some("second".to_string()));
    }

    #[test]
    fn test_entries_survive_reopening_the_same_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        let path = temp.path().to_path_buf();

        {
            let store =
                SqliteStore::from_connection(Connection::open(&path).unwrap()).unwrap();
            store.put("deviceUUID", "persisted").unwrap();
        }

        let reopened = SqliteStore::from_connection(Connection::open(&path).unwrap()).unwrap();
        assert_eq!(reopened.get("deviceUUID"), Some("persisted".to_string()));
    }

    #[test]
    fn test_rejected_write_maps_to_store_error() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        let path = temp.path().to_path_buf();

        // Create the schema, then reopen read-only so writes are refused
        SqliteStore::from_connection(Connection::open(&path).unwrap()).unwrap();
        let conn =
            Connection::open_with_flags(&path, rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY)
                .unwrap();
        let store = SqliteStore { conn };

        assert!(matches!(
            store.put("deviceUUID", "value"),
            Err(StoreError::WriteFailed(_))
        ));
    }

    #[test]
    fn test_get_or_create_against_sqlite_store() {
        let store = new_test_store();

        let first = get_or_create(&store).unwrap();
        let second = get_or_create(&store).unwrap();
        assert_eq!(first, second);

        store
            .conn
            .execute("DELETE FROM settings WHERE key = ?1", [DEVICE_UUID_KEY])
            .unwrap();
        let third = get_or_create(&store).unwrap();
        assert_ne!(first, third);
    }
}
