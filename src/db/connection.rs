use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::{debug, info};

use super::error::{StoreError, StoreResult};

/// Default location of the SQLite file, relative to the working directory.
pub const DEFAULT_DB_PATH: &str = "data/db.sql";

/// Owner of the single SQLite connection. Dropping the store releases the
/// connection; `close` does the same but reports failures.
#[derive(Debug)]
pub struct Store {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Store {
    /// Ensure the database file exists, create the schema if it is missing,
    /// and return a live store. Foreign keys are switched on so the engine
    /// rejects vocabulary rows that point at a missing book.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let existed = path.exists();
        let connection_error = |source| StoreError::Connection {
            path: path.to_path_buf(),
            source,
        };

        let conn = Connection::open(path).map_err(connection_error)?;
        ensure_schema(&conn).map_err(connection_error)?;

        info!(path = %path.display(), existed, "opened vocabulary store");
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Same bootstrap as [`Store::open`] against a private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        let connection_error = |source| StoreError::Connection {
            path: PathBuf::from(":memory:"),
            source,
        };

        let conn = Connection::open_in_memory().map_err(connection_error)?;
        ensure_schema(&conn).map_err(connection_error)?;

        debug!("opened in-memory vocabulary store");
        Ok(Self { conn, path: None })
    }

    /// Borrow the live connection for the repository functions.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Backing file, or `None` for an in-memory store.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Release the connection. Taking `self` means a store can only be
    /// closed once.
    pub fn close(self) -> StoreResult<()> {
        let path = self.path;
        self.conn.close().map_err(|(_, err)| StoreError::Sqlite(err))?;
        match path {
            Some(path) => info!(path = %path.display(), "closed vocabulary store"),
            None => debug!("closed in-memory vocabulary store"),
        }
        Ok(())
    }
}

/// Create both tables when absent. Existing tables are left untouched, so
/// reopening a populated file is a no-op.
fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute("PRAGMA foreign_keys = ON", [])?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS Books (
            Book_ID INTEGER PRIMARY KEY,
            name VARCHAR(25) NOT NULL UNIQUE,
            language1 VARCHAR(25),
            language2 VARCHAR(25),
            description VARCHAR(255) NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS Vocabulary (
            Vocab_ID INTEGER PRIMARY KEY,
            Book_ID INTEGER NOT NULL,
            vocab_language1 VARCHAR(50),
            vocab_language2 VARCHAR(50),
            definition VARCHAR(255) NULL,
            FOREIGN KEY (Book_ID) REFERENCES Books (Book_ID)
        )",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<String>, _>>()
            .unwrap()
    }

    #[test]
    fn open_creates_file_and_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("db.sql");

        let store = Store::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(store.path(), Some(path.as_path()));
        assert_eq!(table_names(store.conn()), vec!["Books", "Vocabulary"]);
        store.close().unwrap();
    }

    #[test]
    fn foreign_keys_are_enforced() {
        let store = Store::open_in_memory().unwrap();
        let enabled: i64 = store
            .conn()
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);

        let err = store
            .conn()
            .execute(
                "INSERT INTO Vocabulary (Book_ID, vocab_language1, vocab_language2) VALUES (42, 'a', 'b')",
                [],
            )
            .unwrap_err();
        assert_eq!(
            err.sqlite_error_code(),
            Some(rusqlite::ErrorCode::ConstraintViolation)
        );
    }

    #[test]
    fn open_rejects_a_file_that_is_not_a_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.sql");
        fs::write(&path, "this is not a sqlite database\n".repeat(64)).unwrap();

        let err = Store::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Connection { .. }));
        assert!(!err.is_recoverable());
    }
}
