use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by the store and the repository functions. The console
/// layer decides how each one is presented.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("book '{0}' not found")]
    BookNotFound(String),

    #[error("book '{0}' already exists")]
    DuplicateBook(String),

    #[error("failed to open database at {}", path.display())]
    Connection {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to create data directory {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

impl StoreError {
    /// Whether the command loop can report the error and keep going.
    /// Everything that is not about user-supplied names points at a broken
    /// store.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::BookNotFound(_) | Self::DuplicateBook(_))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
