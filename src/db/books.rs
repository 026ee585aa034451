use rusqlite::{params, Connection, Error as SqlError, ErrorCode, OptionalExtension};
use tracing::debug;

use super::error::{StoreError, StoreResult};
use crate::models::Book;

/// Retrieve every book in insertion order. `Book_ID` is the only ordering key
/// so listings stay stable between runs.
pub fn list_books(conn: &Connection) -> StoreResult<Vec<Book>> {
    let mut stmt = conn.prepare(
        "SELECT Book_ID, name, language1, language2, description
         FROM Books
         ORDER BY Book_ID",
    )?;

    let books = stmt
        .query_map([], |row| {
            Ok(Book {
                id: row.get(0)?,
                name: row.get(1)?,
                language1: row.get(2)?,
                language2: row.get(3)?,
                description: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(books)
}

/// Insert a new book row, returning the hydrated struct. A name that is
/// already taken leaves the table unchanged and yields `DuplicateBook`.
pub fn add_book(
    conn: &Connection,
    name: &str,
    language1: &str,
    language2: &str,
    description: Option<&str>,
) -> StoreResult<Book> {
    conn.execute(
        "INSERT INTO Books (name, language1, language2, description) VALUES (?1, ?2, ?3, ?4)",
        params![name, language1, language2, description],
    )
    .map_err(|err| map_unique_constraint(err, name))?;

    let id = conn.last_insert_rowid();
    debug!(id, name, "added book");
    Ok(Book {
        id,
        name: name.to_string(),
        language1: language1.to_string(),
        language2: language2.to_string(),
        description: description.map(str::to_string),
    })
}

/// Exact-name lookup that treats a missing book as a normal outcome.
pub fn find_book_id(conn: &Connection, name: &str) -> StoreResult<Option<i64>> {
    let id = conn
        .query_row(
            "SELECT Book_ID FROM Books WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

/// Resolve a book name to its id, failing with `BookNotFound`.
pub fn get_book_id(conn: &Connection, name: &str) -> StoreResult<i64> {
    find_book_id(conn, name)?.ok_or_else(|| StoreError::BookNotFound(name.to_string()))
}

/// Load the whole row for a book name. The dispatcher uses the languages as
/// column headers for search results.
pub fn fetch_book(conn: &Connection, name: &str) -> StoreResult<Option<Book>> {
    let book = conn
        .query_row(
            "SELECT Book_ID, name, language1, language2, description
             FROM Books
             WHERE name = ?1",
            params![name],
            |row| {
                Ok(Book {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    language1: row.get(2)?,
                    language2: row.get(3)?,
                    description: row.get(4)?,
                })
            },
        )
        .optional()?;
    Ok(book)
}

/// Number of rows in `Books`.
pub fn count_books(conn: &Connection) -> StoreResult<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM Books", [], |row| row.get(0))?)
}

/// The only constraint a book insert can trip is the unique name, so any
/// constraint violation is reported as a duplicate.
fn map_unique_constraint(err: SqlError, name: &str) -> StoreError {
    if matches!(
        err.sqlite_error_code(),
        Some(ErrorCode::ConstraintViolation)
    ) {
        StoreError::DuplicateBook(name.to_string())
    } else {
        err.into()
    }
}
