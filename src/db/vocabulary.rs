use rusqlite::{params, Connection, Row};
use tracing::debug;

use super::books::get_book_id;
use super::error::StoreResult;
use crate::models::VocabEntry;

/// Escape character used in every `LIKE` pattern built by this module.
const LIKE_ESCAPE: char = '\\';

/// Add a term pair to the named book. The book is resolved first, so a
/// missing book yields `BookNotFound` and nothing is inserted. Duplicate
/// term pairs are allowed.
pub fn add_vocab(
    conn: &Connection,
    book_name: &str,
    term1: &str,
    term2: &str,
    definition: Option<&str>,
) -> StoreResult<VocabEntry> {
    let book_id = get_book_id(conn, book_name)?;

    conn.execute(
        "INSERT INTO Vocabulary (Book_ID, vocab_language1, vocab_language2, definition)
         VALUES (?1, ?2, ?3, ?4)",
        params![book_id, term1, term2, definition],
    )?;

    let id = conn.last_insert_rowid();
    debug!(id, book = book_name, term1, term2, "added vocabulary entry");
    Ok(VocabEntry {
        id,
        book_id,
        term1: term1.to_string(),
        term2: term2.to_string(),
        definition: definition.map(str::to_string),
    })
}

/// Entries of a book where either term contains `substring`.
///
/// Matching follows SQLite `LIKE`: ASCII letters compare case-insensitively,
/// everything else must match exactly. `%`, `_` and `\` in `substring` are
/// matched literally. An empty substring returns the whole book. Results are
/// ordered by `Vocab_ID`, and a missing book is `BookNotFound` rather than an
/// empty result.
pub fn query_by_vocab(
    conn: &Connection,
    book_name: &str,
    substring: &str,
) -> StoreResult<Vec<VocabEntry>> {
    let book_id = get_book_id(conn, book_name)?;
    let pattern = format!("%{}%", escape_like(substring));

    let mut stmt = conn.prepare(
        "SELECT Vocab_ID, Book_ID, vocab_language1, vocab_language2, definition
         FROM Vocabulary
         WHERE Book_ID = ?1
           AND (vocab_language1 LIKE ?2 ESCAPE '\\' OR vocab_language2 LIKE ?2 ESCAPE '\\')
         ORDER BY Vocab_ID",
    )?;

    let entries = stmt
        .query_map(params![book_id, pattern], entry_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    debug!(book = book_name, substring, matches = entries.len(), "searched vocabulary");
    Ok(entries)
}

/// Every entry of a book in insertion order.
pub fn list_vocab(conn: &Connection, book_name: &str) -> StoreResult<Vec<VocabEntry>> {
    let book_id = get_book_id(conn, book_name)?;

    let mut stmt = conn.prepare(
        "SELECT Vocab_ID, Book_ID, vocab_language1, vocab_language2, definition
         FROM Vocabulary
         WHERE Book_ID = ?1
         ORDER BY Vocab_ID",
    )?;

    let entries = stmt
        .query_map([book_id], entry_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(entries)
}

/// Number of rows in `Vocabulary`, across all books.
pub fn count_vocab(conn: &Connection) -> StoreResult<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM Vocabulary", [], |row| row.get(0))?)
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<VocabEntry> {
    Ok(VocabEntry {
        id: row.get(0)?,
        book_id: row.get(1)?,
        term1: row.get(2)?,
        term2: row.get(3)?,
        definition: row.get(4)?,
    })
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '%' | '_') || ch == LIKE_ESCAPE {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(ch);
    }
    escaped
}
