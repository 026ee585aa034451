//! Domain models that mirror the SQLite schema. They stay plain data holders
//! so the persistence layer can hand them out and the console layer can format
//! them without either side knowing about the other.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
/// A named vocabulary set tied to a language pair, one row of `Books`.
pub struct Book {
    /// `Book_ID`, assigned by SQLite on insert.
    pub id: i64,
    /// Unique name used by every console command to address the book.
    pub name: String,
    /// Language of the first term in each entry, also used as a table header.
    pub language1: String,
    /// Language of the second term in each entry.
    pub language2: String,
    /// Free-form note about the book; `None` when none was given.
    pub description: Option<String>,
}

impl Book {
    /// Description text with a missing value rendered as an empty string.
    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} / {})", self.name, self.language1, self.language2)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A term pair belonging to exactly one book, one row of `Vocabulary`.
pub struct VocabEntry {
    /// `Vocab_ID`; ascending ids follow insertion order.
    pub id: i64,
    /// `Book_ID` of the owning book.
    pub book_id: i64,
    /// Term in the book's `language1`.
    pub term1: String,
    /// Term in the book's `language2`.
    pub term2: String,
    /// Optional explanation of the term pair.
    pub definition: Option<String>,
}

impl VocabEntry {
    /// Definition text with a missing value rendered as an empty string.
    pub fn definition_text(&self) -> &str {
        self.definition.as_deref().unwrap_or("")
    }
}

impl fmt::Display for VocabEntry {
    /// `term1 - term2`, followed by `: definition` when one was recorded.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.definition.as_deref() {
            Some(definition) if !definition.is_empty() => {
                write!(f, "{} - {}: {}", self.term1, self.term2, definition)
            }
            _ => write!(f, "{} - {}", self.term1, self.term2),
        }
    }
}
