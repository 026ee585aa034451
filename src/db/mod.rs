//! Persistence layer: the store owning the SQLite connection plus the
//! repository functions for books and vocabulary. Nothing in here writes to
//! the console; callers receive data or a `StoreError`.

mod books;
mod connection;
mod error;
mod vocabulary;

pub use books::{add_book, count_books, fetch_book, find_book_id, get_book_id, list_books};
pub use connection::{Store, DEFAULT_DB_PATH};
pub use error::{StoreError, StoreResult};
pub use vocabulary::{add_vocab, count_vocab, list_vocab, query_by_vocab};
