//! Core library surface for the vocabulary book manager.
//!
//! The persistence layer (`db`) and the console dispatcher (`ui`) are public
//! so the binary and the integration tests drive the same pieces.
pub mod db;
pub mod models;
pub mod ui;

/// Store lifecycle plus the repository operations on books and vocabulary.
pub use db::{
    add_book, add_vocab, get_book_id, list_books, query_by_vocab, Store, StoreError,
    DEFAULT_DB_PATH,
};

/// The two domain types handed between the layers.
pub use models::{Book, VocabEntry};

/// The interactive command loop and its state container.
pub use ui::{run_app, App};
