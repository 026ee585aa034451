use std::io::Write;

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{debug, warn};

use crate::db::{
    add_book, add_vocab, fetch_book, list_books, list_vocab, query_by_vocab, Store, StoreError,
};
use crate::models::{Book, VocabEntry};

use super::command::{Command, CommandError};
use super::helpers::{status_line, surface_error, StatusKind};
use super::table::{books_table, vocab_table};

/// Command summary printed by `HELP`.
pub const HELP_TEXT: &str = "\
Commands (case-sensitive):
  ADDBOOK bookName language1 language2 [description]   create a book
  ADDD - bookName - term1 - term2 - [definition]      add vocabulary to a book
  ADD - term1 - term2 - [definition]                  add vocabulary to the active book
  Q bookName term                                     search both terms of a book
  LIST [bookName]                                     list a book (default: active book)
  QBOOKS                                              list all books
  HELP                                                show this summary
  EXIT                                                close the database and quit";

/// Per-session state carried between commands.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Session {
    active_book: Option<String>,
}

impl Session {
    /// Book that `ADD` and a bare `LIST` operate on.
    pub fn active_book(&self) -> Option<&str> {
        self.active_book.as_deref()
    }

    pub fn set_active_book(&mut self, name: impl Into<String>) {
        self.active_book = Some(name.into());
    }

    fn require_active_book(&self) -> Result<String, CommandError> {
        self.active_book.clone().ok_or(CommandError::NoActiveBook)
    }
}

/// Whether the loop should keep reading after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Anything a single command can fail with.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DispatchError {
    /// User mistakes are reported and the loop continues; store failures end
    /// the session.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Command(_) => true,
            Self::Store(err) => err.is_recoverable(),
        }
    }
}

/// Data produced by a command, rendered separately from execution.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    BookAdded(Book),
    VocabAdded { book: String, entry: VocabEntry },
    Books(Vec<Book>),
    Matches {
        book: Book,
        term: String,
        entries: Vec<VocabEntry>,
    },
    Listing { book: Book, entries: Vec<VocabEntry> },
    Help,
    Exit,
}

/// Dispatcher state: the open store, the session, and output preferences.
pub struct App {
    store: Store,
    session: Session,
    color: bool,
}

impl App {
    pub fn new(store: Store, color: bool) -> Self {
        Self {
            store,
            session: Session::default(),
            color,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Borrow the open store, e.g. to inspect it after a command.
    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn color(&self) -> bool {
        self.color
    }

    /// Hand the store back so the caller can close it.
    pub fn into_store(self) -> Store {
        self.store
    }

    /// Parse, execute, and render one console line. Recoverable failures are
    /// printed and swallowed; only store breakage and output errors bubble
    /// up.
    pub fn handle_line(&mut self, line: &str, out: &mut impl Write) -> Result<Flow> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Flow::Continue);
        }

        let outcome = Command::parse(line)
            .map_err(DispatchError::from)
            .and_then(|command| self.execute(command));

        match outcome {
            Ok(Reply::Exit) => Ok(Flow::Exit),
            Ok(reply) => {
                self.render(&reply, out)?;
                Ok(Flow::Continue)
            }
            Err(err) if err.is_recoverable() => {
                warn!(line, error = %err, "command failed");
                let text = surface_error(&err);
                writeln!(out, "{}", status_line(StatusKind::Error, &text, self.color))
                    .context("failed to write to console")?;
                Ok(Flow::Continue)
            }
            Err(err) => Err(err).with_context(|| format!("command '{line}' failed")),
        }
    }

    /// Run a parsed command against the store, updating the session.
    pub fn execute(&mut self, command: Command) -> Result<Reply, DispatchError> {
        debug!(?command, "executing command");
        let conn = self.store.conn();

        match command {
            Command::Add {
                term1,
                term2,
                definition,
            } => {
                let book = self.session.require_active_book()?;
                let entry = add_vocab(conn, &book, &term1, &term2, definition.as_deref())?;
                Ok(Reply::VocabAdded { book, entry })
            }
            Command::AddTo {
                book,
                term1,
                term2,
                definition,
            } => {
                let entry = add_vocab(conn, &book, &term1, &term2, definition.as_deref())?;
                self.session.set_active_book(book.clone());
                Ok(Reply::VocabAdded { book, entry })
            }
            Command::ListBooks => Ok(Reply::Books(list_books(conn)?)),
            Command::Query { book, term } => {
                let book = resolve_book(conn, &book)?;
                let entries = query_by_vocab(conn, &book.name, &term)?;
                Ok(Reply::Matches {
                    book,
                    term,
                    entries,
                })
            }
            Command::AddBook {
                name,
                language1,
                language2,
                description,
            } => {
                let book = add_book(conn, &name, &language1, &language2, description.as_deref())?;
                self.session.set_active_book(name);
                Ok(Reply::BookAdded(book))
            }
            Command::List { book } => {
                let name = match book {
                    Some(name) => name,
                    None => self.session.require_active_book()?,
                };
                let book = resolve_book(conn, &name)?;
                let entries = list_vocab(conn, &book.name)?;
                Ok(Reply::Listing { book, entries })
            }
            Command::Help => Ok(Reply::Help),
            Command::Exit => Ok(Reply::Exit),
        }
    }

    fn render(&self, reply: &Reply, out: &mut impl Write) -> Result<()> {
        let rendered = match reply {
            Reply::BookAdded(book) => status_line(
                StatusKind::Success,
                &format!("Book {book} added; it is now the active book."),
                self.color,
            ),
            Reply::VocabAdded { book, entry } => status_line(
                StatusKind::Success,
                &format!("Vocabulary added to {book}: {entry}"),
                self.color,
            ),
            Reply::Books(books) if books.is_empty() => {
                status_line(StatusKind::Info, "No books yet.", self.color)
            }
            Reply::Books(books) => books_table(books),
            Reply::Matches {
                book,
                term,
                entries,
            } if entries.is_empty() => status_line(
                StatusKind::Info,
                &format!("No results for '{term}' in {}.", book.name),
                self.color,
            ),
            Reply::Listing { book, entries } if entries.is_empty() => status_line(
                StatusKind::Info,
                &format!("{} has no vocabulary yet.", book.name),
                self.color,
            ),
            Reply::Matches { book, entries, .. } | Reply::Listing { book, entries } => {
                vocab_table(book, entries)
            }
            Reply::Help => HELP_TEXT.to_string(),
            Reply::Exit => return Ok(()),
        };

        writeln!(out, "{rendered}").context("failed to write to console")
    }
}

fn resolve_book(conn: &rusqlite::Connection, name: &str) -> Result<Book, StoreError> {
    fetch_book(conn, name)?.ok_or_else(|| StoreError::BookNotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::count_vocab;

    fn app() -> App {
        App::new(Store::open_in_memory().unwrap(), false)
    }

    fn run(app: &mut App, line: &str) -> String {
        let mut out = Vec::new();
        let flow = app.handle_line(line, &mut out).unwrap();
        assert_eq!(flow, Flow::Continue);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn add_without_active_book_fails_explicitly() {
        let mut app = app();

        let err = app
            .execute(Command::parse("ADD - apple - manzana").unwrap())
            .unwrap_err();
        assert!(matches!(err, DispatchError::Command(CommandError::NoActiveBook)));
        assert!(err.is_recoverable());

        let output = run(&mut app, "ADD - apple - manzana");
        assert!(output.contains("no active book"));
    }

    #[test]
    fn addd_switches_the_active_book() {
        let mut app = app();
        run(&mut app, "ADDBOOK ENSP English Spanish");
        run(&mut app, "ADDBOOK ENDE English German");
        assert_eq!(app.session().active_book(), Some("ENDE"));

        run(&mut app, "ADDD - ENSP - apple - manzana");
        assert_eq!(app.session().active_book(), Some("ENSP"));

        let output = run(&mut app, "ADD - dog - perro - animal");
        assert!(output.contains("Vocabulary added to ENSP: dog - perro: animal"));
    }

    #[test]
    fn failed_addd_keeps_the_previous_active_book() {
        let mut app = app();
        run(&mut app, "ADDBOOK ENSP English Spanish");

        let output = run(&mut app, "ADDD - NOPE - apple - manzana");
        assert!(output.contains("book 'NOPE' not found"));
        assert_eq!(app.session().active_book(), Some("ENSP"));
        assert_eq!(count_vocab(app.store().conn()).unwrap(), 0);
    }

    #[test]
    fn duplicate_book_is_reported_and_the_loop_continues() {
        let mut app = app();
        run(&mut app, "ADDBOOK ENSP English Spanish");

        let output = run(&mut app, "ADDBOOK ENSP English French");
        assert!(output.contains("book 'ENSP' already exists"));
    }

    #[test]
    fn query_renders_a_table_with_language_headers() {
        let mut app = app();
        run(&mut app, "ADDBOOK ENSP English Spanish");
        run(&mut app, "ADD - apple - manzana");
        run(&mut app, "ADD - dog - perro");

        let output = run(&mut app, "Q ENSP man");
        assert!(output.contains("English"));
        assert!(output.contains("Definition"));
        assert!(output.contains("manzana"));
        assert!(!output.contains("perro"));

        let output = run(&mut app, "Q ENSP gato");
        assert_eq!(output.trim(), "No results for 'gato' in ENSP.");
    }

    #[test]
    fn query_on_missing_book_is_not_found() {
        let mut app = app();
        let output = run(&mut app, "Q ENSP man");
        assert!(output.contains("book 'ENSP' not found"));
    }

    #[test]
    fn list_uses_the_active_book_by_default() {
        let mut app = app();
        let output = run(&mut app, "LIST");
        assert!(output.contains("no active book"));

        run(&mut app, "ADDBOOK ENSP English Spanish");
        let output = run(&mut app, "LIST");
        assert_eq!(output.trim(), "ENSP has no vocabulary yet.");

        run(&mut app, "ADD - apple - manzana");
        let output = run(&mut app, "LIST ENSP");
        assert!(output.contains("apple"));
    }

    #[test]
    fn invalid_and_blank_lines_keep_the_loop_alive() {
        let mut app = app();
        assert!(run(&mut app, "   ").is_empty());
        assert!(run(&mut app, "FLY me to the moon").contains("invalid command"));
        assert!(run(&mut app, "Q").contains("invalid command"));
    }

    #[test]
    fn exit_stops_the_loop() {
        let mut app = app();
        let mut out = Vec::new();
        assert_eq!(app.handle_line("EXIT", &mut out).unwrap(), Flow::Exit);
        assert!(out.is_empty());
    }

    #[test]
    fn qbooks_lists_books() {
        let mut app = app();
        assert_eq!(run(&mut app, "QBOOKS").trim(), "No books yet.");

        run(&mut app, r#"ADDBOOK ENSP English Spanish "Spanish class""#);
        let output = run(&mut app, "QBOOKS");
        assert!(output.contains("ENSP"));
        assert!(output.contains("Spanish class"));
    }
}
