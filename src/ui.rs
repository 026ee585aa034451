//! Console front-end: parses line-oriented commands, runs them against the
//! store, and renders the results. Persistence code never prints; everything
//! user-facing is produced here.

mod app;
mod command;
mod helpers;
mod table;
mod terminal;

pub use app::{App, DispatchError, Flow, Reply, Session, HELP_TEXT};
pub use command::{Command, CommandError};
pub use table::{books_table, render_table, vocab_table};
pub use terminal::run_app;
