//! Binary entry point: parse options, set up logging, open the store, and run
//! the command loop on stdin/stdout until `EXIT`.
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vocab_book_manager::{run_app, App, Store, DEFAULT_DB_PATH};

#[derive(Parser)]
#[command(name = "vocab")]
#[command(version)]
#[command(about = "Personal vocabulary books with substring search")]
struct Cli {
    /// Path to the SQLite database file
    #[arg(short, long, env = "VOCAB_DB", default_value = DEFAULT_DB_PATH)]
    database: PathBuf,

    /// Disable coloured status lines
    #[arg(long)]
    no_color: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    let store = Store::open(&cli.database)
        .with_context(|| format!("could not open {}", cli.database.display()))?;

    let app = App::new(store, !cli.no_color);
    run_app(app, io::stdin().lock(), io::stdout().lock())
}
