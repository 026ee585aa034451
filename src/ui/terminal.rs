use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use super::app::{App, Flow};
use super::command::CommandError;
use super::helpers::{status_line, StatusKind};

const PROMPT: &str = "> ";

/// Read commands line by line until `EXIT` or end of input, then close the
/// store. Any early return drops the app, which releases the connection as
/// well.
pub fn run_app<R: BufRead, W: Write>(mut app: App, mut input: R, mut output: W) -> Result<()> {
    let color = app.color();
    writeln!(
        output,
        "{}",
        status_line(
            StatusKind::Info,
            "Vocabulary manager ready. Type HELP for commands.",
            color
        )
    )
    .context("failed to write to console")?;

    let mut buf = Vec::new();
    loop {
        write!(output, "{PROMPT}").context("failed to write prompt")?;
        output.flush().context("failed to flush console")?;

        buf.clear();
        let read = input
            .read_until(b'\n', &mut buf)
            .context("failed to read command")?;
        if read == 0 {
            debug!("end of input");
            writeln!(output).context("failed to write to console")?;
            break;
        }

        let Ok(line) = std::str::from_utf8(&buf) else {
            warn!(bytes = buf.len(), "skipping line that is not valid UTF-8");
            let err = CommandError::Invalid("line is not valid UTF-8".to_string());
            writeln!(
                output,
                "{}",
                status_line(StatusKind::Error, &err.to_string(), color)
            )
            .context("failed to write to console")?;
            continue;
        };

        if app.handle_line(line, &mut output)? == Flow::Exit {
            info!("exit requested");
            break;
        }
    }

    app.into_store().close().context("failed to close the database")?;
    writeln!(output, "{}", status_line(StatusKind::Info, "Goodbye.", color))
        .context("failed to write to console")?;
    Ok(())
}
