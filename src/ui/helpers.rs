use std::error::Error;

use crossterm::style::Stylize;

/// Severity of a status line printed after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusKind {
    Info,
    Success,
    Error,
}

/// Format a one-line status message, coloured by severity when `color` is
/// set.
pub(crate) fn status_line(kind: StatusKind, text: &str, color: bool) -> String {
    if !color {
        return text.to_string();
    }
    match kind {
        StatusKind::Info => text.dim().to_string(),
        StatusKind::Success => text.green().to_string(),
        StatusKind::Error => text.red().bold().to_string(),
    }
}

/// Flatten an error and its sources into `outer: inner: ...`.
pub(crate) fn surface_error(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::StoreError;

    #[test]
    fn plain_status_lines_carry_no_escape_codes() {
        let line = status_line(StatusKind::Error, "book 'X' not found", false);
        assert_eq!(line, "book 'X' not found");
    }

    #[test]
    fn coloured_status_lines_keep_the_text() {
        let line = status_line(StatusKind::Success, "added", true);
        assert!(line.contains("added"));
    }

    #[test]
    fn surface_error_includes_sources() {
        let err = StoreError::Io {
            path: "data".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(
            surface_error(&err),
            "failed to create data directory data: denied"
        );
    }
}
