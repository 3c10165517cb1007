//! Diagnostic line output.
//!
//! Every user-visible diagnostic is one line prefixed `error:` or `Warning:`,
//! optionally followed by `note:` lines carrying include-chain context.

mod progress;

pub use progress::ScanProgress;

use std::io::{IsTerminal, Write};

/// ANSI color codes
mod ansi {
    pub const RED: &str = "\x1b[31m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const RESET: &str = "\x1b[0m";
}

/// Writer for diagnostic lines with optional color on the prefix.
pub struct DiagnosticWriter {
    use_colors: bool,
}

impl DiagnosticWriter {
    /// Auto-detects color support on stdout (`NO_COLOR` respected).
    #[must_use]
    pub fn stdout() -> Self {
        let use_colors = std::env::var("NO_COLOR").is_err() && std::io::stdout().is_terminal();
        Self { use_colors }
    }

    #[cfg(test)]
    pub(crate) const fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    pub fn write_error<W: Write>(&self, w: &mut W, message: &str) {
        // write failures to a closed or redirected stream are not recoverable
        let _ = writeln!(w, "{} {message}", self.prefix("error:", ansi::RED));
    }

    pub fn write_warning<W: Write>(&self, w: &mut W, message: &str) {
        let _ = writeln!(w, "{} {message}", self.prefix("Warning:", ansi::YELLOW));
    }

    pub fn write_note<W: Write>(&self, w: &mut W, message: &str) {
        let _ = writeln!(w, "{} {message}", self.prefix("note:", ansi::CYAN));
    }

    fn prefix(&self, text: &str, color: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{}", ansi::RESET)
        } else {
            text.to_string()
        }
    }
}

/// Prints `error: {message}` to stdout.
pub fn print_error(message: &str) {
    DiagnosticWriter::stdout().write_error(&mut std::io::stdout().lock(), message);
}

/// Prints `Warning: {message}` to stdout.
pub fn print_warning(message: &str) {
    DiagnosticWriter::stdout().write_warning(&mut std::io::stdout().lock(), message);
}

/// Prints `note: {message}` to stdout.
pub fn print_note(message: &str) {
    DiagnosticWriter::stdout().write_note(&mut std::io::stdout().lock(), message);
}
