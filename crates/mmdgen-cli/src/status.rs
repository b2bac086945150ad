//! Status line output for the terminal
//!
//! Status messages go to stderr (stdout carries artifact paths), colored with
//! crossterm when the stream is a terminal.

use std::io::{self, Write};

use crossterm::style::{Color, Stylize};
use crossterm::tty::IsTty;

use crate::cli::ColorChoice;

/// Kind of status message, which decides its marker and color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Warning,
    Failure,
}

impl StatusKind {
    fn marker(&self) -> &'static str {
        match self {
            StatusKind::Info => "•",
            StatusKind::Success => "✓",
            StatusKind::Warning => "!",
            StatusKind::Failure => "✗",
        }
    }

    fn color(&self) -> Color {
        match self {
            StatusKind::Info => Color::Cyan,
            StatusKind::Success => Color::Green,
            StatusKind::Warning => Color::Yellow,
            StatusKind::Failure => Color::Red,
        }
    }
}

/// Formats and prints status messages
#[derive(Debug, Clone, Copy)]
pub struct StatusPrinter {
    colored: bool,
}

impl StatusPrinter {
    /// Resolve `choice` against `NO_COLOR` and whether stderr is a terminal
    pub fn new(choice: ColorChoice) -> Self {
        let colored = match choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => std::env::var("NO_COLOR").is_err() && io::stderr().is_tty(),
        };
        Self { colored }
    }

    pub fn plain() -> Self {
        Self { colored: false }
    }

    /// Render one status line without a trailing newline
    pub fn paint(&self, kind: StatusKind, message: &str) -> String {
        if self.colored {
            format!(
                "{} {}",
                kind.marker().with(kind.color()).bold(),
                message.with(kind.color())
            )
        } else {
            format!("{} {}", kind.marker(), message)
        }
    }

    /// Print one status line to stderr
    pub fn emit(&self, kind: StatusKind, message: &str) {
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "{}", self.paint(kind, message));
    }
}
