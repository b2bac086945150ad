//! Line-oriented terminal editor
//!
//! Plain lines are appended to the diagram buffer. Lines starting with `:`
//! are commands; start a line with `::` to append a line that begins with a
//! literal colon.

use anyhow::Result;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use tracing::debug;

use crate::cli::read_source;
use crate::status::{StatusKind, StatusPrinter};
use mmdgen::renderer::DiagramRenderer;
use mmdgen::{EditorSession, ExampleKind, Generator, OutputFormat};

fn help_text() -> String {
    let examples = format!("[{}]", ExampleKind::variants().join("|"));
    let formats = format!("[{}]", OutputFormat::variants().join("|"));
    format!(
        "Type diagram lines to append them to the buffer. Commands:
  :example {examples:<22} replace the buffer with an example
  :load <path>                   replace the buffer with a file's contents
  :show                          print the buffer
  :clear                         empty the buffer
  :generate {formats:<21} render the buffer
  :save <path>                   copy the last rendered diagram to <path>
  :status                        show the status line
  :help                          show this help
  :quit                          leave"
    )
}

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Append(String),
    Example(ExampleKind),
    Load(PathBuf),
    Show,
    Clear,
    Generate(Option<OutputFormat>),
    Save(PathBuf),
    Status,
    Help,
    Quit,
}

impl FromStr for Action {
    type Err = String;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        if let Some(literal) = line.strip_prefix("::") {
            return Ok(Action::Append(format!(":{}", literal)));
        }
        let Some(command) = line.trim().strip_prefix(':') else {
            return Ok(Action::Append(line.to_string()));
        };

        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };

        match (name, arg) {
            ("example" | "e", "") => Ok(Action::Example(ExampleKind::default())),
            ("example" | "e", kind) => kind.parse().map(Action::Example),
            ("load" | "l", "") => Err("Usage: :load <path>".to_string()),
            ("load" | "l", path) => Ok(Action::Load(PathBuf::from(path))),
            ("show" | "p", _) => Ok(Action::Show),
            ("clear" | "c", _) => Ok(Action::Clear),
            ("generate" | "g", "") => Ok(Action::Generate(None)),
            ("generate" | "g", format) => OutputFormat::from_str(format)
                .map(|f| Action::Generate(Some(f)))
                .map_err(|e| e.to_string()),
            ("save" | "s", "") => Err("Usage: :save <path>".to_string()),
            ("save" | "s", path) => Ok(Action::Save(PathBuf::from(path))),
            ("status", _) => Ok(Action::Status),
            ("help" | "h" | "?", _) => Ok(Action::Help),
            ("quit" | "q" | "exit", _) => Ok(Action::Quit),
            _ => Err(format!("Unknown command ':{}' (try :help)", name)),
        }
    }
}

/// Drive `session` from `input` until `:quit` or end of input
///
/// Only a missing renderer ends the loop with an error; every other failure
/// is reported and editing continues.
pub fn run<R, I, O>(
    generator: &Generator<R>,
    session: &mut EditorSession,
    input: I,
    out: &mut O,
    status: &StatusPrinter,
) -> Result<()>
where
    R: DiagramRenderer,
    I: BufRead,
    O: Write,
{
    writeln!(
        out,
        "mmdgen interactive mode ({}). Type :help for commands.",
        session.format()
    )?;

    for line in input.lines() {
        let line = line?;
        let action = match line.parse::<Action>() {
            Ok(action) => action,
            Err(message) => {
                writeln!(out, "{}", status.paint(StatusKind::Warning, &message))?;
                continue;
            }
        };
        debug!(?action, "Interactive action");

        match action {
            Action::Append(text) => session.push_line(&text),
            Action::Example(kind) => {
                session.insert_example(kind);
                writeln!(out, "{}", status.paint(StatusKind::Info, session.status()))?;
            }
            Action::Load(path) => match read_source(&path) {
                Ok(text) => {
                    session.set_text(text);
                    let message = format!("Loaded {}", path.display());
                    writeln!(out, "{}", status.paint(StatusKind::Info, &message))?;
                }
                Err(e) => writeln!(out, "{}", status.paint(StatusKind::Warning, &e.to_string()))?,
            },
            Action::Show => {
                if session.text().is_empty() {
                    writeln!(out, "(buffer is empty)")?;
                } else {
                    writeln!(out, "{}", session.text())?;
                }
            }
            Action::Clear => {
                session.clear();
                writeln!(out, "{}", status.paint(StatusKind::Info, session.status()))?;
            }
            Action::Generate(format) => {
                if let Some(format) = format {
                    session.set_format(format);
                }
                match session.generate(generator) {
                    Ok(_) => {
                        writeln!(out, "{}", status.paint(StatusKind::Success, session.status()))?
                    }
                    Err(e) if e.is_fatal_for_process() => return Err(e.into()),
                    Err(_) => {
                        writeln!(out, "{}", status.paint(StatusKind::Failure, session.status()))?
                    }
                }
            }
            Action::Save(path) => match session.save_to(&path) {
                Ok(()) => writeln!(out, "{}", status.paint(StatusKind::Success, session.status()))?,
                Err(e) => {
                    let message = match e {
                        mmdgen::GenerateError::NoArtifact => session.status().to_string(),
                        other => format!("Failed to save diagram: {}", other),
                    };
                    writeln!(out, "{}", status.paint(StatusKind::Warning, &message))?
                }
            },
            Action::Status => {
                writeln!(out, "{}", status.paint(StatusKind::Info, session.status()))?;
                if let Some(artifact) = session.artifact() {
                    writeln!(out, "Current diagram: {}", artifact.display())?;
                }
            }
            Action::Help => writeln!(out, "{}", help_text())?,
            Action::Quit => break,
        }
    }

    out.flush()?;
    Ok(())
}
