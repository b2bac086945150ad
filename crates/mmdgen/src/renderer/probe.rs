//! Renderer availability probe
//!
//! Runs the renderer's version query once, with both output streams
//! captured, to find out whether the executable can be launched at all.

use std::io;
use std::process::{Command, Stdio};

use tracing::{debug, warn};

/// Launch `program --version` once
///
/// `Err` means the program could not be launched at all; `Ok(None)` means it
/// ran but printed no version line.
pub fn query_version(program: &str) -> io::Result<Option<String>> {
    let output = Command::new(program)
        .arg("--version")
        .stdin(Stdio::null())
        .output()?;
    debug!(program, status = ?output.status.code(), "Renderer version query");
    Ok(first_line(&output.stdout))
}

/// Check that `program` can be launched
///
/// Any exit status counts as available; only a launch failure (most often
/// "not found") makes the renderer unavailable.
pub fn probe(program: &str) -> bool {
    match query_version(program) {
        Ok(version) => {
            debug!(program, ?version, "Renderer probe succeeded");
            true
        }
        Err(e) => {
            warn!(program, error = %e, "Renderer probe failed");
            false
        }
    }
}

fn first_line(bytes: &[u8]) -> Option<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}
