//! Core error types for diagram generation
//!
//! This module defines the error taxonomy shared by the conversion engine,
//! the renderer adapters and the front ends.

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

/// Installation hint appended to [`GenerateError::RendererNotFound`]
pub const INSTALL_GUIDANCE: &str = "Install it with the following steps:\n\
     1. Make sure Node.js is installed\n\
     2. Run: npm install -g @mermaid-js/mermaid-cli";

/// Convenience result alias for generation operations
pub type Result<T> = std::result::Result<T, GenerateError>;

/// Errors produced while turning diagram text into an artifact
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Renderer not found: '{program}' is not on the PATH.\n{}", INSTALL_GUIDANCE)]
    RendererNotFound { program: String },

    #[error("Staging error: could not prepare temporary file: {source}")]
    StagingIo {
        #[source]
        source: std::io::Error,
    },

    #[error("Render error: '{program}' {}{}", describe_status(.status), describe_stderr(.stderr))]
    RenderInvocation {
        program: String,
        status: Option<ExitStatus>,
        stderr: String,
    },

    #[error("Invalid format: '{format}' (expected one of png, svg, pdf)")]
    InvalidFormat { format: String },

    #[error("Failed to read input file '{}': {source}", .path.display())]
    InputRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Render error: renderer reported success but '{}' is missing or empty", .path.display())]
    EmptyArtifact { path: PathBuf },

    #[error("Render error: '{program}' did not finish within {}s and was terminated", .after.as_secs_f64())]
    Timeout { program: String, after: Duration },

    #[error("Render cancelled")]
    Cancelled,

    #[error("No diagram has been generated yet")]
    NoArtifact,

    #[error("Diagram source is empty")]
    EmptySource,

    #[error("Refusing to overwrite '{}': it is also the file being read", .path.display())]
    SameFile { path: PathBuf },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

fn describe_status(status: &Option<ExitStatus>) -> String {
    match status {
        Some(status) => match status.code() {
            Some(code) => format!("exited with status {}", code),
            None => "was terminated by a signal".to_string(),
        },
        None => "could not be launched".to_string(),
    }
}

fn describe_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {}", trimmed)
    }
}

impl GenerateError {
    /// Create a renderer-not-found error
    pub fn renderer_not_found(program: impl Into<String>) -> Self {
        Self::RendererNotFound {
            program: program.into(),
        }
    }

    /// Create a staging error
    pub fn staging(source: std::io::Error) -> Self {
        Self::StagingIo { source }
    }

    /// Create an invocation error for a renderer that ran and failed
    pub fn render_failed(
        program: impl Into<String>,
        status: ExitStatus,
        stderr: impl Into<String>,
    ) -> Self {
        Self::RenderInvocation {
            program: program.into(),
            status: Some(status),
            stderr: stderr.into(),
        }
    }

    /// Create an invocation error for a renderer that could not be started
    pub fn launch_failed(program: impl Into<String>, source: &std::io::Error) -> Self {
        Self::RenderInvocation {
            program: program.into(),
            status: None,
            stderr: source.to_string(),
        }
    }

    /// Create an invalid format error
    pub fn invalid_format(format: impl Into<String>) -> Self {
        Self::InvalidFormat {
            format: format.into(),
        }
    }

    /// Whether the hosting process cannot do any useful work after this error
    ///
    /// Only a missing renderer qualifies; every other failure is scoped to
    /// the request that raised it.
    pub fn is_fatal_for_process(&self) -> bool {
        matches!(self, Self::RendererNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renderer_not_found_includes_guidance() {
        let error = GenerateError::renderer_not_found("mmdc");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("mmdc"));
        assert!(error_msg.contains("npm install -g @mermaid-js/mermaid-cli"));
        assert!(error.is_fatal_for_process());
    }

    #[test]
    fn test_invalid_format() {
        let error = GenerateError::invalid_format("bmp");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Invalid format"));
        assert!(error_msg.contains("bmp"));
        assert!(!error.is_fatal_for_process());
    }

    #[test]
    fn test_launch_failed() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let error = GenerateError::launch_failed("mmdc", &io_err);
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("could not be launched"));
        assert!(error_msg.contains("no such file"));
    }

    #[test]
    fn test_timeout_message() {
        let error = GenerateError::Timeout {
            program: "mmdc".to_string(),
            after: Duration::from_millis(1500),
        };
        assert!(format!("{}", error).contains("1.5s"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let error: GenerateError = io_err.into();
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("IO error"));
        assert!(error_msg.contains("File not found"));
    }
}
