//! Interactive editor session
//!
//! State behind an interactive front end: the text being edited, the most
//! recent artifact and a one-line status message. The front end only draws
//! this state and forwards user actions.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, warn};

use crate::core::{is_same_file, GenerateError, OutputFormat, Result};
use crate::engine::Generator;
use crate::renderer::DiagramRenderer;

/// Status shown before any action
pub const STATUS_READY: &str = "Ready";

const SEQUENCE_EXAMPLE: &str = "sequenceDiagram
    participant User
    participant App as Web App
    participant IdP as OIDC Provider

    User->>App: 1. Request protected resource
    App->>User: 2. Redirect to login page
    User->>IdP: 3. Open login page
    IdP->>User: 4. Show login form
    User->>IdP: 5. Submit credentials
    IdP->>IdP: 6. Verify credentials
    IdP->>User: 7. Issue authorization code (redirect)
    User->>App: 8. Follow callback URL with code
    App->>IdP: 9. Exchange code for ID token
    IdP->>App: 10. Return ID token
    App->>App: 11. Validate token, start session
    App->>User: 12. Serve protected resource";

const FLOWCHART_EXAMPLE: &str = "graph LR
    A[User] --> B[Web App]
    B --> C[OIDC Provider]
    C --> B
    B --> A

    subgraph Authentication
    A -->|1. Request resource| B
    B -->|2. Redirect| A
    A -->|3. Open login page| C
    C -->|4. Show login form| A
    A -->|5. Submit credentials| C
    C -->|7. Issue code| A
    A -->|8. Callback with code| B
    B -->|9. Exchange code| C
    C -->|10. Return ID token| B
    B -->|12. Serve resource| A
    end";

/// Bundled example diagrams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExampleKind {
    #[default]
    Sequence,
    Flowchart,
}

impl ExampleKind {
    pub fn source(&self) -> &'static str {
        match self {
            ExampleKind::Sequence => SEQUENCE_EXAMPLE,
            ExampleKind::Flowchart => FLOWCHART_EXAMPLE,
        }
    }

    pub fn variants() -> &'static [&'static str] {
        &["sequence", "flowchart"]
    }
}

impl FromStr for ExampleKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sequence" => Ok(ExampleKind::Sequence),
            "flowchart" | "graph" => Ok(ExampleKind::Flowchart),
            _ => Err(format!("Unknown example: {}", s)),
        }
    }
}

impl fmt::Display for ExampleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExampleKind::Sequence => write!(f, "sequence"),
            ExampleKind::Flowchart => write!(f, "flowchart"),
        }
    }
}

/// Editable buffer plus the artifact generated from it
///
/// Artifacts are written to fresh temporary files owned by the session. A
/// new successful generation deletes the previous artifact, and so does
/// dropping the session; use [`EditorSession::save_to`] to keep a copy.
#[derive(Debug)]
pub struct EditorSession {
    text: String,
    format: OutputFormat,
    artifact: Option<PathBuf>,
    status: String,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            format: OutputFormat::default(),
            artifact: None,
            status: STATUS_READY.to_string(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Append one line to the buffer
    pub fn push_line(&mut self, line: &str) {
        if !self.text.is_empty() && !self.text.ends_with('\n') {
            self.text.push('\n');
        }
        self.text.push_str(line);
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn set_format(&mut self, format: OutputFormat) {
        self.format = format;
    }

    pub fn artifact(&self) -> Option<&Path> {
        self.artifact.as_deref()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Replace the buffer with a bundled example
    pub fn insert_example(&mut self, kind: ExampleKind) {
        self.text = kind.source().to_string();
        self.status = "Example inserted".to_string();
    }

    /// Empty the buffer; the current artifact is kept
    pub fn clear(&mut self) {
        self.text.clear();
        self.status = STATUS_READY.to_string();
    }

    /// Render the buffer into a new artifact
    ///
    /// A blank buffer only updates the status. On failure the previous
    /// artifact stays current and the error is returned as well as recorded
    /// in the status line.
    pub fn generate<R: DiagramRenderer>(&mut self, generator: &Generator<R>) -> Result<&Path> {
        if self.text.trim().is_empty() {
            self.status = "Please enter Mermaid syntax".to_string();
            return Err(GenerateError::EmptySource);
        }

        match generator.generate(&self.text, None, self.format) {
            Ok(path) => {
                self.status = format!("Diagram generated: {}", path.display());
                self.discard_artifact();
                Ok(self.artifact.insert(path).as_path())
            }
            Err(e) => {
                self.status = format!("Failed to generate diagram: {}", e);
                Err(e)
            }
        }
    }

    /// Copy the current artifact to `destination`
    pub fn save_to(&mut self, destination: &Path) -> Result<()> {
        let artifact = match self.artifact.as_deref() {
            Some(path) if path.exists() => path,
            _ => {
                self.status = "Generate a diagram first".to_string();
                return Err(GenerateError::NoArtifact);
            }
        };

        if is_same_file(artifact, destination) {
            self.status = "Choose a location other than the generated file".to_string();
            return Err(GenerateError::SameFile {
                path: destination.to_path_buf(),
            });
        }

        fs::copy(artifact, destination)?;
        self.status = format!("Diagram saved: {}", destination.display());
        Ok(())
    }

    /// File extension the current artifact carries, for "save as" dialogs
    pub fn artifact_extension(&self) -> Option<&str> {
        self.artifact
            .as_deref()
            .and_then(Path::extension)
            .and_then(|ext| ext.to_str())
    }

    fn discard_artifact(&mut self) {
        if let Some(old) = self.artifact.take() {
            match fs::remove_file(&old) {
                Ok(()) => debug!(path = %old.display(), "Removed superseded artifact"),
                Err(e) => warn!(path = %old.display(), error = %e, "Failed to remove artifact"),
            }
        }
    }
}

impl Drop for EditorSession {
    fn drop(&mut self) {
        self.discard_artifact();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_ready() {
        let session = EditorSession::new();
        assert_eq!(session.text(), "");
        assert_eq!(session.status(), STATUS_READY);
        assert!(session.artifact().is_none());
        assert_eq!(session.format(), OutputFormat::Png);
    }

    #[test]
    fn test_insert_example_and_clear() {
        let mut session = EditorSession::new();
        session.insert_example(ExampleKind::Flowchart);
        assert!(session.text().starts_with("graph LR"));
        assert_eq!(session.status(), "Example inserted");

        session.insert_example(ExampleKind::Sequence);
        assert!(session.text().starts_with("sequenceDiagram"));

        session.clear();
        assert!(session.text().is_empty());
        assert_eq!(session.status(), STATUS_READY);
    }

    #[test]
    fn test_push_line() {
        let mut session = EditorSession::new();
        session.push_line("graph TD");
        session.push_line("    A --> B");
        assert_eq!(session.text(), "graph TD\n    A --> B");
    }

    #[test]
    fn test_save_without_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = EditorSession::new();
        let err = session.save_to(&dir.path().join("out.png")).unwrap_err();
        assert!(matches!(err, GenerateError::NoArtifact));
        assert_eq!(session.status(), "Generate a diagram first");
    }

    #[test]
    fn test_example_kind_parsing() {
        assert_eq!("sequence".parse::<ExampleKind>().unwrap(), ExampleKind::Sequence);
        assert_eq!("Flowchart".parse::<ExampleKind>().unwrap(), ExampleKind::Flowchart);
        assert_eq!("graph".parse::<ExampleKind>().unwrap(), ExampleKind::Flowchart);
        assert!("gantt".parse::<ExampleKind>().is_err());
        assert_eq!(ExampleKind::default(), ExampleKind::Sequence);
    }
}
