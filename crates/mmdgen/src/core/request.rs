//! Conversion request description

use std::path::{Path, PathBuf};

use super::format::OutputFormat;

/// A single text-to-artifact conversion
///
/// # Example
/// ```
/// use mmdgen::{ConversionRequest, OutputFormat};
///
/// let request = ConversionRequest::new("graph LR\nA-->B")
///     .with_format(OutputFormat::Svg)
///     .with_destination("flow.svg");
/// assert_eq!(request.format(), OutputFormat::Svg);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    source: String,
    destination: Option<PathBuf>,
    format: OutputFormat,
}

impl ConversionRequest {
    /// Create a PNG request with a synthesized destination
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: None,
            format: OutputFormat::default(),
        }
    }

    pub fn with_destination(mut self, destination: impl Into<PathBuf>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn destination(&self) -> Option<&Path> {
        self.destination.as_deref()
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

/// Derive an artifact path from an input file by swapping its extension
///
/// ```
/// use mmdgen::{derive_output_path, OutputFormat};
/// use std::path::Path;
///
/// let out = derive_output_path(Path::new("docs/diagram.mmd"), OutputFormat::Png);
/// assert_eq!(out, Path::new("docs/diagram.png"));
/// ```
pub fn derive_output_path(input: &Path, format: OutputFormat) -> PathBuf {
    input.with_extension(format.extension())
}

/// Whether `a` and `b` name the same existing file
///
/// Paths that do not exist yet never match.
pub fn is_same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_request_defaults() {
        let request = ConversionRequest::new("graph TD; A-->B");
        assert_eq!(request.source(), "graph TD; A-->B");
        assert_eq!(request.destination(), None);
        assert_eq!(request.format(), OutputFormat::Png);
    }

    #[test]
    fn test_derive_output_path_swaps_extension() {
        assert_eq!(
            derive_output_path(Path::new("diagram.mmd"), OutputFormat::Png),
            PathBuf::from("diagram.png")
        );
        assert_eq!(
            derive_output_path(Path::new("a/b/flow.mermaid"), OutputFormat::Pdf),
            PathBuf::from("a/b/flow.pdf")
        );
    }

    #[test]
    fn test_derive_output_path_without_extension() {
        assert_eq!(
            derive_output_path(Path::new("diagram"), OutputFormat::Svg),
            PathBuf::from("diagram.svg")
        );
    }

    #[test]
    fn test_is_same_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("diagram.svg");
        fs::write(&file, "graph LR").unwrap();

        assert!(is_same_file(&file, &file));
        assert!(is_same_file(&file, &dir.path().join(".").join("diagram.svg")));
        assert!(!is_same_file(&file, &dir.path().join("other.svg")));
        assert!(!is_same_file(&dir.path().join("a"), &dir.path().join("a")));
    }
}
