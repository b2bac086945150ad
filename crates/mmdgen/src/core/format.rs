//! Output format definitions
//!
//! The renderer understands exactly three output formats. Anything else is
//! rejected here, before a subprocess is ever considered.

use std::fmt;
use std::str::FromStr;

use super::error::GenerateError;

/// Artifact format produced by the external renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum OutputFormat {
    /// Raster image
    #[default]
    Png,
    /// Vector image
    Svg,
    /// Paginated document
    Pdf,
}

impl OutputFormat {
    /// Get all supported formats
    pub fn all() -> &'static [OutputFormat] {
        &[OutputFormat::Png, OutputFormat::Svg, OutputFormat::Pdf]
    }

    /// Get all valid format names
    pub fn variants() -> &'static [&'static str] {
        &["png", "svg", "pdf"]
    }

    /// Name passed to the renderer's `-f` flag
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
            OutputFormat::Pdf => "pdf",
        }
    }

    /// File extension (without the leading dot)
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    /// MIME type used when serving the artifact
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Svg => "image/svg+xml",
            OutputFormat::Pdf => "application/pdf",
        }
    }

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            OutputFormat::Png => "PNG raster image",
            OutputFormat::Svg => "SVG vector image",
            OutputFormat::Pdf => "PDF document",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "svg" => Ok(OutputFormat::Svg),
            "pdf" => Ok(OutputFormat::Pdf),
            _ => Err(GenerateError::invalid_format(s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
