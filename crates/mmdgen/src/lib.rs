//! mmdgen - Render Mermaid.js diagrams to PNG, SVG and PDF
//!
//! A library that hands Mermaid diagram text to the external `mmdc`
//! renderer (mermaid-cli) and gives back the path of the rendered artifact.
//! It stages the text in a private temporary file, runs the renderer, checks
//! the result and cleans up after itself on every path.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mmdgen::{Generator, OutputFormat};
//!
//! let generator = Generator::new()?;
//! let path = generator.generate("graph LR; A-->B", None, OutputFormat::Svg)?;
//! println!("{}", path.display());
//! # Ok::<(), mmdgen::GenerateError>(())
//! ```
//!
//! # Custom Renderers
//!
//! The engine drives any [`renderer::DiagramRenderer`]. Implement it to wrap
//! a different binary or to stand in for `mmdc` in tests, and pass it to
//! [`Generator::with_renderer`].

pub mod core;
pub mod editor;
pub mod engine;
pub mod renderer;
pub mod staging;

pub use crate::core::*;
pub use editor::{EditorSession, ExampleKind};
pub use engine::Generator;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        CancellationToken, ConversionRequest, GenerateError, GeneratorConfig, OutputFormat,
    };
    pub use crate::editor::{EditorSession, ExampleKind};
    pub use crate::engine::Generator;
    pub use crate::renderer::{DiagramRenderer, MmdcRenderer};
}

/// Render Mermaid text with `mmdc`, configured from the environment
///
/// Probes the renderer first, so a missing `mmdc` yields
/// [`GenerateError::RendererNotFound`].
pub fn generate(
    source: &str,
    destination: Option<&std::path::Path>,
    format: OutputFormat,
) -> Result<std::path::PathBuf> {
    Generator::new()?.generate(source, destination, format)
}

/// Render a Mermaid file with `mmdc`, configured from the environment
///
/// The artifact is written next to `input` unless a destination is given.
pub fn generate_from_file(
    input: &std::path::Path,
    destination: Option<&std::path::Path>,
    format: OutputFormat,
) -> Result<std::path::PathBuf> {
    Generator::new()?.generate_from_file(input, destination, format)
}
