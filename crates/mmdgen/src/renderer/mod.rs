//! Renderer capability and its implementations
//!
//! The conversion engine never launches processes itself; it talks to a
//! [`DiagramRenderer`]. [`MmdcRenderer`] is the production implementation,
//! and tests substitute their own.

mod mmdc;
mod probe;

pub use mmdc::*;
pub use probe::{probe, query_version};

use std::path::Path;
use std::sync::Arc;

use crate::core::{CancellationToken, OutputFormat, Result};

/// Something that turns a staged diagram file into an artifact
///
/// # Example
/// ```
/// use mmdgen::renderer::{DiagramRenderer, MmdcRenderer};
///
/// let renderer = MmdcRenderer::new("mmdc");
/// assert_eq!(renderer.name(), "mmdc");
/// ```
pub trait DiagramRenderer: Send + Sync {
    /// Render `input` to `output` in `format`
    ///
    /// Implementations must write `output` themselves and return only after
    /// rendering has finished, failed, timed out or been cancelled through
    /// `cancel`.
    fn render(
        &self,
        input: &Path,
        output: &Path,
        format: OutputFormat,
        cancel: &CancellationToken,
    ) -> Result<()>;

    /// Whether the renderer can be used at all
    fn probe(&self) -> bool;

    /// Name used in logs and error messages
    fn name(&self) -> &str;
}

impl<R: DiagramRenderer + ?Sized> DiagramRenderer for Box<R> {
    fn render(
        &self,
        input: &Path,
        output: &Path,
        format: OutputFormat,
        cancel: &CancellationToken,
    ) -> Result<()> {
        (**self).render(input, output, format, cancel)
    }

    fn probe(&self) -> bool {
        (**self).probe()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<R: DiagramRenderer + ?Sized> DiagramRenderer for Arc<R> {
    fn render(
        &self,
        input: &Path,
        output: &Path,
        format: OutputFormat,
        cancel: &CancellationToken,
    ) -> Result<()> {
        (**self).render(input, output, format, cancel)
    }

    fn probe(&self) -> bool {
        (**self).probe()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
