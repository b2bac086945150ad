//! Conversion engine
//!
//! The engine runs one conversion per call:
//! stage input → resolve destination → render → validate → clean up.
//!
//! Every exit path reclaims the staged input, and every failure path removes
//! whatever the renderer may have written to the destination.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, span, warn, Level};

use crate::core::{
    derive_output_path, is_same_file, CancellationToken, ConversionRequest, GenerateError,
    GeneratorConfig, OutputFormat, Result,
};
use crate::renderer::{DiagramRenderer, MmdcRenderer};
use crate::staging::{artifact_is_ready, OutputSlot, StagedInput};

/// Converts diagram text into artifacts through a [`DiagramRenderer`]
///
/// Construct one per process and call it once per user action. The renderer
/// is probed once, at construction.
///
/// # Example
/// ```no_run
/// use mmdgen::{Generator, OutputFormat};
///
/// let generator = Generator::new()?;
/// let png = generator.generate("graph LR\nA-->B", None, OutputFormat::Png)?;
/// println!("{}", png.display());
/// # Ok::<(), mmdgen::GenerateError>(())
/// ```
#[derive(Debug)]
pub struct Generator<R: DiagramRenderer = MmdcRenderer> {
    renderer: R,
    config: GeneratorConfig,
}

impl Generator<MmdcRenderer> {
    /// Create a generator for `mmdc`, configured from the environment
    pub fn new() -> Result<Self> {
        Self::with_config(GeneratorConfig::from_env())
    }

    /// Create a generator for the renderer named in `config`
    pub fn with_config(config: GeneratorConfig) -> Result<Self> {
        let renderer = MmdcRenderer::from_config(&config);
        Self::with_renderer(renderer, config)
    }
}

impl<R: DiagramRenderer> Generator<R> {
    /// Create a generator around `renderer`, failing fast if it is unavailable
    pub fn with_renderer(renderer: R, config: GeneratorConfig) -> Result<Self> {
        if !renderer.probe() {
            return Err(GenerateError::renderer_not_found(renderer.name()));
        }
        Ok(Self::unchecked(renderer, config))
    }

    /// Create a generator without probing the renderer
    ///
    /// A missing renderer then surfaces from [`Generator::generate`] as
    /// [`GenerateError::RenderInvocation`].
    pub fn unchecked(renderer: R, config: GeneratorConfig) -> Self {
        Self { renderer, config }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Render `source` to `destination`, or to a fresh temporary file
    ///
    /// Returns the artifact path. With no destination the caller owns the
    /// temporary file and is responsible for deleting it.
    pub fn generate(
        &self,
        source: &str,
        destination: Option<&Path>,
        format: OutputFormat,
    ) -> Result<PathBuf> {
        self.generate_with_cancel(source, destination, format, &CancellationToken::new())
    }

    /// Same as [`Generator::generate`], taking its inputs from a request
    pub fn generate_request(&self, request: &ConversionRequest) -> Result<PathBuf> {
        self.generate(request.source(), request.destination(), request.format())
    }

    /// Same as [`Generator::generate`], abortable through `cancel`
    pub fn generate_with_cancel(
        &self,
        source: &str,
        destination: Option<&Path>,
        format: OutputFormat,
        cancel: &CancellationToken,
    ) -> Result<PathBuf> {
        let generate_span = span!(
            Level::INFO,
            "generate",
            %format,
            source_len = source.len(),
            renderer = self.renderer.name()
        );
        let _enter = generate_span.enter();

        let temp_dir = self.config.temp_dir();
        let staged = StagedInput::create(source, temp_dir)?;

        let slot = match destination {
            Some(path) => OutputSlot::explicit(path),
            None => OutputSlot::synthesize(format, temp_dir)?,
        };
        debug!(
            output = %slot.path().display(),
            synthesized = slot.is_synthesized(),
            "Resolved destination"
        );

        let outcome = self
            .renderer
            .render(staged.path(), slot.path(), format, cancel);
        staged.reclaim();

        match outcome {
            Ok(()) if artifact_is_ready(slot.path()) => {
                let artifact = slot.persist()?;
                info!(artifact = %artifact.display(), "Diagram generated");
                Ok(artifact)
            }
            Ok(()) => {
                let path = slot.path().to_path_buf();
                warn!(output = %path.display(), "Renderer produced no output");
                slot.discard();
                Err(GenerateError::EmptyArtifact { path })
            }
            Err(e) => {
                warn!(error = %e, "Diagram generation failed");
                slot.discard();
                Err(e)
            }
        }
    }

    /// Render the contents of `input`
    ///
    /// Without a destination the artifact lands next to the input, with the
    /// extension replaced by the format's (`diagram.mmd` → `diagram.png`).
    pub fn generate_from_file(
        &self,
        input: &Path,
        destination: Option<&Path>,
        format: OutputFormat,
    ) -> Result<PathBuf> {
        let source = fs::read_to_string(input).map_err(|source| GenerateError::InputRead {
            path: input.to_path_buf(),
            source,
        })?;

        let derived;
        let destination = match destination {
            Some(path) => path,
            None => {
                derived = derive_output_path(input, format);
                derived.as_path()
            }
        };

        if is_same_file(input, destination) {
            return Err(GenerateError::SameFile {
                path: destination.to_path_buf(),
            });
        }

        self.generate(&source, Some(destination), format)
    }
}
