//! Temporary artifact store
//!
//! Allocates the files used to talk to the external renderer: the staged
//! `.mmd` input and, when the caller gave no destination, a placeholder for
//! the output. Both are created atomically with unique names, so concurrent
//! conversions never share a path.
//!
//! Deletion is tied to ownership. A [`StagedInput`] removes its file when it
//! is reclaimed or dropped, and a synthesized [`OutputSlot`] removes its file
//! unless it is [persisted](OutputSlot::persist).

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile, TempPath};
use tracing::{debug, trace, warn};

use crate::core::{GenerateError, OutputFormat, Result};

const FILE_PREFIX: &str = "mmdgen-";

/// Extension the renderer recognizes as diagram source
pub const SOURCE_EXTENSION: &str = "mmd";

fn builder_for(suffix: &str) -> Builder<'static, '_> {
    let mut builder = Builder::new();
    builder.prefix(FILE_PREFIX).suffix(suffix);
    builder
}

/// Diagram text written to a private temporary file for one render
#[derive(Debug)]
pub struct StagedInput {
    file: NamedTempFile,
}

impl StagedInput {
    /// Stage `source` in `temp_dir` (or the system temporary directory)
    ///
    /// Nothing is left on disk if writing fails.
    pub fn create(source: &str, temp_dir: Option<&Path>) -> Result<Self> {
        let suffix = format!(".{}", SOURCE_EXTENSION);
        let builder = builder_for(&suffix);
        let mut file = match temp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(GenerateError::staging)?;

        file.write_all(source.as_bytes())
            .and_then(|_| file.flush())
            .map_err(GenerateError::staging)?;

        debug!(path = %file.path().display(), bytes = source.len(), "Staged diagram source");
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Delete the staged file now, logging rather than failing on errors
    pub fn reclaim(self) {
        let path = self.path().to_path_buf();
        match self.file.close() {
            Ok(()) => trace!(path = %path.display(), "Reclaimed staged input"),
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to delete staged input"),
        }
    }
}

/// Where the renderer is told to write its artifact
#[derive(Debug)]
pub enum OutputSlot {
    /// Caller-chosen path, used verbatim
    Explicit(PathBuf),
    /// Uniquely named temporary file, deleted unless persisted
    Synthesized(TempPath),
}

impl OutputSlot {
    pub fn explicit(path: impl Into<PathBuf>) -> Self {
        OutputSlot::Explicit(path.into())
    }

    /// Atomically create an empty placeholder with the format's extension
    pub fn synthesize(format: OutputFormat, temp_dir: Option<&Path>) -> Result<Self> {
        let suffix = format!(".{}", format.extension());
        let builder = builder_for(&suffix);
        let file = match temp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(GenerateError::staging)?;

        let path = file.into_temp_path();
        debug!(path = %path.display(), "Synthesized output path");
        Ok(OutputSlot::Synthesized(path))
    }

    pub fn path(&self) -> &Path {
        match self {
            OutputSlot::Explicit(path) => path.as_path(),
            OutputSlot::Synthesized(path) => &**path,
        }
    }

    pub fn is_synthesized(&self) -> bool {
        matches!(self, OutputSlot::Synthesized(_))
    }

    /// Hand the artifact over to the caller
    pub fn persist(self) -> Result<PathBuf> {
        match self {
            OutputSlot::Explicit(path) => Ok(path),
            OutputSlot::Synthesized(path) => path.keep().map_err(|e| GenerateError::staging(e.error)),
        }
    }

    /// Remove whatever the renderer may have written
    pub fn discard(self) {
        let result = match self {
            OutputSlot::Explicit(path) => remove_if_exists(&path).map(|_| path),
            OutputSlot::Synthesized(path) => {
                let owned = path.to_path_buf();
                path.close().map(|_| owned)
            }
        };
        match result {
            Ok(path) => trace!(path = %path.display(), "Discarded output"),
            Err(e) => warn!(error = %e, "Failed to discard output"),
        }
    }
}

/// True when `path` is a regular, non-empty file
pub fn artifact_is_ready(path: &Path) -> bool {
    fs::metadata(path)
        .map(|meta| meta.is_file() && meta.len() > 0)
        .unwrap_or(false)
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
