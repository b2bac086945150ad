//! Bounded registry of rendered artifacts
//!
//! Every successful render is registered under a random id. The store keeps
//! the most recently used entries and deletes the files of entries it evicts,
//! so a long-running server does not accumulate temporary files.

use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use lru::LruCache;
use mmdgen::OutputFormat;
use parking_lot::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

/// Number of artifacts kept when no capacity is configured
pub const DEFAULT_CAPACITY: usize = 64;

/// A rendered file owned by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    path: PathBuf,
    format: OutputFormat,
}

impl Artifact {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Name offered to the browser when downloading
    pub fn download_name(&self) -> String {
        format!("diagram.{}", self.format.extension())
    }
}

#[derive(Debug)]
pub struct ArtifactStore {
    entries: Mutex<LruCache<Uuid, Artifact>>,
}

impl Default for ArtifactStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ArtifactStore {
    /// Create a store holding at most `capacity` artifacts (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Take ownership of the file at `path` and return its id
    pub fn insert(&self, path: PathBuf, format: OutputFormat) -> Uuid {
        let id = Uuid::new_v4();
        let evicted = self.entries.lock().push(id, Artifact { path, format });

        if let Some((old_id, old)) = evicted {
            debug!(id = %old_id, path = %old.path.display(), "Evicting artifact");
            delete_file(&old.path);
        }
        id
    }

    /// Look up an artifact, marking it as recently used
    pub fn get(&self, id: &Uuid) -> Option<Artifact> {
        self.entries.lock().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.entries.lock().cap().get()
    }
}

impl Drop for ArtifactStore {
    fn drop(&mut self) {
        let entries = self.entries.get_mut();
        debug!(count = entries.len(), "Deleting remaining artifacts");
        for (_, artifact) in entries.iter() {
            delete_file(&artifact.path);
        }
        entries.clear();
    }
}

fn delete_file(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to delete artifact"),
    }
}
