use std::sync::Arc;

use mmdgen::renderer::{DiagramRenderer, MmdcRenderer};
use mmdgen::Generator;

use crate::store::ArtifactStore;

/// Shared application state accessible to all handlers
pub struct AppState<R: DiagramRenderer = MmdcRenderer> {
    /// Probed once at startup, shared by every request
    pub generator: Arc<Generator<R>>,

    /// Rendered artifacts, keyed by the id handed to the browser
    pub store: Arc<ArtifactStore>,
}

impl<R: DiagramRenderer> AppState<R> {
    pub fn new(generator: Generator<R>, store: ArtifactStore) -> Self {
        Self {
            generator: Arc::new(generator),
            store: Arc::new(store),
        }
    }
}

impl<R: DiagramRenderer> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            generator: Arc::clone(&self.generator),
            store: Arc::clone(&self.store),
        }
    }
}
