//! mmdgen-web - Browser front end for mmdgen
//!
//! An axum application serving a single editor page. Submitted diagrams are
//! rendered on the blocking thread pool and registered in a bounded
//! [`store::ArtifactStore`]; the page then references the artifact by id.

pub mod api;
pub mod config;
pub mod error;
pub mod page;
pub mod state;
pub mod store;

use axum::{
    routing::{get, post},
    Router,
};
use mmdgen::renderer::DiagramRenderer;
use tower_http::trace::TraceLayer;

pub use state::AppState;
pub use store::ArtifactStore;

/// Build the application router
pub fn build_router<R: DiagramRenderer + 'static>(state: AppState<R>) -> Router {
    Router::new()
        .route("/", get(api::index))
        .route("/example", get(api::example))
        .route("/generate", post(api::generate::<R>))
        .route("/artifacts/:id", get(api::show_artifact::<R>))
        .route("/artifacts/:id/download", get(api::download_artifact::<R>))
        .route("/health", get(api::health_check::<R>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
