use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use mmdgen::renderer::DiagramRenderer;
use uuid::Uuid;

use crate::error::{Result, WebError};
use crate::state::AppState;
use crate::store::Artifact;

fn lookup<R: DiagramRenderer>(state: &AppState<R>, id: &str) -> Result<Artifact> {
    let id = Uuid::parse_str(id).map_err(|_| WebError::ArtifactNotFound)?;
    state.store.get(&id).ok_or(WebError::ArtifactNotFound)
}

async fn read(artifact: &Artifact) -> Result<Vec<u8>> {
    tokio::fs::read(artifact.path()).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => WebError::ArtifactNotFound,
        _ => WebError::Io(e),
    })
}

/// Serve an artifact inline, for the preview pane
pub async fn show_artifact<R: DiagramRenderer + 'static>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let artifact = lookup(&state, &id)?;
    let bytes = read(&artifact).await?;

    Ok((
        [
            (header::CONTENT_TYPE, artifact.format().mime_type()),
            (header::CACHE_CONTROL, "no-store"),
        ],
        bytes,
    ))
}

/// Serve an artifact as a file download
pub async fn download_artifact<R: DiagramRenderer + 'static>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let artifact = lookup(&state, &id)?;
    let bytes = read(&artifact).await?;
    tracing::info!(%id, bytes = bytes.len(), "Artifact downloaded");

    Ok((
        [
            (header::CONTENT_TYPE, artifact.format().mime_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", artifact.download_name()),
            ),
        ],
        bytes,
    ))
}
