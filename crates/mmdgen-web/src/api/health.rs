use axum::{extract::State, Json};
use mmdgen::renderer::DiagramRenderer;
use serde_json::{json, Value};

use crate::state::AppState;

/// Liveness check reporting the renderer in use and the number of stored artifacts
pub async fn health_check<R: DiagramRenderer + 'static>(
    State(state): State<AppState<R>>,
) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "renderer": state.generator.renderer().name(),
        "artifacts": state.store.len(),
    }))
}
