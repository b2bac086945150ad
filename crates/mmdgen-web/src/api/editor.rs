use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use mmdgen::renderer::DiagramRenderer;
use mmdgen::{ExampleKind, OutputFormat};
use serde::Deserialize;

use crate::error::Result;
use crate::page::{render_page, PageView, STATUS_READY};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExampleQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    #[serde(default)]
    pub mermaid_text: String,
    pub format: Option<String>,
}

fn page(status: StatusCode, view: &PageView<'_>) -> Response {
    (status, Html(render_page(view))).into_response()
}

/// Empty editor
pub async fn index() -> Html<String> {
    Html(render_page(&PageView::new("", STATUS_READY)))
}

/// Editor pre-filled with a bundled example; anything but `sequence` gets the flowchart
pub async fn example(Query(query): Query<ExampleQuery>) -> Html<String> {
    let kind = match query.kind.as_deref() {
        None => ExampleKind::Sequence,
        Some(name) => name.parse().unwrap_or(ExampleKind::Flowchart),
    };
    Html(render_page(&PageView::new(kind.source(), "Example inserted")))
}

/// Render the submitted text and show the result
pub async fn generate<R: DiagramRenderer + 'static>(
    State(state): State<AppState<R>>,
    Form(form): Form<GenerateForm>,
) -> Result<Response> {
    let format = match form.format.as_deref().map(str::trim) {
        None | Some("") => OutputFormat::default(),
        Some(name) => match OutputFormat::from_str(name) {
            Ok(format) => format,
            Err(e) => {
                let status = format!("Error: {}", e);
                return Ok(page(
                    StatusCode::BAD_REQUEST,
                    &PageView::new(&form.mermaid_text, &status),
                ));
            }
        },
    };

    if form.mermaid_text.trim().is_empty() {
        return Ok(page(
            StatusCode::BAD_REQUEST,
            &PageView::new("", "Error: please enter Mermaid syntax").with_format(format),
        ));
    }

    tracing::info!(%format, bytes = form.mermaid_text.len(), "Generate request");

    // The store takes the artifact inside the task, so it stays owned even
    // when the client goes away before the render finishes.
    let generator = Arc::clone(&state.generator);
    let store = Arc::clone(&state.store);
    let text = form.mermaid_text.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        generator
            .generate(&text, None, format)
            .map(|path| store.insert(path, format))
    })
    .await?;

    match outcome {
        Ok(id) => {
            tracing::info!(%id, "Diagram generated");
            let status = format!("Diagram generated ({})", format);
            Ok(page(
                StatusCode::OK,
                &PageView::new(&form.mermaid_text, &status)
                    .with_format(format)
                    .with_artifact(id),
            ))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Diagram generation failed");
            let status = format!("Failed to generate diagram: {}", e);
            Ok(page(
                StatusCode::UNPROCESSABLE_ENTITY,
                &PageView::new(&form.mermaid_text, &status).with_format(format),
            ))
        }
    }
}
