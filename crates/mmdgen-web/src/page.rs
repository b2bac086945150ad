//! HTML editor page

use mmdgen::OutputFormat;
use uuid::Uuid;

/// Status shown on a fresh page
pub const STATUS_READY: &str = "Ready";

/// Everything the editor page displays
#[derive(Debug, Clone)]
pub struct PageView<'a> {
    pub text: &'a str,
    pub status: &'a str,
    pub format: OutputFormat,
    pub artifact: Option<Uuid>,
}

impl<'a> PageView<'a> {
    pub fn new(text: &'a str, status: &'a str) -> Self {
        Self {
            text,
            status,
            format: OutputFormat::default(),
            artifact: None,
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_artifact(mut self, id: Uuid) -> Self {
        self.artifact = Some(id);
        self
    }
}

/// Escape text for use in HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const STYLE: &str = r#"
        body { font-family: Arial, sans-serif; margin: 0; padding: 20px; display: flex; flex-direction: column; height: 100vh; box-sizing: border-box; }
        .container { display: flex; flex: 1; gap: 20px; min-height: 0; }
        .editor-section { flex: 1; display: flex; flex-direction: column; }
        .editor-section form { flex: 1; display: flex; flex-direction: column; }
        .preview-section { flex: 1; border: 1px solid #ccc; padding: 10px; background-color: white; display: flex; flex-direction: column; }
        .preview { flex: 1; display: flex; justify-content: center; align-items: center; }
        textarea { flex: 1; padding: 10px; font-family: monospace; font-size: 14px; resize: none; }
        .button-group { margin-top: 10px; display: flex; gap: 10px; align-items: center; }
        button { padding: 8px 15px; background-color: #4CAF50; color: white; border: none; cursor: pointer; }
        button:hover { background-color: #45a049; }
        .preview-image { max-width: 100%; max-height: 100%; margin: auto; }
        .preview-document { width: 100%; height: 100%; }
        .status-bar { margin-top: 10px; padding: 5px; background-color: #f1f1f1; border: 1px solid #ddd; }
        h2 { margin-top: 0; }
"#;

fn format_options(selected: OutputFormat) -> String {
    OutputFormat::all()
        .iter()
        .map(|format| {
            let marker = if *format == selected { " selected" } else { "" };
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                format.as_str(),
                marker,
                format.as_str().to_uppercase()
            )
        })
        .collect()
}

fn preview(view: &PageView<'_>) -> String {
    let Some(id) = view.artifact else {
        return "<p>The diagram appears here once generated</p>".to_string();
    };
    match view.format {
        OutputFormat::Pdf => format!(
            r#"<object data="/artifacts/{id}" type="application/pdf" class="preview-document"><a href="/artifacts/{id}">Open PDF</a></object>"#
        ),
        _ => format!(r#"<img src="/artifacts/{id}" class="preview-image" alt="Generated diagram">"#),
    }
}

/// Render the editor page
pub fn render_page(view: &PageView<'_>) -> String {
    let download = match view.artifact {
        Some(id) => format!(
            r#"<button type="button" onclick="location.href='/artifacts/{id}/download'">Save diagram</button>"#
        ),
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Mermaid Diagram Generator</title>
    <style>{style}</style>
</head>
<body>
    <h1>Mermaid Diagram Generator</h1>
    <div class="container">
        <div class="editor-section">
            <h2>Mermaid syntax</h2>
            <form action="/generate" method="post">
                <textarea name="mermaid_text" rows="20">{text}</textarea>
                <div class="button-group">
                    <select name="format">{options}</select>
                    <button type="submit">Generate diagram</button>
                    <button type="button" onclick="location.href='/example?type=sequence'">Sequence example</button>
                    <button type="button" onclick="location.href='/example?type=flowchart'">Flowchart example</button>
                    <button type="button" onclick="document.querySelector('textarea').value = ''">Clear</button>
                    {download}
                </div>
            </form>
        </div>
        <div class="preview-section">
            <h2>Preview</h2>
            <div class="preview">{preview}</div>
        </div>
    </div>
    <div class="status-bar">{status}</div>
</body>
</html>
"#,
        style = STYLE,
        text = escape_html(view.text),
        options = format_options(view.format),
        download = download,
        preview = preview(view),
        status = escape_html(view.status),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"A --> B & <script>"x"</script>"#),
            "A --&gt; B &amp; &lt;script&gt;&quot;x&quot;&lt;/script&gt;"
        );
        assert_eq!(escape_html("it's"), "it&#39;s");
    }

    #[test]
    fn test_empty_page() {
        let html = render_page(&PageView::new("", STATUS_READY));
        assert!(html.contains(r#"<textarea name="mermaid_text" rows="20"></textarea>"#));
        assert!(html.contains(r#"<div class="status-bar">Ready</div>"#));
        assert!(!html.contains("/artifacts/"));
        assert!(html.contains(r#"<option value="png" selected>"#));
    }

    #[test]
    fn test_page_with_artifact() {
        let id = Uuid::new_v4();
        let view = PageView::new("graph LR\n    A --> B", "Diagram generated")
            .with_format(OutputFormat::Svg)
            .with_artifact(id);
        let html = render_page(&view);

        assert!(html.contains("A --&gt; B"));
        assert!(html.contains(&format!(r#"<img src="/artifacts/{id}""#)));
        assert!(html.contains(&format!("/artifacts/{id}/download")));
        assert!(html.contains(r#"<option value="svg" selected>"#));
    }

    #[test]
    fn test_pdf_preview_uses_object() {
        let id = Uuid::new_v4();
        let view = PageView::new("graph LR", "ok")
            .with_format(OutputFormat::Pdf)
            .with_artifact(id);
        assert!(render_page(&view).contains(r#"type="application/pdf""#));
    }
}
