//! Public API tests driven by in-process renderers

mod common;

use std::fs;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use common::{EchoRenderer, StallingRenderer};
use mmdgen::prelude::*;
use mmdgen::{derive_output_path, GenerateError};

fn echo_generator(temp_dir: &std::path::Path) -> Generator<EchoRenderer> {
    Generator::with_renderer(
        EchoRenderer::default(),
        GeneratorConfig::new().with_temp_dir(temp_dir),
    )
    .unwrap()
}

#[test]
fn test_request_round_trip_through_engine() {
    let work = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let generator = echo_generator(work.path());

    let request = ConversionRequest::new("graph TD\n    A --> B")
        .with_destination(out.path().join("chart.svg"))
        .with_format(OutputFormat::Svg);
    let artifact = generator.generate_request(&request).unwrap();

    assert_eq!(artifact, out.path().join("chart.svg"));
    assert_eq!(fs::read_to_string(&artifact).unwrap(), "svg:graph TD\n    A --> B");
    assert_eq!(generator.renderer().calls(), 1);
}

#[test]
fn test_each_call_stages_a_distinct_input() {
    let work = tempfile::tempdir().unwrap();
    let generator = echo_generator(work.path());

    let first = generator.generate("graph LR; A-->B", None, OutputFormat::Png).unwrap();
    let second = generator.generate("graph LR; A-->B", None, OutputFormat::Png).unwrap();

    assert_ne!(first, second);
    let staged = generator.renderer().staged_paths();
    assert_eq!(staged.len(), 2);
    assert_ne!(staged[0], staged[1]);
    assert!(staged.iter().all(|p| !p.exists()));
}

#[test]
fn test_concurrent_generations_do_not_collide() {
    let work = tempfile::tempdir().unwrap();
    let generator = Arc::new(echo_generator(work.path()));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let generator = Arc::clone(&generator);
            thread::spawn(move || {
                let source = format!("graph LR\n    N{i} --> M{i}");
                let artifact = generator.generate(&source, None, OutputFormat::Svg).unwrap();
                (source, artifact)
            })
        })
        .collect();

    for handle in handles {
        let (source, artifact) = handle.join().unwrap();
        assert_eq!(fs::read_to_string(&artifact).unwrap(), format!("svg:{source}"));
    }
    assert!(common::staged_files(work.path()).is_empty());
    assert_eq!(common::entries(work.path()).len(), 8);
}

#[test]
fn test_cancelled_render_removes_partial_output() {
    let work = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let generator = Generator::with_renderer(
        StallingRenderer,
        GeneratorConfig::new().with_temp_dir(work.path()),
    )
    .unwrap();

    let token = CancellationToken::new();
    let canceller = {
        let token = token.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            token.cancel();
        })
    };

    let destination = out.path().join("half.png");
    let err = generator
        .generate_with_cancel("graph LR; A-->B", Some(&destination), OutputFormat::Png, &token)
        .unwrap_err();
    canceller.join().unwrap();

    assert!(matches!(err, GenerateError::Cancelled));
    assert!(!destination.exists());
    assert!(common::entries(work.path()).is_empty());
}

#[test]
fn test_generate_from_file_with_explicit_destination() {
    let work = tempfile::tempdir().unwrap();
    let generator = echo_generator(work.path());

    let input = work.path().join("input.txt");
    fs::write(&input, "graph LR; X-->Y").unwrap();
    let destination = work.path().join("custom-name.pdf");

    let artifact = generator
        .generate_from_file(&input, Some(&destination), OutputFormat::Pdf)
        .unwrap();
    assert_eq!(artifact, destination);
    assert_eq!(fs::read_to_string(&artifact).unwrap(), "pdf:graph LR; X-->Y");
}

#[test]
fn test_derived_output_paths() {
    use std::path::Path;

    assert_eq!(
        derive_output_path(Path::new("docs/flow.mmd"), OutputFormat::Png),
        Path::new("docs/flow.png")
    );
    assert_eq!(
        derive_output_path(Path::new("flow"), OutputFormat::Svg),
        Path::new("flow.svg")
    );
}

#[test]
fn test_editor_session_workflow() {
    let work = tempfile::tempdir().unwrap();
    let saved = tempfile::tempdir().unwrap();
    let generator = echo_generator(work.path());
    let mut session = EditorSession::new();

    let err = session.generate(&generator).unwrap_err();
    assert!(matches!(err, GenerateError::EmptySource));
    assert_eq!(session.status(), "Please enter Mermaid syntax");
    assert_eq!(generator.renderer().calls(), 0);

    session.insert_example(ExampleKind::Flowchart);
    session.set_format(OutputFormat::Svg);
    let first = session.generate(&generator).unwrap().to_path_buf();
    assert!(first.exists());
    assert!(session.status().starts_with("Diagram generated:"));
    assert_eq!(session.artifact_extension(), Some("svg"));

    let second = session.generate(&generator).unwrap().to_path_buf();
    assert_ne!(first, second);
    assert!(!first.exists(), "superseded artifact should be removed");

    let copy = saved.path().join("copy.svg");
    session.save_to(&copy).unwrap();
    assert_eq!(fs::read(&copy).unwrap(), fs::read(&second).unwrap());
    assert!(session.status().starts_with("Diagram saved:"));

    drop(session);
    assert!(!second.exists(), "session artifact should be removed on drop");
    assert!(copy.exists());
}

#[test]
fn test_editor_session_keeps_artifact_after_failure() {
    let work = tempfile::tempdir().unwrap();
    let generator = echo_generator(work.path());
    let mut session = EditorSession::new();
    session.set_text("graph LR; A-->B");
    let artifact = session.generate(&generator).unwrap().to_path_buf();

    let failing = Generator::unchecked(
        MmdcRenderer::new("mmdgen-no-such-renderer-on-path"),
        GeneratorConfig::new().with_temp_dir(work.path()),
    );
    let err = session.generate(&failing).unwrap_err();

    assert!(matches!(err, GenerateError::RenderInvocation { .. }));
    assert!(session.status().starts_with("Failed to generate diagram:"));
    assert_eq!(session.artifact(), Some(artifact.as_path()));
    assert!(artifact.exists());
}

#[test]
fn test_editor_session_refuses_to_save_over_its_artifact() {
    let work = tempfile::tempdir().unwrap();
    let generator = echo_generator(work.path());
    let mut session = EditorSession::new();
    session.set_text("graph LR; A-->B");
    let artifact = session.generate(&generator).unwrap().to_path_buf();
    let contents = fs::read(&artifact).unwrap();

    let err = session.save_to(&artifact).unwrap_err();

    assert!(matches!(err, GenerateError::SameFile { .. }));
    assert_eq!(fs::read(&artifact).unwrap(), contents);
    assert!(!session.status().starts_with("Diagram saved"));
}
