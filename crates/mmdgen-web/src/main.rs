use clap::Parser;
use mmdgen::core::logging::init_logging;
use mmdgen::{Generator, GeneratorConfig};
use mmdgen_web::{build_router, config::ServerArgs, AppState, ArtifactStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServerArgs::parse();

    // Environment variables take precedence over the logging flags
    let log_level = std::env::var("MMDGEN_LOG_LEVEL")
        .ok()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| args.log_level.as_str().to_string());
    let log_format = std::env::var("MMDGEN_LOG_FORMAT")
        .ok()
        .unwrap_or_else(|| args.log_format.clone());
    if let Err(e) = init_logging(Some(&log_level), Some(&log_format)) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    let config = args.generator_config(GeneratorConfig::from_env());
    let generator = Generator::with_config(config)?;
    tracing::info!(renderer = generator.renderer().program(), "Renderer found");

    let store = ArtifactStore::new(args.artifact_capacity);
    let app = build_router(AppState::new(generator, store));

    let addr = args.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("mmdgen-web listening on http://{}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  - GET  /              (editor)");
    tracing::info!("  - GET  /example?type= (editor with example)");
    tracing::info!("  - POST /generate");
    tracing::info!("  - GET  /artifacts/:id[/download]");
    tracing::info!("  - GET  /health");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shut down, rendered artifacts removed");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
