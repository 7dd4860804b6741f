//! voxprobe-vd (Voice Detection) - HTTP service
//!
//! Classifies base64 or uploaded speech clips as HUMAN or AI_GENERATED.
//! A one-shot warm-up primes the decoder and analysis path in the background;
//! `/ready` reports its outcome.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use voxprobe_common::config::{load_or_default, ConfigFileResolver};
use voxprobe_common::logging::init_tracing;
use voxprobe_vd::config::{ServiceConfig, TomlConfig, MODULE_NAME};
use voxprobe_vd::services::{spawn_readiness_probe, DetectionPipeline, Readiness};
use voxprobe_vd::{build_router, AppState};

/// Command-line arguments for voxprobe-vd
#[derive(Parser, Debug)]
#[command(name = "voxprobe-vd")]
#[command(about = "AI-generated voice detection service")]
#[command(version)]
struct Args {
    /// Address to listen on (e.g. 0.0.0.0:8000)
    #[arg(short, long, env = "VOXPROBE_BIND")]
    bind: Option<String>,

    /// Path to voxprobe-vd.toml
    #[arg(short, long, env = "VOXPROBE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // TOML is read before tracing exists because it carries the log level
    let resolver = ConfigFileResolver::new(MODULE_NAME);
    let config_path = resolver
        .resolve(args.config.as_deref())
        .context("Failed to locate config file")?;
    let toml: TomlConfig =
        load_or_default(config_path.as_deref()).context("Failed to load config file")?;

    init_tracing(&toml.logging).context("Failed to initialize tracing")?;

    info!(
        "Starting voxprobe Voice Detection (voxprobe-vd) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    match &config_path {
        Some(path) => info!("Loaded configuration from {}", path.display()),
        None => warn!("No config file found; using compiled defaults"),
    }

    let config = ServiceConfig::resolve(args.bind.as_deref(), toml)
        .context("Invalid configuration")?;

    let pipeline = Arc::new(DetectionPipeline::new(
        config.pitch.clone(),
        config.detection.clone(),
    ));

    let readiness = Readiness::new();
    // Handle kept so shutdown can abort an unfinished warm-up
    let probe = spawn_readiness_probe(readiness.clone(), pipeline.clone());

    let state = AppState::new(pipeline, config.api_key.value.as_str())
        .with_options(config.gateway)
        .with_readiness(readiness);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_address))?;

    info!("voxprobe-vd listening on http://{}", config.bind_address);
    info!("Health check: http://{}/health", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    if !probe.is_finished() {
        warn!("Shutting down before warm-up finished");
        probe.abort();
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
