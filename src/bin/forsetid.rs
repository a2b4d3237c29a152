//! forsetid — Forseti daemon.
//!
//! Serves the [`EvaluationPipeline`](forseti::EvaluationPipeline) over
//! HTTP, letting ingestion tooling share one pipeline and one verdict
//! cache per process.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use forseti::judge::{GroqJudge, RetryingJudge};
use forseti::server::config::Config;
use forseti::server::{AppState, create_router};
use forseti::{EvaluationCache, EvaluationPipeline};

/// Forseti daemon — chatbot audit service.
#[derive(Parser)]
#[command(name = "forsetid")]
#[command(version)]
#[command(about = "Forseti chatbot audit daemon")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Override the bind address from the config file.
    #[arg(short, long)]
    address: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::load(args.config.as_deref())?;
    let api_key = config.api_key()?;

    let addr: SocketAddr = args
        .address
        .as_deref()
        .unwrap_or(&config.server.address)
        .parse()
        .map_err(|e| forseti::ForsetiError::Configuration(format!("Invalid address: {e}")))?;

    let remote = match config.judge.base_url.as_deref() {
        Some(base_url) => GroqJudge::with_base_url(api_key, base_url),
        None => GroqJudge::new(api_key),
    };
    let judge = RetryingJudge::new(Arc::new(remote), config.retry_config());
    let cache = Arc::new(EvaluationCache::with_config(config.cache_config()));
    let pipeline = Arc::new(EvaluationPipeline::new(
        Arc::new(judge),
        cache,
        config.audit_config(),
    ));

    info!(
        version = env!("CARGO_PKG_VERSION"),
        %addr,
        tier1 = %config.judge.tier1_model,
        tier3 = %config.judge.tier3_model,
        "forsetid starting"
    );

    let app = create_router(AppState::new(pipeline, config.server.environment.as_str()));

    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("forsetid shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("received SIGTERM, shutting down");
        }
    }
}
