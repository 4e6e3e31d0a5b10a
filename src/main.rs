//! fakegcs -- local Cloud Storage JSON API bucket emulator.
//!
//! Startup order: load configuration, set up logging and metrics, build the
//! backend and create the configured buckets, then serve. A failure before
//! the listener is bound aborts the process.

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use fakegcs::config::{BackendKind, Config, LoggingConfig};

/// Command-line arguments for the fakegcs server.
#[derive(Parser, Debug)]
#[command(
    name = "fakegcs",
    version,
    about = "Local emulator for the Cloud Storage JSON API bucket endpoints"
)]
struct Cli {
    /// Path to a YAML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<String>,

    /// Override the bind address (host:port).
    #[arg(short, long)]
    bind: Option<String>,

    /// Override the bucket backend.
    #[arg(long, value_enum)]
    backend: Option<BackendKind>,

    /// Override the root directory of the local backend.
    #[arg(long)]
    root_dir: Option<String>,

    /// Extra bucket to create at startup (repeatable).
    #[arg(long = "bucket")]
    buckets: Vec<String>,
}

fn init_logging(config: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => fakegcs::config::load_config(path)?,
        None => Config::default(),
    };
    if let Some(kind) = cli.backend {
        config.backend.kind = kind;
    }
    if let Some(root_dir) = cli.root_dir {
        config.backend.root_dir = root_dir;
    }
    config.buckets.extend(cli.buckets);

    init_logging(&config.logging);
    if let Some(path) = &cli.config {
        info!("Loaded configuration from {}", path);
    }

    let bind_addr = cli
        .bind
        .unwrap_or_else(|| format!("{}:{}", config.server.host, config.server.port));

    if config.observability.metrics {
        fakegcs::metrics::init_metrics()?;
        info!("Prometheus metrics initialized");
    }

    let server = Arc::new(fakegcs::Server::from_config(&config).await?);
    let app = fakegcs::server::app(server);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("fakegcs listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("fakegcs shut down");

    Ok(())
}

/// Wait for SIGTERM or SIGINT (Ctrl+C), then return to trigger graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, shutting down");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        },
    }
}
