//! svy-sr (Status & Report) - Survey progress service
//!
//! Owns the survey ledger for the process lifetime and serves the
//! respondent, administrative and status routes over HTTP.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use svy_common::config::{ConfigSource, SurveyConfig};
use svy_common::events::EventBus;
use svy_common::Ledger;
use svy_sr::{build_router, AppState};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for svy-sr
#[derive(Parser, Debug)]
#[command(name = "svy-sr")]
#[command(about = "Survey status & report service")]
#[command(version)]
struct Args {
    /// Config file (overrides SVY_CONFIG and discovered config files)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides the configured bind address port)
    #[arg(short, long, env = "SVY_SR_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "svy_sr=info,svy_common=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!("Starting survey status service (svy-sr) v{}", env!("CARGO_PKG_VERSION"));

    let (config, source) =
        SurveyConfig::resolve(args.config.as_deref()).context("Failed to load configuration")?;
    match &source {
        ConfigSource::File(path) => info!("Configuration: {}", path.display()),
        ConfigSource::CompiledDefaults => info!("Configuration: compiled defaults"),
    }

    let catalog = Arc::new(config.catalog().context("Invalid question catalog")?);
    let gate = Arc::new(config.admin_gate());
    info!(
        "Survey has {} questions, {} privileged identities",
        catalog.question_count(),
        gate.len()
    );

    let ledger = Arc::new(Ledger::new(catalog, gate));
    let state = AppState::new(ledger, EventBus::new(config.event_capacity), config.public_status);
    let app = build_router(state);

    let mut addr: SocketAddr = config
        .bind_addr
        .parse()
        .with_context(|| format!("Invalid bind address '{}'", config.bind_addr))?;
    if let Some(port) = args.port {
        addr.set_port(port);
    }

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("svy-sr listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("svy-sr stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
