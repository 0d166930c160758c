//! augur server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the person API over HTTP. On
//! shutdown the process waits for in-flight enrichment tasks up to the
//! configured drain grace period before exiting.

mod settings;

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use augur_api::AppState;
use augur_enrich::{
  DrainCoordinator, Enricher,
  provider::{ProviderClient, RetryPolicy},
};
use augur_store_sqlite::SqlitePersonStore;

use settings::ServerConfig;

#[derive(Parser)]
#[command(author, version, about = "augur identity enrichment server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let sources = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("AUGUR"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = sources
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Open SQLite store.
  let store = SqlitePersonStore::open(&server_cfg.store_path)
    .await
    .with_context(|| {
      format!("failed to open store at {:?}", server_cfg.store_path)
    })?;
  let store = Arc::new(store);

  // Build the enrichment pipeline.
  let drain = DrainCoordinator::new();
  let client = ProviderClient::new(RetryPolicy {
    attempts: server_cfg.retry_attempts,
    delay:    Duration::from_millis(server_cfg.retry_delay_ms),
  })
  .context("failed to build provider client")?;
  let enricher = Arc::new(Enricher::new(
    client,
    server_cfg.providers.clone(),
    Arc::clone(&store),
    drain.clone(),
  ));
  for provider in enricher.providers() {
    tracing::info!(kind = ?provider.kind, endpoint = %provider.endpoint, "provider registered");
  }

  let state = AppState { store, enricher };
  let app = augur_api::api_router(state).layer(TraceLayer::new_for_http());

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  tracing::info!("listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  // Drain phase: wait for outstanding enrichment tasks, bounded by the
  // grace period; anything still running afterwards is abandoned.
  tracing::info!("shutting down gracefully...");
  let grace = Duration::from_secs(server_cfg.drain_timeout_secs);
  if drain.wait_for_drain(grace).await {
    tracing::info!("all enrichment tasks drained");
  } else {
    tracing::warn!(
      outstanding = drain.outstanding(),
      "drain deadline elapsed, abandoning tasks"
    );
  }

  Ok(())
}

async fn shutdown_signal() {
  let ctrl_c = async {
    tokio::signal::ctrl_c()
      .await
      .expect("failed to install ctrl-c handler");
  };

  #[cfg(unix)]
  let terminate = async {
    tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
      .expect("failed to install SIGTERM handler")
      .recv()
      .await;
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    _ = ctrl_c => {},
    _ = terminate => {},
  }
}
