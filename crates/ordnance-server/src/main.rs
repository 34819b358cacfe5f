//! Ordnance server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), loads the source
//! map, opens the SQLite store, starts the version observer and serves the
//! JSON API until Ctrl-C or SIGTERM.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use ordnance_api::{ApiState, api_router};
use ordnance_core::sources::SourceMap;
use ordnance_ingest::{Aggregator, Ingestor, VersionObserver};
use ordnance_server::ServerConfig;
use ordnance_sheet::{HttpTableReader, SheetMarkerSource, SheetTableParser};
use ordnance_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Ordnance weapon-stats service")]
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
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("ORDNANCE"))
    .build()
    .context("failed to read config file")?;

  let cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let sources_path = expand_tilde(&cfg.sources_path);
  let sources = SourceMap::load(&sources_path)
    .with_context(|| format!("failed to load source map from {sources_path:?}"))?;
  let sources = Arc::new(sources);
  tracing::info!(tables = sources.len(), "loaded source map");

  let store_path = expand_tilde(&cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  let store = Arc::new(store);

  // One pooled HTTP client serves both the tables and the version sheet.
  let reader =
    HttpTableReader::new(cfg.fetch_timeout()).context("failed to build HTTP client")?;
  let parser = Arc::new(SheetTableParser::new(reader.clone()));
  let marker = Arc::new(SheetMarkerSource::new(reader, sources.version_url()));

  let aggregator = Aggregator::new(sources.clone(), parser, cfg.workers);
  let ingest = Arc::new(Ingestor::new(store.clone(), aggregator));

  let shutdown = CancellationToken::new();
  tokio::spawn(shutdown_signal(shutdown.clone()));

  let observer = VersionObserver::new(store.clone(), ingest.clone(), marker)
    .with_period(cfg.poll_interval())
    .with_cycle_timeout(cfg.cycle_timeout());
  let observer_task = tokio::spawn(observer.run(shutdown.clone()));

  let state = ApiState::new(store, ingest, sources, shutdown.clone())
    .with_timeouts(cfg.request_timeout(), cfg.cycle_timeout());
  let app = ordnance_server::app(api_router(state));
  let address = cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown.clone().cancelled_owned())
    .await
    .context("server error")?;

  // The server can also stop on its own; make sure the observer follows.
  shutdown.cancel();
  observer_task.await.context("version observer panicked")?;

  Ok(())
}

/// Cancel `token` on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal(token: CancellationToken) {
  let ctrl_c = async {
    if let Err(e) = tokio::signal::ctrl_c().await {
      tracing::warn!(error = %e, "cannot listen for Ctrl-C");
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    use tokio::signal::unix::{SignalKind, signal};
    match signal(SignalKind::terminate()) {
      Ok(mut sigterm) => {
        sigterm.recv().await;
      }
      Err(e) => {
        tracing::warn!(error = %e, "cannot listen for SIGTERM");
        std::future::pending::<()>().await;
      }
    }
  };
  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    _ = ctrl_c => {}
    _ = terminate => {}
    _ = token.cancelled() => return,
  }
  tracing::info!("shutdown signal received");
  token.cancel();
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
