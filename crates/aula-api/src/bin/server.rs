//! Aula server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the JSON API over HTTP. If
//! `peer_url` is configured, every successful mutation is replicated to
//! that peer.

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use aula_api::{AppState, ServerConfig};
use aula_replica::Forwarder;
use aula_store_sqlite::SqliteStore;

#[derive(Parser)]
#[command(author, version, about = "Aula academic-records server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration: file first, environment overrides on top.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("AULA"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  if let Some(parent) = server_cfg.db_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }

  let store = SqliteStore::open(&server_cfg.db_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", server_cfg.db_path))?;

  let forwarder = Forwarder::new(
    server_cfg.peer_url.clone(),
    Duration::from_secs(server_cfg.forward_timeout_secs),
  )
  .context("failed to build replication client")?;

  match &server_cfg.peer_url {
    Some(peer) => tracing::info!(peer, "replicating mutations to peer"),
    None => tracing::info!("no peer_url configured; replication disabled"),
  }

  let state = AppState {
    store:     Arc::new(store),
    forwarder: Arc::new(forwarder),
  };

  let app = aula_api::api_router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
