//! Aarambh API server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) layered under
//! `AARAMBH_*` environment variables, opens the SQLite store, optionally seeds
//! the achievement catalog, and serves the JSON API over HTTP.

mod cors;
mod seed;
mod settings;

use std::{path::PathBuf, sync::Arc};

use aarambh_api::{AppState, TokenKeys};
use aarambh_store_sqlite::SqliteStore;
use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::settings::ServerConfig;

#[derive(Parser)]
#[command(author, version, about = "Aarambh learning platform API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Seed the achievement catalog from this JSON file (overrides
  /// `catalog_path`).
  #[arg(long)]
  seed: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // A missing .env is fine; the real environment still applies.
  let _ = dotenvy::dotenv();

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let server_cfg = ServerConfig::load(&cli.config)?;

  let store_path = server_cfg.resolved_store_path();
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  if let Some(catalog) = cli.seed.as_ref().or(server_cfg.catalog_path.as_ref()) {
    let count = seed::seed_from_file(&store, catalog).await?;
    tracing::info!(count, path = %catalog.display(), "achievement catalog seeded");
  }

  let state = AppState::new(
    Arc::new(store),
    TokenKeys::new(&server_cfg.jwt_secret, server_cfg.token_ttl_secs),
  );
  let cors = cors::build_cors_layer(&server_cfg.cors_origins)?;
  if server_cfg.cors_origins.is_empty() {
    tracing::warn!("cors_origins is empty; any origin may call the API");
  }
  let app = aarambh_api::api_router(state)
    .layer(cors)
    .layer(TraceLayer::new_for_http());

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
