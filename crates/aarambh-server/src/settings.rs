use std::path::{Path, PathBuf};

use anyhow::{Context as _, bail};
use serde::Deserialize;

/// Environment variables override the file, e.g. `AARAMBH_JWT_SECRET`.
pub const ENV_PREFIX: &str = "AARAMBH";

/// Top-level server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:           String,
  #[serde(default = "default_port")]
  pub port:           u16,
  pub store_path:     PathBuf,
  pub jwt_secret:     String,
  #[serde(default = "default_token_ttl")]
  pub token_ttl_secs: i64,
  /// JSON file of catalog entries to insert at startup.
  #[serde(default)]
  pub catalog_path:   Option<PathBuf>,
  /// Browser origins allowed to call the API. Empty admits any origin.
  #[serde(default)]
  pub cors_origins:   Vec<String>,
}

fn default_host() -> String { "0.0.0.0".to_string() }

fn default_port() -> u16 { 5000 }

fn default_token_ttl() -> i64 { 3600 }

impl ServerConfig {
  /// Layer `path` (optional) under `AARAMBH_*` environment variables.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(env_source())
      .build()
      .context("failed to read config")?;

    let cfg: ServerConfig = settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig (store_path and jwt_secret are required)")?;
    cfg.validate()?;
    Ok(cfg)
  }

  fn validate(&self) -> anyhow::Result<()> {
    if self.jwt_secret.trim().is_empty() {
      bail!("jwt_secret must not be empty");
    }
    if self.store_path.as_os_str().is_empty() {
      bail!("store_path must not be empty");
    }
    if self.token_ttl_secs <= 0 {
      bail!("token_ttl_secs must be positive, got {}", self.token_ttl_secs);
    }
    Ok(())
  }

  /// `store_path` with a leading `~` expanded to the user's home directory.
  pub fn resolved_store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
}

/// `AARAMBH_*` variables; `AARAMBH_CORS_ORIGINS` is a comma-separated list.
fn env_source() -> config::Environment {
  config::Environment::with_prefix(ENV_PREFIX)
    .try_parsing(true)
    .list_separator(",")
    .with_list_parse_key("cors_origins")
}

fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
