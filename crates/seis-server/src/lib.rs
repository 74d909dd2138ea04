//! HTTP host for the seismic reading API.
//!
//! Wraps [`seis_api::api_router`] under `/api` with request tracing, an
//! upload size limit and (optionally) permissive CORS for a browser
//! dashboard served from another origin.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::{Router, extract::DefaultBodyLimit};
use seis_core::store::ReadingStore;
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `SEIS_*` environment variables. Every field has a default.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:             String,
  pub port:             u16,
  pub store_path:       PathBuf,
  /// Largest accepted request body, in bytes.
  pub max_upload_bytes: usize,
  pub cors_permissive:  bool,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:             "0.0.0.0".to_string(),
      port:             9797,
      store_path:       PathBuf::from("seis.db"),
      max_upload_bytes: 10 * 1024 * 1024,
      cors_permissive:  true,
    }
  }
}

impl ServerConfig {
  /// Layer the optional TOML file at `path` under `SEIS_*` environment
  /// variables.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("SEIS"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// `store_path` with a leading `~` expanded to the user's home directory.
  pub fn resolved_store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
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

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router for `store`.
pub fn app<S>(store: Arc<S>, config: &ServerConfig) -> Router
where
  S: ReadingStore + 'static,
{
  let router = Router::new()
    .nest("/api", seis_api::api_router(store))
    .layer(DefaultBodyLimit::max(config.max_upload_bytes))
    .layer(TraceLayer::new_for_http());

  if config.cors_permissive {
    router.layer(CorsLayer::permissive())
  } else {
    router
  }
}

// ─── Integration tests ────────────────────────────────────────────────────────
