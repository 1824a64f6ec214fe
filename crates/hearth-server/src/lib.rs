//! Hearth HTTP server: configuration and the top-level router.
//!
//! The binary in `main.rs` wires these together with a SQLite store.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::{Json, Router, routing::get};
use hearth_core::store::FamilyStore;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `HEARTH_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("~/.local/share/hearth/hearth.db") }

impl ServerConfig {
  /// Layer the optional file at `path` under the `HEARTH_*` environment.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("HEARTH"))
      .build()?
      .try_deserialize()
  }

  /// `host:port`, ready for `TcpListener::bind`.
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// The store path with a leading `~` expanded.
  pub fn resolved_store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct Health {
  pub status:  String,
  pub version: String,
}

/// `GET /health`
async fn health() -> Json<Health> {
  Json(Health {
    status:  "ok".to_owned(),
    version: env!("CARGO_PKG_VERSION").to_owned(),
  })
}

/// The full application: `/health` plus the JSON API under `/api`, with
/// request tracing.
pub fn router<S>(store: Arc<S>) -> Router
where
  S: FamilyStore + 'static,
{
  Router::new()
    .route("/health", get(health))
    .nest("/api", hearth_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}
