//! `hearth` server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and either serves the JSON API over HTTP or runs a
//! one-shot re-consolidation.
//!
//! ```text
//! hearth serve
//! hearth reconsolidate --family <uuid> --yes
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use hearth_core::store::FamilyStore as _;
use hearth_server::ServerConfig;
use hearth_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Parser)]
#[command(author, version, about = "Hearth family registry server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the JSON API (the default).
  Serve,
  /// Re-run consolidation over every recorded relationship and exit.
  Reconsolidate {
    /// Only the relationships touching this family.
    #[arg(long)]
    family: Option<Uuid>,
    /// Confirm the run; nothing happens without it.
    #[arg(long)]
    yes:    bool,
  },
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

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  let store_path = server_cfg.resolved_store_path();
  if let Some(parent) = store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => serve(&server_cfg, store).await,
    Command::Reconsolidate { family, yes } => reconsolidate(&store, family, yes).await,
  }
}

async fn serve(server_cfg: &ServerConfig, store: SqliteStore) -> anyhow::Result<()> {
  let app = hearth_server::router(Arc::new(store));
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

async fn reconsolidate(
  store: &SqliteStore,
  family: Option<Uuid>,
  yes: bool,
) -> anyhow::Result<()> {
  if !yes {
    anyhow::bail!("re-consolidation rewrites family membership; pass --yes to proceed");
  }

  let report = store
    .reconsolidate(family)
    .await
    .context("re-consolidation failed")?;

  println!("{}", serde_json::to_string_pretty(&report)?);
  Ok(())
}
