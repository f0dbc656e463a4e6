//! `deedbook`: serves the client registry API over HTTP.
//!
//! ```text
//! deedbook --config /etc/deedbook/config.toml
//! echo -n 'secret' | deedbook --hash-password
//! ```
//!
//! Every key in the config file can be overridden with a `DEEDBOOK_*`
//! environment variable, e.g. `DEEDBOOK_PORT=9000`.

use std::{io, path::PathBuf};

use anyhow::Context as _;
use clap::Parser;
use deedbook_server::ServerConfig;
use deedbook_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "deedbook", version, about = "Client registry server")]
struct Args {
  /// TOML configuration file; missing is fine if the environment covers it.
  #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
  config: PathBuf,

  /// Read one line from stdin, print its argon2 hash, and exit.
  #[arg(long)]
  hash_password: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let args = Args::parse();

  if args.hash_password {
    let password = io::stdin()
      .lines()
      .next()
      .transpose()
      .context("reading password from stdin")?
      .unwrap_or_default();
    println!("{}", deedbook_server::hash_password(&password)?);
    return Ok(());
  }

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  run(ServerConfig::load(&args.config)?).await
}

async fn run(cfg: ServerConfig) -> anyhow::Result<()> {
  let store_path = cfg.resolved_store_path();
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("opening client store {}", store_path.display()))?;
  tracing::info!(path = %store_path.display(), "client store ready");

  let address = cfg.address();
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("binding {address}"))?;
  tracing::info!(%address, user = %cfg.auth_username, "serving /api");

  let app = deedbook_server::app(deedbook_server::state(store, &cfg));
  axum::serve(listener, app).await.context("http server stopped")
}
