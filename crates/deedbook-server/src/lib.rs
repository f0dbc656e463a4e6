//! Server wiring for deedbook: configuration and the top-level router.
//!
//! The binary in `main.rs` loads a [`ServerConfig`], opens the SQLite store,
//! and serves [`app`].

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use axum::Router;
use deedbook_api::{AppState, AuthConfig};
use deedbook_core::store::ClientStore;
use serde::Deserialize;
use rand_core::OsRng;
use tower_http::trace::TraceLayer;

/// Prefix for environment overrides, e.g. `DEEDBOOK_PORT=9000`.
pub const ENV_PREFIX: &str = "DEEDBOOK";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `DEEDBOOK_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:               String,
  #[serde(default = "default_port")]
  pub port:               u16,
  pub store_path:         PathBuf,
  pub auth_username:      String,
  /// argon2 PHC string; generate one with `deedbook --hash-password`.
  pub auth_password_hash: String,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8080 }

impl ServerConfig {
  /// Read `path` if it exists, then apply `DEEDBOOK_*` overrides.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix(ENV_PREFIX))
      .build()
      .with_context(|| format!("reading configuration from {}", path.display()))?
      .try_deserialize()
      .context("configuration is incomplete or malformed")
  }

  /// `store_path` with a leading `~/` resolved against `$HOME`.
  pub fn resolved_store_path(&self) -> PathBuf {
    match (self.store_path.strip_prefix("~"), std::env::var_os("HOME")) {
      (Ok(rest), Some(home)) => PathBuf::from(home).join(rest),
      _ => self.store_path.clone(),
    }
  }

  pub fn auth(&self) -> AuthConfig {
    AuthConfig {
      username:      self.auth_username.clone(),
      password_hash: self.auth_password_hash.clone(),
    }
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// argon2id PHC string for `password`, suitable for `auth_password_hash`.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| anyhow::anyhow!("hashing password: {e}"))
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the application state for `store` under `config`'s credentials.
pub fn state<S: ClientStore>(store: S, config: &ServerConfig) -> AppState<S> {
  AppState { store: Arc::new(store), auth: Arc::new(config.auth()) }
}

/// The full application: the client API under `/api`, with request tracing.
pub fn app<S>(state: AppState<S>) -> Router
where
  S: ClientStore + 'static,
{
  Router::new()
    .nest("/api", deedbook_api::api_router(state))
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────
