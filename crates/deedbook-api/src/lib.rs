//! JSON REST API for deedbook.
//!
//! Exposes an axum [`Router`] backed by any [`deedbook_core::store::ClientStore`].
//! Every route requires an authenticated [`auth::Caller`]; TLS and other
//! transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", deedbook_api::api_router(state))
//! ```

pub mod auth;
pub mod clients;
pub mod error;

use std::sync::Arc;

use axum::{Router, routing::get};
use deedbook_core::store::ClientStore;

pub use auth::AuthConfig;
pub use error::ApiError;

/// Shared state threaded through all handlers.
pub struct AppState<S> {
  pub store: Arc<S>,
  pub auth:  Arc<AuthConfig>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), auth: Arc::clone(&self.auth) }
  }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: ClientStore + 'static,
{
  Router::new()
    .route("/clients", get(clients::list::<S>).post(clients::create::<S>))
    .route("/clients/duplicates", get(clients::duplicates::<S>))
    .route(
      "/clients/{id}",
      get(clients::get_one::<S>)
        .patch(clients::update::<S>)
        .delete(clients::delete::<S>),
    )
    .with_state(state)
}

// ─── Router tests ─────────────────────────────────────────────────────────────
