//! The `ClientStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `deedbook-store-sqlite`
//! and [`crate::memory::MemoryStore`]). Higher layers depend on this
//! abstraction, not on any concrete backend.
//!
//! Each method is one suspend point against the backing store. A store must
//! make every single-record write atomic; nothing here spans records.

use std::future::Future;

use uuid::Uuid;

use crate::client::{Client, ClientPatch, NewClient};

/// Abstraction over a keyed client store.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ClientStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new client. The store assigns the id and both timestamps.
  fn insert_client(
    &self,
    input: NewClient,
  ) -> impl Future<Output = Result<Client, Self::Error>> + Send + '_;

  /// Retrieve a client by id. Returns `None` if not found.
  fn get_client(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Client>, Self::Error>> + Send + '_;

  /// Apply `patch` to one client and stamp `updated_at`.
  ///
  /// Returns the patched record, or `None` if `id` does not resolve.
  fn patch_client(
    &self,
    id: Uuid,
    patch: ClientPatch,
  ) -> impl Future<Output = Result<Option<Client>, Self::Error>> + Send + '_;

  /// Permanently delete a client. Returns `false` if it did not exist.
  fn remove_client(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Every stored client, in no particular order.
  fn list_clients(
    &self,
  ) -> impl Future<Output = Result<Vec<Client>, Self::Error>> + Send + '_;

  /// Indexed lookup by exact tax id.
  fn find_by_tax_id<'a>(
    &'a self,
    tax_id: &'a str,
  ) -> impl Future<Output = Result<Vec<Client>, Self::Error>> + Send + 'a;
}
