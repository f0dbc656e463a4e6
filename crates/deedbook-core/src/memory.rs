//! [`MemoryStore`]: an in-process [`ClientStore`] used as a test double and
//! for ephemeral deployments.

use std::{
  collections::BTreeMap,
  convert::Infallible,
  sync::{PoisonError, RwLock},
};

use chrono::Utc;
use uuid::Uuid;

use crate::{
  client::{Client, ClientPatch, NewClient},
  store::ClientStore,
};

/// Clients held in a `BTreeMap` behind a lock. Each call takes the lock once,
/// so every single-record write is atomic.
#[derive(Debug, Default)]
pub struct MemoryStore {
  clients: RwLock<BTreeMap<Uuid, Client>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }
}

impl ClientStore for MemoryStore {
  type Error = Infallible;

  async fn insert_client(&self, input: NewClient) -> Result<Client, Infallible> {
    let now = Utc::now();
    let client = Client {
      client_id:       Uuid::new_v4(),
      name:            input.name,
      email:           input.email,
      phone:           input.phone,
      tax_id:          input.tax_id,
      status:          input.status,
      marital_status:  input.marital_status,
      property_regime: input.property_regime,
      spouse_id:       input.spouse_id,
      wedding_date:    input.wedding_date,
      father_name:     input.father_name,
      mother_name:     input.mother_name,
      created_at:      now,
      updated_at:      now,
    };

    self
      .clients
      .write()
      .unwrap_or_else(PoisonError::into_inner)
      .insert(client.client_id, client.clone());
    Ok(client)
  }

  async fn get_client(&self, id: Uuid) -> Result<Option<Client>, Infallible> {
    let clients = self.clients.read().unwrap_or_else(PoisonError::into_inner);
    Ok(clients.get(&id).cloned())
  }

  async fn patch_client(
    &self,
    id: Uuid,
    patch: ClientPatch,
  ) -> Result<Option<Client>, Infallible> {
    let mut clients = self.clients.write().unwrap_or_else(PoisonError::into_inner);
    let Some(client) = clients.get_mut(&id) else {
      return Ok(None);
    };
    patch.apply_to(client);
    client.updated_at = Utc::now();
    Ok(Some(client.clone()))
  }

  async fn remove_client(&self, id: Uuid) -> Result<bool, Infallible> {
    let mut clients = self.clients.write().unwrap_or_else(PoisonError::into_inner);
    Ok(clients.remove(&id).is_some())
  }

  async fn list_clients(&self) -> Result<Vec<Client>, Infallible> {
    let clients = self.clients.read().unwrap_or_else(PoisonError::into_inner);
    Ok(clients.values().cloned().collect())
  }

  async fn find_by_tax_id(&self, tax_id: &str) -> Result<Vec<Client>, Infallible> {
    let clients = self.clients.read().unwrap_or_else(PoisonError::into_inner);
    Ok(
      clients
        .values()
        .filter(|c| c.tax_id == tax_id)
        .cloned()
        .collect(),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::client::ClientStatus;

  #[tokio::test]
  async fn patch_missing_client_returns_none() {
    let store = MemoryStore::new();
    let patched = store
      .patch_client(Uuid::new_v4(), ClientPatch::status(ClientStatus::Inactive))
      .await
      .unwrap();
    assert!(patched.is_none());
  }

  #[tokio::test]
  async fn patch_stamps_updated_at_and_keeps_created_at() {
    let store = MemoryStore::new();
    let client = store
      .insert_client(NewClient::new("Ana", "ana@example.com", "123"))
      .await
      .unwrap();

    let patched = store
      .patch_client(client.client_id, ClientPatch::status(ClientStatus::Pending))
      .await
      .unwrap()
      .unwrap();

    assert_eq!(patched.status, ClientStatus::Pending);
    assert_eq!(patched.created_at, client.created_at);
    assert!(patched.updated_at >= client.updated_at);
  }

  #[tokio::test]
  async fn remove_and_index_lookup() {
    let store = MemoryStore::new();
    let a = store
      .insert_client(NewClient::new("Ana", "ana@example.com", "111"))
      .await
      .unwrap();
    store
      .insert_client(NewClient::new("Bia", "bia@example.com", "222"))
      .await
      .unwrap();

    assert_eq!(store.find_by_tax_id("111").await.unwrap().len(), 1);
    assert!(store.remove_client(a.client_id).await.unwrap());
    assert!(!store.remove_client(a.client_id).await.unwrap());
    assert!(store.find_by_tax_id("111").await.unwrap().is_empty());
  }
}
