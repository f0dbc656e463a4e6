//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use deedbook_core::{
  Error as CoreError,
  client::{ClientPatch, ClientStatus, MaritalStatus, NewClient, PropertyRegime, UpdateClient},
  manager::ClientManager,
  store::ClientStore,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn full_client() -> NewClient {
  NewClient {
    name:            "Maria Souza".into(),
    email:           "maria@example.com".into(),
    phone:           Some("(11) 91234-5678".into()),
    tax_id:          "123.456.789-00".into(),
    status:          ClientStatus::Pending,
    marital_status:  Some(MaritalStatus::Widowed),
    property_regime: Some(PropertyRegime::TotalSeparation),
    spouse_id:       None,
    wedding_date:    NaiveDate::from_ymd_opt(1990, 6, 12),
    father_name:     Some("Jose Souza".into()),
    mother_name:     None,
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_get_client() {
  let s = store().await;

  let client = s.insert_client(full_client()).await.unwrap();
  let fetched = s.get_client(client.client_id).await.unwrap().unwrap();

  assert_eq!(fetched.name, "Maria Souza");
  assert_eq!(fetched.phone.as_deref(), Some("(11) 91234-5678"));
  assert_eq!(fetched.status, ClientStatus::Pending);
  assert_eq!(fetched.marital_status, Some(MaritalStatus::Widowed));
  assert_eq!(fetched.property_regime, Some(PropertyRegime::TotalSeparation));
  assert_eq!(fetched.wedding_date, NaiveDate::from_ymd_opt(1990, 6, 12));
  assert_eq!(fetched.mother_name, None);
  assert_eq!(fetched.created_at, client.created_at);
}

#[tokio::test]
async fn get_client_missing_returns_none() {
  let s = store().await;
  assert!(s.get_client(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn patch_sets_clears_and_leaves_fields() {
  let s = store().await;
  let client = s.insert_client(full_client()).await.unwrap();

  let mut patch = ClientPatch::status(ClientStatus::Active);
  patch.phone = Some(None);
  patch.email = Some("maria.souza@example.com".into());

  let patched = s.patch_client(client.client_id, patch).await.unwrap().unwrap();
  assert_eq!(patched.status, ClientStatus::Active);
  assert_eq!(patched.phone, None);
  assert_eq!(patched.email, "maria.souza@example.com");
  assert_eq!(patched.father_name.as_deref(), Some("Jose Souza"));
  assert!(patched.updated_at >= client.updated_at);

  let fetched = s.get_client(client.client_id).await.unwrap().unwrap();
  assert_eq!(fetched, patched);
}

#[tokio::test]
async fn patch_missing_client_returns_none() {
  let s = store().await;
  let patched = s
    .patch_client(Uuid::new_v4(), ClientPatch::status(ClientStatus::Inactive))
    .await
    .unwrap();
  assert!(patched.is_none());
}

#[tokio::test]
async fn remove_client_deletes_the_row() {
  let s = store().await;
  let client = s.insert_client(full_client()).await.unwrap();

  assert!(s.remove_client(client.client_id).await.unwrap());
  assert!(!s.remove_client(client.client_id).await.unwrap());
  assert!(s.get_client(client.client_id).await.unwrap().is_none());
}

#[tokio::test]
async fn list_and_tax_id_lookup() {
  let s = store().await;
  s.insert_client(full_client()).await.unwrap();
  s.insert_client(full_client()).await.unwrap();
  s.insert_client(NewClient::new("Ana", "ana@example.com", "999"))
    .await
    .unwrap();

  assert_eq!(s.list_clients().await.unwrap().len(), 3);
  assert_eq!(s.find_by_tax_id("123.456.789-00").await.unwrap().len(), 2);
  assert!(s.find_by_tax_id("12345678900").await.unwrap().is_empty());
}

// ─── Spouse links through the manager ────────────────────────────────────────

#[tokio::test]
async fn spouse_links_survive_the_database_roundtrip() {
  let s = store().await;
  let manager = ClientManager::new(&s);

  let a = manager
    .create_client(NewClient::new("Ana", "ana@example.com", "1"))
    .await
    .unwrap();
  let mut b_input = NewClient::new("Bruno", "bruno@example.com", "2");
  b_input.spouse_id = Some(a);
  b_input.marital_status = Some(MaritalStatus::Married);
  let b = manager.create_client(b_input).await.unwrap();

  let ana = s.get_client(a).await.unwrap().unwrap();
  assert_eq!(ana.spouse_id, Some(b));
  assert_eq!(ana.marital_status, Some(MaritalStatus::Married));

  manager
    .update_client(a, UpdateClient { remove_spouse: true, ..Default::default() })
    .await
    .unwrap();
  assert_eq!(s.get_client(a).await.unwrap().unwrap().spouse_id, None);
  assert_eq!(s.get_client(b).await.unwrap().unwrap().spouse_id, None);
}

#[tokio::test]
async fn soft_delete_marks_inactive_and_keeps_row() {
  let s = store().await;
  let manager = ClientManager::new(&s);
  let a = manager
    .create_client(NewClient::new("Ana", "ana@example.com", "1"))
    .await
    .unwrap();

  manager.delete_client(a).await.unwrap();
  let ana = s.get_client(a).await.unwrap().unwrap();
  assert_eq!(ana.status, ClientStatus::Inactive);

  let err = manager.delete_client(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, CoreError::ClientNotFound(_)));
}
