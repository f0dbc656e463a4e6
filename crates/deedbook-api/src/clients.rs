//! Handlers for `/clients` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/clients` | `search`, `status`, `tax_id`, `sort`, `order`, `page`, `page_size` |
//! | `POST`   | `/clients` | Body: [`NewClient`]; returns 201 + `{"id": …}` |
//! | `GET`    | `/clients/duplicates` | `name`, `email`, `phone`, `tax_id`, `exclude_id` |
//! | `GET`    | `/clients/{id}` | 404 if not found |
//! | `PATCH`  | `/clients/{id}` | Body: [`UpdateClient`] |
//! | `DELETE` | `/clients/{id}` | Soft delete: status becomes `inactive` |

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, PathRejection, QueryRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use deedbook_core::{
  client::{Client, NewClient, UpdateClient},
  duplicates::{DuplicateCandidate, DuplicateReport},
  manager::{ClientManager, ClientQuery},
  query::Page,
  store::ClientStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, auth::Caller, error::ApiError};

/// Upper bound on `page_size`, whatever the caller asks for.
pub const MAX_PAGE_SIZE: usize = 100;

/// Body returned by every mutating endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct IdResponse {
  pub id: Uuid,
}

// Extractor rejections become `ApiError::BadRequest` so every 400 carries the
// JSON error body.

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
  body
    .map(|Json(b)| b)
    .map_err(|e| ApiError::BadRequest(e.body_text()))
}

fn client_id(path: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, ApiError> {
  path
    .map(|Path(id)| id)
    .map_err(|e| ApiError::BadRequest(e.body_text()))
}

fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
  query
    .map(|Query(q)| q)
    .map_err(|e| ApiError::BadRequest(e.body_text()))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /clients[?search=...][&status=...][&sort=...&order=asc|desc][&page=...&page_size=...]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  _caller: Caller,
  query: Result<Query<ClientQuery>, QueryRejection>,
) -> Result<Json<Page<Client>>, ApiError>
where
  S: ClientStore + 'static,
{
  let mut query = query_params(query)?;
  query.page_size = query.page_size.min(MAX_PAGE_SIZE);
  let page = ClientManager::new(state.store.as_ref())
    .list_clients(&query)
    .await?;
  Ok(Json(page))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /clients/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  _caller: Caller,
  id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Client>, ApiError>
where
  S: ClientStore + 'static,
{
  let id = client_id(id)?;
  let client = ClientManager::new(state.store.as_ref()).get_client(id).await?;
  Ok(Json(client))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /clients`: returns 201 with the new client's id.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  body: Result<Json<NewClient>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ClientStore + 'static,
{
  let input = json_body(body)?;
  let id = ClientManager::new(state.store.as_ref())
    .create_client(input)
    .await?;
  tracing::debug!(user = %caller.username, client_id = %id, "create handled");
  Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /clients/{id}`: absent keys are untouched, `null` clears.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  id: Result<Path<Uuid>, PathRejection>,
  body: Result<Json<UpdateClient>, JsonRejection>,
) -> Result<Json<IdResponse>, ApiError>
where
  S: ClientStore + 'static,
{
  let id = client_id(id)?;
  let update = json_body(body)?;
  let id = ClientManager::new(state.store.as_ref())
    .update_client(id, update)
    .await?;
  tracing::debug!(user = %caller.username, client_id = %id, "update handled");
  Ok(Json(IdResponse { id }))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /clients/{id}`: marks the client inactive and keeps the row.
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<IdResponse>, ApiError>
where
  S: ClientStore + 'static,
{
  let id = client_id(id)?;
  let id = ClientManager::new(state.store.as_ref())
    .delete_client(id)
    .await?;
  tracing::debug!(user = %caller.username, client_id = %id, "delete handled");
  Ok(Json(IdResponse { id }))
}

// ─── Duplicates ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DuplicateParams {
  #[serde(default)]
  pub name:       String,
  #[serde(default)]
  pub email:      String,
  pub phone:      Option<String>,
  #[serde(default)]
  pub tax_id:     String,
  /// The client being edited, which must not count as its own duplicate.
  pub exclude_id: Option<Uuid>,
}

/// `GET /clients/duplicates?name=...&email=...&tax_id=...[&phone=...][&exclude_id=...]`
pub async fn duplicates<S>(
  State(state): State<AppState<S>>,
  _caller: Caller,
  params: Result<Query<DuplicateParams>, QueryRejection>,
) -> Result<Json<DuplicateReport>, ApiError>
where
  S: ClientStore + 'static,
{
  let params = query_params(params)?;
  let candidate = DuplicateCandidate {
    name:   params.name,
    email:  params.email,
    phone:  params.phone,
    tax_id: params.tax_id,
  };
  let report = ClientManager::new(state.store.as_ref())
    .check_duplicates(&candidate, params.exclude_id)
    .await?;
  Ok(Json(report))
}
