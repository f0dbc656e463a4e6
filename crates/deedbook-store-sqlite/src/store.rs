//! [`SqliteStore`], the SQLite implementation of [`ClientStore`].

use std::path::Path;

use chrono::Utc;
use deedbook_core::{
  client::{Client, ClientPatch, NewClient},
  store::ClientStore,
};
use rusqlite::{OptionalExtension as _, types::Value};
use uuid::Uuid;

use crate::{
  Result,
  encode::{
    CLIENT_COLUMNS, RawClient, encode_date, encode_dt, encode_patch, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A client store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a `SELECT` over the client columns with one optional text filter.
  async fn select_clients(
    &self,
    filter: Option<(&'static str, String)>,
  ) -> Result<Vec<Client>> {
    let raws: Vec<RawClient> = self
      .conn
      .call(move |conn| {
        let rows = match filter {
          Some((column, value)) => {
            let mut stmt = conn.prepare(&format!(
              "SELECT {CLIENT_COLUMNS} FROM clients WHERE {column} = ?1"
            ))?;
            stmt
              .query_map(rusqlite::params![value], RawClient::from_row)?
              .collect::<rusqlite::Result<Vec<_>>>()?
          }
          None => {
            let mut stmt = conn.prepare(&format!("SELECT {CLIENT_COLUMNS} FROM clients"))?;
            stmt
              .query_map([], RawClient::from_row)?
              .collect::<rusqlite::Result<Vec<_>>>()?
          }
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawClient::into_client).collect()
  }
}

// ─── ClientStore impl ────────────────────────────────────────────────────────

impl ClientStore for SqliteStore {
  type Error = crate::Error;

  async fn insert_client(&self, input: NewClient) -> Result<Client> {
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

    let params: Vec<Value> = vec![
      Value::Text(encode_uuid(client.client_id)),
      Value::Text(client.name.clone()),
      Value::Text(client.email.clone()),
      client.phone.clone().map_or(Value::Null, Value::Text),
      Value::Text(client.tax_id.clone()),
      Value::Text(client.status.to_string()),
      client
        .marital_status
        .map_or(Value::Null, |m| Value::Text(m.to_string())),
      client
        .property_regime
        .map_or(Value::Null, |p| Value::Text(p.to_string())),
      client
        .spouse_id
        .map_or(Value::Null, |id| Value::Text(encode_uuid(id))),
      client
        .wedding_date
        .map_or(Value::Null, |d| Value::Text(encode_date(d))),
      client.father_name.clone().map_or(Value::Null, Value::Text),
      client.mother_name.clone().map_or(Value::Null, Value::Text),
      Value::Text(encode_dt(client.created_at)),
      Value::Text(encode_dt(client.updated_at)),
    ];

    self
      .conn
      .call(move |conn| {
        conn.execute(
          &format!(
            "INSERT INTO clients ({CLIENT_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)"
          ),
          rusqlite::params_from_iter(params),
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(client_id = %client.client_id, "client row inserted");
    Ok(client)
  }

  async fn get_client(&self, id: Uuid) -> Result<Option<Client>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawClient> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE client_id = ?1"),
              rusqlite::params![id_str],
              RawClient::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawClient::into_client).transpose()
  }

  async fn patch_client(&self, id: Uuid, patch: ClientPatch) -> Result<Option<Client>> {
    let mut assignments = encode_patch(&patch);
    assignments.push(("updated_at", Value::Text(encode_dt(Utc::now()))));
    let id_str = encode_uuid(id);

    // UPDATE and re-read share one transaction so the returned row is the
    // one this call wrote.
    let raw: Option<RawClient> = self
      .conn
      .call(move |conn| {
        let set_clause = assignments
          .iter()
          .enumerate()
          .map(|(i, (column, _))| format!("{column} = ?{}", i + 1))
          .collect::<Vec<_>>()
          .join(", ");
        let id_param = assignments.len() + 1;
        let mut params: Vec<Value> = assignments.into_iter().map(|(_, v)| v).collect();
        params.push(Value::Text(id_str.clone()));

        let tx = conn.transaction()?;
        let changed = tx.execute(
          &format!("UPDATE clients SET {set_clause} WHERE client_id = ?{id_param}"),
          rusqlite::params_from_iter(params),
        )?;
        if changed == 0 {
          return Ok(None);
        }
        let raw = tx
          .query_row(
            &format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE client_id = ?1"),
            rusqlite::params![id_str],
            RawClient::from_row,
          )
          .optional()?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.map(RawClient::into_client).transpose()
  }

  async fn remove_client(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM clients WHERE client_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn list_clients(&self) -> Result<Vec<Client>> {
    self.select_clients(None).await
  }

  async fn find_by_tax_id(&self, tax_id: &str) -> Result<Vec<Client>> {
    self.select_clients(Some(("tax_id", tax_id.to_owned()))).await
  }
}
