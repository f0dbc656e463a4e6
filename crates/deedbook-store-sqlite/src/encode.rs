//! Encoding and decoding helpers between domain types and the plain-text
//! values stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, dates are ISO 8601, UUIDs are hyphenated
//! lowercase strings, and enums are their snake_case discriminants.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use deedbook_core::client::{Client, ClientPatch};
use rusqlite::types::Value;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::DateParse(e.to_string()))
}

/// Parse a snake_case enum discriminant read from `column`.
pub fn decode_enum<T: FromStr>(column: &'static str, s: &str) -> Result<T> {
  s.parse().map_err(|_| Error::UnknownVariant { column, value: s.to_owned() })
}

fn text(s: impl Into<String>) -> Value { Value::Text(s.into()) }

fn nullable<T>(v: Option<T>, f: impl FnOnce(T) -> String) -> Value {
  v.map_or(Value::Null, |v| Value::Text(f(v)))
}

// ─── Patches ─────────────────────────────────────────────────────────────────

/// The `(column, value)` assignments a [`ClientPatch`] translates to.
/// Unset fields produce no assignment; cleared fields assign `NULL`.
pub fn encode_patch(patch: &ClientPatch) -> Vec<(&'static str, Value)> {
  let mut out = Vec::new();

  if let Some(v) = &patch.name {
    out.push(("name", text(v.as_str())));
  }
  if let Some(v) = &patch.email {
    out.push(("email", text(v.as_str())));
  }
  if let Some(v) = &patch.phone {
    out.push(("phone", nullable(v.as_deref(), str::to_owned)));
  }
  if let Some(v) = &patch.tax_id {
    out.push(("tax_id", text(v.as_str())));
  }
  if let Some(v) = patch.status {
    out.push(("status", text(<&str>::from(v))));
  }
  if let Some(v) = patch.marital_status {
    out.push(("marital_status", nullable(v, |m| <&str>::from(m).to_owned())));
  }
  if let Some(v) = patch.property_regime {
    out.push(("property_regime", nullable(v, |p| <&str>::from(p).to_owned())));
  }
  if let Some(v) = patch.spouse_id() {
    out.push(("spouse_id", nullable(v, encode_uuid)));
  }
  if let Some(v) = patch.wedding_date {
    out.push(("wedding_date", nullable(v, encode_date)));
  }
  if let Some(v) = &patch.father_name {
    out.push(("father_name", nullable(v.as_deref(), str::to_owned)));
  }
  if let Some(v) = &patch.mother_name {
    out.push(("mother_name", nullable(v.as_deref(), str::to_owned)));
  }

  out
}

// ─── Row type ────────────────────────────────────────────────────────────────

/// Column list matching [`RawClient::from_row`].
pub const CLIENT_COLUMNS: &str = "client_id, name, email, phone, tax_id, status, \
   marital_status, property_regime, spouse_id, wedding_date, father_name, \
   mother_name, created_at, updated_at";

/// Raw strings read directly from a `clients` row.
pub struct RawClient {
  pub client_id:       String,
  pub name:            String,
  pub email:           String,
  pub phone:           Option<String>,
  pub tax_id:          String,
  pub status:          String,
  pub marital_status:  Option<String>,
  pub property_regime: Option<String>,
  pub spouse_id:       Option<String>,
  pub wedding_date:    Option<String>,
  pub father_name:     Option<String>,
  pub mother_name:     Option<String>,
  pub created_at:      String,
  pub updated_at:      String,
}

impl RawClient {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      client_id:       row.get(0)?,
      name:            row.get(1)?,
      email:           row.get(2)?,
      phone:           row.get(3)?,
      tax_id:          row.get(4)?,
      status:          row.get(5)?,
      marital_status:  row.get(6)?,
      property_regime: row.get(7)?,
      spouse_id:       row.get(8)?,
      wedding_date:    row.get(9)?,
      father_name:     row.get(10)?,
      mother_name:     row.get(11)?,
      created_at:      row.get(12)?,
      updated_at:      row.get(13)?,
    })
  }

  pub fn into_client(self) -> Result<Client> {
    Ok(Client {
      client_id:       decode_uuid(&self.client_id)?,
      name:            self.name,
      email:           self.email,
      phone:           self.phone,
      tax_id:          self.tax_id,
      status:          decode_enum("status", &self.status)?,
      marital_status:  self
        .marital_status
        .as_deref()
        .map(|s| decode_enum("marital_status", s))
        .transpose()?,
      property_regime: self
        .property_regime
        .as_deref()
        .map(|s| decode_enum("property_regime", s))
        .transpose()?,
      spouse_id:       self.spouse_id.as_deref().map(decode_uuid).transpose()?,
      wedding_date:    self.wedding_date.as_deref().map(decode_date).transpose()?,
      father_name:     self.father_name,
      mother_name:     self.mother_name,
      created_at:      decode_dt(&self.created_at)?,
      updated_at:      decode_dt(&self.updated_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use deedbook_core::client::{ClientStatus, MaritalStatus};

  use super::*;

  #[test]
  fn patch_encodes_only_set_fields() {
    let mut patch = ClientPatch::status(ClientStatus::Inactive);
    patch.phone = Some(None);
    patch.marital_status = Some(Some(MaritalStatus::CommonLawMarriage));

    assert_eq!(encode_patch(&patch), vec![
      ("phone", Value::Null),
      ("status", Value::Text("inactive".into())),
      ("marital_status", Value::Text("common_law_marriage".into())),
    ]);
  }

  #[test]
  fn unknown_discriminant_is_reported_with_its_column() {
    let err = decode_enum::<ClientStatus>("status", "archived").unwrap_err();
    assert!(matches!(err, Error::UnknownVariant { column: "status", .. }));
  }

  #[test]
  fn dates_roundtrip_as_iso() {
    let d = NaiveDate::from_ymd_opt(2019, 2, 3).unwrap();
    assert_eq!(encode_date(d), "2019-02-03");
    assert_eq!(decode_date("2019-02-03").unwrap(), d);
  }
}
