//! Client records and the payloads used to create and change them.
//!
//! A client is one natural person tracked by the office. Two clients may be
//! linked as spouses through `spouse_id`; that link is only ever written by
//! [`crate::manager::ClientManager`], which keeps it symmetric.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  query::{FieldValue, Queryable},
};

// ─── Enumerations ────────────────────────────────────────────────────────────

/// Whether the office is currently working with the client.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  strum::EnumString,
  strum::IntoStaticStr,
  strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ClientStatus {
  #[default]
  Active,
  Inactive,
  Pending,
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::EnumString,
  strum::IntoStaticStr,
  strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MaritalStatus {
  Single,
  CommonLawMarriage,
  Married,
  Widowed,
  Divorced,
}

/// The property regime a couple chose when they married.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::EnumString,
  strum::IntoStaticStr,
  strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PropertyRegime {
  PartialCommunion,
  TotalCommunion,
  TotalSeparation,
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// A stored client record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
  pub client_id:       Uuid,
  pub name:            String,
  pub email:           String,
  pub phone:           Option<String>,
  /// Not unique by construction; see [`crate::duplicates`].
  pub tax_id:          String,
  pub status:          ClientStatus,
  pub marital_status:  Option<MaritalStatus>,
  pub property_regime: Option<PropertyRegime>,
  /// Symmetric: if `a.spouse_id == Some(b.client_id)` then
  /// `b.spouse_id == Some(a.client_id)`.
  pub spouse_id:       Option<Uuid>,
  pub wedding_date:    Option<NaiveDate>,
  pub father_name:     Option<String>,
  pub mother_name:     Option<String>,
  /// Server-assigned; never changes after creation.
  pub created_at:      DateTime<Utc>,
  pub updated_at:      DateTime<Utc>,
}

// ─── NewClient ───────────────────────────────────────────────────────────────

/// Input to [`crate::store::ClientStore::insert_client`] and
/// [`crate::manager::ClientManager::create_client`].
///
/// Identity and timestamps are always assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewClient {
  pub name:            String,
  pub email:           String,
  pub phone:           Option<String>,
  pub tax_id:          String,
  pub status:          ClientStatus,
  pub marital_status:  Option<MaritalStatus>,
  pub property_regime: Option<PropertyRegime>,
  pub spouse_id:       Option<Uuid>,
  pub wedding_date:    Option<NaiveDate>,
  pub father_name:     Option<String>,
  pub mother_name:     Option<String>,
}

impl NewClient {
  /// Convenience constructor: an active client with every optional field
  /// unset.
  pub fn new(
    name: impl Into<String>,
    email: impl Into<String>,
    tax_id: impl Into<String>,
  ) -> Self {
    Self {
      name:            name.into(),
      email:           email.into(),
      phone:           None,
      tax_id:          tax_id.into(),
      status:          ClientStatus::default(),
      marital_status:  None,
      property_regime: None,
      spouse_id:       None,
      wedding_date:    None,
      father_name:     None,
      mother_name:     None,
    }
  }

  /// Reject blank required fields.
  pub fn validate(&self) -> Result<()> {
    require("name", &self.name)?;
    require("email", &self.email)?;
    require("tax_id", &self.tax_id)
  }
}

fn require(field: &str, value: &str) -> Result<()> {
  if value.trim().is_empty() {
    return Err(Error::Validation(format!("{field} is required")));
  }
  Ok(())
}

// ─── UpdateClient ────────────────────────────────────────────────────────────

/// Partial update accepted by
/// [`crate::manager::ClientManager::update_client`].
///
/// Nullable attributes are double options: `None` leaves the field untouched,
/// `Some(None)` clears it, `Some(Some(v))` sets it. When deserialised, an
/// absent key maps to `None` and an explicit `null` to `Some(None)`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateClient {
  #[serde(default)]
  pub name:            Option<String>,
  #[serde(default)]
  pub email:           Option<String>,
  #[serde(default, deserialize_with = "double_option")]
  pub phone:           Option<Option<String>>,
  #[serde(default)]
  pub tax_id:          Option<String>,
  #[serde(default)]
  pub status:          Option<ClientStatus>,
  #[serde(default, deserialize_with = "double_option")]
  pub marital_status:  Option<Option<MaritalStatus>>,
  #[serde(default, deserialize_with = "double_option")]
  pub property_regime: Option<Option<PropertyRegime>>,
  #[serde(default, deserialize_with = "double_option")]
  pub wedding_date:    Option<Option<NaiveDate>>,
  #[serde(default, deserialize_with = "double_option")]
  pub father_name:     Option<Option<String>>,
  #[serde(default, deserialize_with = "double_option")]
  pub mother_name:     Option<Option<String>>,
  /// Requested spouse. Only acted on when it differs from the current one.
  #[serde(default)]
  pub spouse_id:       Option<Uuid>,
  /// Control flag: break the current spouse link. Never persisted.
  #[serde(default)]
  pub remove_spouse:   bool,
}

impl UpdateClient {
  /// Reject required fields that are being set to a blank value.
  pub fn validate(&self) -> Result<()> {
    for (field, value) in [
      ("name", &self.name),
      ("email", &self.email),
      ("tax_id", &self.tax_id),
    ] {
      if let Some(v) = value {
        require(field, v)?;
      }
    }
    Ok(())
  }

  /// True if the update carries any of the fields shared by a couple.
  pub fn touches_marital_metadata(&self) -> bool {
    self.marital_status.is_some()
      || self.property_regime.is_some()
      || self.wedding_date.is_some()
  }

  /// The plain field changes, without any spouse link change.
  pub(crate) fn field_patch(&self) -> ClientPatch {
    ClientPatch {
      name:            self.name.clone(),
      email:           self.email.clone(),
      phone:           self.phone.clone(),
      tax_id:          self.tax_id.clone(),
      status:          self.status,
      marital_status:  self.marital_status,
      property_regime: self.property_regime,
      spouse_id:       None,
      wedding_date:    self.wedding_date,
      father_name:     self.father_name.clone(),
      mother_name:     self.mother_name.clone(),
    }
  }
}

fn double_option<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Option::<T>::deserialize(de).map(Some)
}

// ─── ClientPatch ─────────────────────────────────────────────────────────────

/// A single-record patch as applied by a [`crate::store::ClientStore`].
///
/// Same double-option convention as [`UpdateClient`]. The spouse link can
/// only be set from inside this crate; stores read it through
/// [`ClientPatch::spouse_id`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientPatch {
  pub name:            Option<String>,
  pub email:           Option<String>,
  pub phone:           Option<Option<String>>,
  pub tax_id:          Option<String>,
  pub status:          Option<ClientStatus>,
  pub marital_status:  Option<Option<MaritalStatus>>,
  pub property_regime: Option<Option<PropertyRegime>>,
  pub(crate) spouse_id: Option<Option<Uuid>>,
  pub wedding_date:    Option<Option<NaiveDate>>,
  pub father_name:     Option<Option<String>>,
  pub mother_name:     Option<Option<String>>,
}

impl ClientPatch {
  /// The spouse link change carried by this patch, if any.
  pub fn spouse_id(&self) -> Option<Option<Uuid>> { self.spouse_id }

  /// A patch that only breaks the spouse link.
  pub(crate) fn clear_spouse() -> Self {
    Self { spouse_id: Some(None), ..Self::default() }
  }

  /// A patch that only sets the status; used for soft deletion.
  pub fn status(status: ClientStatus) -> Self {
    Self { status: Some(status), ..Self::default() }
  }

  /// Apply every set field to `client`. `updated_at` is left to the store.
  pub fn apply_to(&self, client: &mut Client) {
    if let Some(v) = &self.name {
      client.name = v.clone();
    }
    if let Some(v) = &self.email {
      client.email = v.clone();
    }
    if let Some(v) = &self.phone {
      client.phone = v.clone();
    }
    if let Some(v) = &self.tax_id {
      client.tax_id = v.clone();
    }
    if let Some(v) = self.status {
      client.status = v;
    }
    if let Some(v) = self.marital_status {
      client.marital_status = v;
    }
    if let Some(v) = self.property_regime {
      client.property_regime = v;
    }
    if let Some(v) = self.spouse_id {
      client.spouse_id = v;
    }
    if let Some(v) = self.wedding_date {
      client.wedding_date = v;
    }
    if let Some(v) = &self.father_name {
      client.father_name = v.clone();
    }
    if let Some(v) = &self.mother_name {
      client.mother_name = v.clone();
    }
  }
}

// ─── Query support ───────────────────────────────────────────────────────────

impl Queryable for Client {
  fn field(&self, name: &str) -> Option<FieldValue<'_>> {
    match name {
      "name" => Some(FieldValue::Text(&self.name)),
      "email" => Some(FieldValue::Text(&self.email)),
      "phone" => self.phone.as_deref().map(FieldValue::Text),
      "tax_id" => Some(FieldValue::Text(&self.tax_id)),
      "status" => Some(FieldValue::Text(self.status.into())),
      "marital_status" => self.marital_status.map(|m| FieldValue::Text(m.into())),
      "property_regime" => self.property_regime.map(|p| FieldValue::Text(p.into())),
      "father_name" => self.father_name.as_deref().map(FieldValue::Text),
      "mother_name" => self.mother_name.as_deref().map(FieldValue::Text),
      "wedding_date" => self
        .wedding_date
        .map(|d| FieldValue::Number(f64::from(d.num_days_from_ce()))),
      "created_at" => Some(FieldValue::Number(self.created_at.timestamp_millis() as f64)),
      "updated_at" => Some(FieldValue::Number(self.updated_at.timestamp_millis() as f64)),
      _ => None,
    }
  }
}
