//! Spouse-link planning.
//!
//! Given the records involved in a create or update, these functions compute
//! the ordered list of single-record patches that keep `spouse_id` symmetric.
//! They never touch a store; [`crate::manager::ClientManager`] loads the
//! records, calls a planner, and applies the result in order.
//!
//! Ordering: every stale link is cleared before the new link is written, and
//! the acting client's own patch is always applied last. Marital metadata is
//! always taken from the acting client (explicit update values first, then
//! its stored values), never from the spouse.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::client::{Client, ClientPatch, MaritalStatus, PropertyRegime, UpdateClient};

/// One patch against one record.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedPatch {
  pub client_id: Uuid,
  pub patch:     ClientPatch,
}

impl PlannedPatch {
  fn clear_spouse(client_id: Uuid) -> Self {
    Self { client_id, patch: ClientPatch::clear_spouse() }
  }
}

/// The outcome of [`plan_update`].
#[derive(Debug, Clone, PartialEq)]
pub struct UpdatePlan {
  /// Patches on other clients, in application order.
  pub spouse_patches: Vec<PlannedPatch>,
  /// The acting client's own patch, applied after `spouse_patches`.
  pub client_patch:   ClientPatch,
}

/// The marital fields a couple shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SharedMetadata {
  marital_status:  Option<MaritalStatus>,
  property_regime: Option<PropertyRegime>,
  wedding_date:    Option<NaiveDate>,
}

impl SharedMetadata {
  fn resolve(client: &Client, update: &UpdateClient) -> Self {
    Self {
      marital_status:  update.marital_status.unwrap_or(client.marital_status),
      property_regime: update.property_regime.unwrap_or(client.property_regime),
      wedding_date:    update.wedding_date.unwrap_or(client.wedding_date),
    }
  }

  fn into_patch(self) -> ClientPatch {
    ClientPatch {
      marital_status: Some(self.marital_status),
      property_regime: Some(self.property_regime),
      wedding_date: Some(self.wedding_date),
      ..ClientPatch::default()
    }
  }
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// Plan the spouse-side patches after `client` has been inserted.
///
/// `spouse` is the record `client.spouse_id` points at, or `None` if it does
/// not resolve (then nothing is planned and the link is left as given).
pub fn plan_create(client: &Client, spouse: Option<&Client>) -> Vec<PlannedPatch> {
  let (Some(_), Some(spouse)) = (client.spouse_id, spouse) else {
    return Vec::new();
  };

  let mut plan = Vec::with_capacity(2);
  if let Some(stale) = spouse.spouse_id.filter(|id| *id != client.client_id) {
    plan.push(PlannedPatch::clear_spouse(stale));
  }
  plan.push(PlannedPatch {
    client_id: spouse.client_id,
    patch:     ClientPatch {
      spouse_id: Some(Some(client.client_id)),
      marital_status: Some(client.marital_status),
      property_regime: Some(client.property_regime),
      ..ClientPatch::default()
    },
  });
  plan
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// The spouse an update assigns, if it assigns one.
///
/// `Some` only when the update names a spouse different from the current one
/// and is not a spouse removal. Callers load this record and pass it to
/// [`plan_update`].
pub fn requested_spouse(client: &Client, update: &UpdateClient) -> Option<Uuid> {
  if removes_spouse(client, update) {
    return None;
  }
  update.spouse_id.filter(|id| Some(*id) != client.spouse_id)
}

fn removes_spouse(client: &Client, update: &UpdateClient) -> bool {
  update.remove_spouse && client.spouse_id.is_some()
}

/// Plan an update of `client`.
///
/// `new_spouse` is the loaded record for [`requested_spouse`], or `None` if
/// there is no such request or the id does not resolve.
///
/// Exactly one branch applies, checked in this order:
/// 1. removal: clear the current spouse's link and the client's own;
/// 2. reassignment: clear the old spouse, clear whoever the new spouse was
///    linked to, then link the new spouse back with the shared metadata;
/// 3. synchronisation: same spouse, but the update changes shared metadata,
///    which is pushed onto the spouse.
pub fn plan_update(
  client: &Client,
  update: &UpdateClient,
  new_spouse: Option<&Client>,
) -> UpdatePlan {
  let mut spouse_patches = Vec::new();
  let mut client_patch = update.field_patch();

  if removes_spouse(client, update) {
    if let Some(current) = client.spouse_id {
      spouse_patches.push(PlannedPatch::clear_spouse(current));
    }
    client_patch.spouse_id = Some(None);
  } else if let Some(new_id) = requested_spouse(client, update) {
    if let Some(old) = client.spouse_id {
      spouse_patches.push(PlannedPatch::clear_spouse(old));
    }
    if let Some(spouse) = new_spouse.filter(|s| s.client_id == new_id) {
      if let Some(third) = spouse
        .spouse_id
        .filter(|id| *id != client.client_id && *id != new_id)
      {
        spouse_patches.push(PlannedPatch::clear_spouse(third));
      }
      let mut link = SharedMetadata::resolve(client, update).into_patch();
      link.spouse_id = Some(Some(client.client_id));
      spouse_patches.push(PlannedPatch { client_id: new_id, patch: link });
    }
    client_patch.spouse_id = Some(Some(new_id));
  } else if let Some(current) = client.spouse_id
    && update.touches_marital_metadata()
  {
    spouse_patches.push(PlannedPatch {
      client_id: current,
      patch:     SharedMetadata::resolve(client, update).into_patch(),
    });
  }

  UpdatePlan { spouse_patches, client_patch }
}
