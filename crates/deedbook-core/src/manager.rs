//! [`ClientManager`]: the caller-facing client operations.
//!
//! Every operation is a fixed sequence of awaited store calls; no two writes
//! of one operation are ever in flight together. The store only guarantees
//! single-record atomicity, so two concurrent updates touching the same
//! couple may briefly observe an asymmetric pair between sub-steps.

use serde::Deserialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  client::{Client, ClientPatch, ClientStatus, NewClient, UpdateClient},
  duplicates::{DuplicateCandidate, DuplicateReport, check_duplicates},
  query::{Page, SortDirection, paginate, search, sort_by_field},
  relationship::{PlannedPatch, plan_create, plan_update, requested_spouse},
  store::ClientStore,
};

pub const DEFAULT_PAGE_SIZE: usize = 20;

const SEARCH_TEXT_FIELDS: &[&str] = &["name", "email", "tax_id", "father_name", "mother_name"];
const SEARCH_DIGIT_FIELDS: &[&str] = &["phone", "tax_id"];

/// Parameters for [`ClientManager::list_clients`].
#[derive(Debug, Clone, Deserialize)]
pub struct ClientQuery {
  pub search:    Option<String>,
  pub status:    Option<ClientStatus>,
  /// Exact tax id; served from the store's index.
  pub tax_id:    Option<String>,
  /// Field to sort by. Defaults to `name`.
  pub sort:      Option<String>,
  #[serde(default)]
  pub order:     SortDirection,
  #[serde(default = "first_page")]
  pub page:      usize,
  #[serde(default = "default_page_size")]
  pub page_size: usize,
}

impl Default for ClientQuery {
  fn default() -> Self {
    Self {
      search:    None,
      status:    None,
      tax_id:    None,
      sort:      None,
      order:     SortDirection::Asc,
      page:      first_page(),
      page_size: default_page_size(),
    }
  }
}

fn first_page() -> usize { 1 }

fn default_page_size() -> usize { DEFAULT_PAGE_SIZE }

/// Client operations over a borrowed [`ClientStore`].
pub struct ClientManager<'a, S> {
  store: &'a S,
}

impl<'a, S: ClientStore> ClientManager<'a, S> {
  pub fn new(store: &'a S) -> Self { Self { store } }

  /// Fetch one client or fail with [`Error::ClientNotFound`].
  pub async fn get_client(&self, id: Uuid) -> Result<Client> {
    self
      .store
      .get_client(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::ClientNotFound(id))
  }

  /// Insert a client and, if it names a spouse, pair the spouse back.
  pub async fn create_client(&self, input: NewClient) -> Result<Uuid> {
    input.validate()?;

    let client = self.store.insert_client(input).await.map_err(Error::store)?;
    info!(client_id = %client.client_id, "client created");

    let spouse = match client.spouse_id {
      Some(spouse_id) => {
        let spouse = self.store.get_client(spouse_id).await.map_err(Error::store)?;
        if spouse.is_none() {
          warn!(client_id = %client.client_id, %spouse_id, "spouse not found; link not mirrored");
        }
        spouse
      }
      None => None,
    };

    self.apply(plan_create(&client, spouse.as_ref())).await?;
    Ok(client.client_id)
  }

  /// Apply a partial update, repairing spouse links first.
  pub async fn update_client(&self, id: Uuid, update: UpdateClient) -> Result<Uuid> {
    update.validate()?;
    if update.spouse_id == Some(id) {
      return Err(Error::Validation("a client cannot be their own spouse".into()));
    }

    let client = self.get_client(id).await?;
    let new_spouse = match requested_spouse(&client, &update) {
      Some(spouse_id) => self.store.get_client(spouse_id).await.map_err(Error::store)?,
      None => None,
    };

    let plan = plan_update(&client, &update, new_spouse.as_ref());
    self.apply(plan.spouse_patches).await?;

    self
      .store
      .patch_client(id, plan.client_patch)
      .await
      .map_err(Error::store)?
      .ok_or(Error::ClientNotFound(id))?;
    info!(client_id = %id, "client updated");
    Ok(id)
  }

  /// Soft delete: mark the client inactive. The spouse link is kept.
  pub async fn delete_client(&self, id: Uuid) -> Result<Uuid> {
    self
      .store
      .patch_client(id, ClientPatch::status(ClientStatus::Inactive))
      .await
      .map_err(Error::store)?
      .ok_or(Error::ClientNotFound(id))?;
    info!(client_id = %id, "client deactivated");
    Ok(id)
  }

  /// Compare `candidate` against every stored client except `exclude`.
  pub async fn check_duplicates(
    &self,
    candidate: &DuplicateCandidate,
    exclude: Option<Uuid>,
  ) -> Result<DuplicateReport> {
    let clients = self.store.list_clients().await.map_err(Error::store)?;
    Ok(check_duplicates(&clients, candidate, exclude))
  }

  /// Filter, sort and paginate the client collection.
  pub async fn list_clients(&self, query: &ClientQuery) -> Result<Page<Client>> {
    let mut clients = match query.tax_id.as_deref() {
      Some(tax_id) => self.store.find_by_tax_id(tax_id).await,
      None => self.store.list_clients().await,
    }
    .map_err(Error::store)?;

    if let Some(status) = query.status {
      clients.retain(|c| c.status == status);
    }
    if let Some(term) = query.search.as_deref() {
      clients = search(clients, term, SEARCH_TEXT_FIELDS, SEARCH_DIGIT_FIELDS);
    }
    sort_by_field(&mut clients, query.sort.as_deref().unwrap_or("name"), query.order);

    Ok(paginate(clients, query.page, query.page_size))
  }

  /// Apply planned patches in order. A target that no longer resolves is
  /// skipped, not reported.
  async fn apply(&self, patches: Vec<PlannedPatch>) -> Result<()> {
    for PlannedPatch { client_id, patch } in patches {
      let link = patch.spouse_id();
      match self
        .store
        .patch_client(client_id, patch)
        .await
        .map_err(Error::store)?
      {
        Some(_) => debug!(%client_id, ?link, "spouse record repaired"),
        None => warn!(%client_id, "linked client not found; repair skipped"),
      }
    }
    Ok(())
  }
}
