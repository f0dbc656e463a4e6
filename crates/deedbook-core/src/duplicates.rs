//! Duplicate detection across the client collection.
//!
//! Names and emails are compared trimmed and lowercased; phones and tax ids
//! are compared on their digits only, so `"111.222.333-44"` matches
//! `"11122233344"`. A field that normalises to nothing never collides.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::client::Client;

/// The identifying fields of a client about to be created or updated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DuplicateCandidate {
  pub name:   String,
  pub email:  String,
  pub phone:  Option<String>,
  pub tax_id: String,
}

/// Which candidate fields collide with some other stored client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DuplicateReport {
  pub name:   bool,
  pub email:  bool,
  pub phone:  bool,
  pub tax_id: bool,
}

impl DuplicateReport {
  pub fn any(&self) -> bool { self.name || self.email || self.phone || self.tax_id }
}

fn normalize_text(s: &str) -> String { s.trim().to_lowercase() }

/// Keep only ASCII digits.
pub fn digits_only(s: &str) -> String {
  s.chars().filter(char::is_ascii_digit).collect()
}

/// Compare `candidate` against every client except `exclude`.
pub fn check_duplicates(
  clients: &[Client],
  candidate: &DuplicateCandidate,
  exclude: Option<Uuid>,
) -> DuplicateReport {
  let name = normalize_text(&candidate.name);
  let email = normalize_text(&candidate.email);
  let phone = candidate.phone.as_deref().map(digits_only).unwrap_or_default();
  let tax_id = digits_only(&candidate.tax_id);

  let mut report = DuplicateReport::default();
  for other in clients.iter().filter(|c| Some(c.client_id) != exclude) {
    report.name |= !name.is_empty() && normalize_text(&other.name) == name;
    report.email |= !email.is_empty() && normalize_text(&other.email) == email;
    report.phone |= !phone.is_empty()
      && other.phone.as_deref().map(digits_only).as_deref() == Some(phone.as_str());
    report.tax_id |= !tax_id.is_empty() && digits_only(&other.tax_id) == tax_id;
  }
  report
}
