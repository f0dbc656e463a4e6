//! Collection-agnostic search, sort and pagination.
//!
//! Records expose their fields by name through [`Queryable`]; none of these
//! helpers know anything about clients.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::duplicates::digits_only;

// ─── Field access ────────────────────────────────────────────────────────────

/// A field value as seen by the query helpers.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
  Text(&'a str),
  Number(f64),
}

/// A record whose fields can be looked up by name.
pub trait Queryable {
  /// `None` when the field is unknown or unset.
  fn field(&self, name: &str) -> Option<FieldValue<'_>>;
}

// ─── Search ──────────────────────────────────────────────────────────────────

/// Keep the items matching `term`.
///
/// An item matches if any `text_fields` value contains the term,
/// case-insensitively. When the term contains digits, an item also matches if
/// the digits of any `digit_fields` value contain the term's digits, so
/// `"98765-4321"` finds `"(11) 987654321"`. A blank term matches everything.
pub fn search<T: Queryable>(
  items: Vec<T>,
  term: &str,
  text_fields: &[&str],
  digit_fields: &[&str],
) -> Vec<T> {
  let needle = term.trim().to_lowercase();
  if needle.is_empty() {
    return items;
  }
  let needle_digits = digits_only(&needle);

  items
    .into_iter()
    .filter(|item| {
      let text_hit = text_fields.iter().any(|f| match item.field(f) {
        Some(FieldValue::Text(v)) => v.to_lowercase().contains(&needle),
        _ => false,
      });
      text_hit
        || (!needle_digits.is_empty()
          && digit_fields.iter().any(|f| match item.field(f) {
            Some(FieldValue::Text(v)) => digits_only(v).contains(&needle_digits),
            _ => false,
          }))
    })
    .collect()
}

// ─── Sort ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
  #[default]
  Asc,
  Desc,
}

/// Stable sort by one named field.
///
/// Strings compare case-insensitively first, numbers numerically. When one
/// field holds both kinds, numbers rank before strings. Missing values go
/// last in both directions.
pub fn sort_by_field<T: Queryable>(items: &mut [T], field: &str, direction: SortDirection) {
  items.sort_by(|a, b| match (a.field(field), b.field(field)) {
    (None, None) => Ordering::Equal,
    (None, Some(_)) => Ordering::Greater,
    (Some(_), None) => Ordering::Less,
    (Some(x), Some(y)) => {
      let ord = compare_values(&x, &y);
      match direction {
        SortDirection::Asc => ord,
        SortDirection::Desc => ord.reverse(),
      }
    }
  });
}

fn compare_values(a: &FieldValue<'_>, b: &FieldValue<'_>) -> Ordering {
  match (a, b) {
    (FieldValue::Text(x), FieldValue::Text(y)) => x
      .to_lowercase()
      .cmp(&y.to_lowercase())
      .then_with(|| x.cmp(y)),
    // `total_cmp` keeps NaN ordered so the comparator stays a total order.
    (FieldValue::Number(x), FieldValue::Number(y)) => x.total_cmp(y),
    (FieldValue::Number(_), FieldValue::Text(_)) => Ordering::Less,
    (FieldValue::Text(_), FieldValue::Number(_)) => Ordering::Greater,
  }
}

// ─── Paginate ────────────────────────────────────────────────────────────────

/// One page of a larger result set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
  pub items:       Vec<T>,
  /// Number of items before slicing.
  pub total:       usize,
  /// 1-indexed.
  pub page:        usize,
  pub page_size:   usize,
  pub total_pages: usize,
}

/// Slice out page `page` (1-indexed) of `page_size` items.
///
/// Both arguments are clamped to at least 1. A page past the end is empty
/// but still reports the real totals.
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> Page<T> {
  let page = page.max(1);
  let page_size = page_size.max(1);
  let total = items.len();
  let total_pages = total.div_ceil(page_size);

  let items = items
    .into_iter()
    .skip((page - 1).saturating_mul(page_size))
    .take(page_size)
    .collect();

  Page { items, total, page, page_size, total_pages }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Debug, Clone, PartialEq)]
  struct Row {
    name:  Option<&'static str>,
    phone: Option<&'static str>,
    rank:  Option<f64>,
  }

  impl Queryable for Row {
    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
      match name {
        "name" => self.name.map(FieldValue::Text),
        "phone" => self.phone.map(FieldValue::Text),
        "rank" => self.rank.map(FieldValue::Number),
        // Deliberately mixed: text for some rows, number for others.
        "mixed" => match (self.name, self.rank) {
          (Some(n), None) => Some(FieldValue::Text(n)),
          (_, Some(r)) => Some(FieldValue::Number(r)),
          _ => None,
        },
        _ => None,
      }
    }
  }

  fn row(name: Option<&'static str>, phone: Option<&'static str>, rank: Option<f64>) -> Row {
    Row { name, phone, rank }
  }

  fn names(rows: &[Row]) -> Vec<Option<&'static str>> {
    rows.iter().map(|r| r.name).collect()
  }

  #[test]
  fn search_is_case_insensitive_substring() {
    let rows = vec![
      row(Some("Maria Silva"), None, None),
      row(Some("João Souza"), None, None),
    ];
    let hits = search(rows, "SILVA", &["name"], &[]);
    assert_eq!(names(&hits), vec![Some("Maria Silva")]);
  }

  #[test]
  fn search_matches_digits_ignoring_formatting() {
    let rows = vec![
      row(Some("Ana"), Some("(11) 98765-4321"), None),
      row(Some("Bia"), Some("21 3333-0000"), None),
    ];
    let hits = search(rows, "98765 4321", &["name"], &["phone"]);
    assert_eq!(names(&hits), vec![Some("Ana")]);
  }

  #[test]
  fn blank_search_keeps_everything() {
    let rows = vec![row(Some("a"), None, None), row(None, None, None)];
    assert_eq!(search(rows, "   ", &["name"], &[]).len(), 2);
  }

  #[test]
  fn sort_puts_missing_last_in_both_directions() {
    let mut rows = vec![
      row(Some("bruno"), None, None),
      row(None, None, None),
      row(Some("Ana"), None, None),
    ];

    sort_by_field(&mut rows, "name", SortDirection::Asc);
    assert_eq!(names(&rows), vec![Some("Ana"), Some("bruno"), None]);

    sort_by_field(&mut rows, "name", SortDirection::Desc);
    assert_eq!(names(&rows), vec![Some("bruno"), Some("Ana"), None]);
  }

  #[test]
  fn sort_numbers_numerically() {
    let mut rows = vec![
      row(Some("ten"), None, Some(10.0)),
      row(Some("two"), None, Some(2.0)),
      row(Some("none"), None, None),
    ];
    sort_by_field(&mut rows, "rank", SortDirection::Asc);
    assert_eq!(names(&rows), vec![Some("two"), Some("ten"), Some("none")]);
  }

  #[test]
  fn mixed_kinds_rank_numbers_before_text() {
    let mut rows = vec![
      row(Some("zeta"), None, None),
      row(Some("alpha"), None, Some(1.0)),
      row(Some("beta"), None, None),
    ];
    sort_by_field(&mut rows, "mixed", SortDirection::Asc);
    assert_eq!(names(&rows), vec![Some("alpha"), Some("beta"), Some("zeta")]);

    sort_by_field(&mut rows, "mixed", SortDirection::Desc);
    assert_eq!(names(&rows), vec![Some("zeta"), Some("beta"), Some("alpha")]);
  }

  #[test]
  fn large_mixed_input_with_nan_sorts_consistently() {
    const NAMES: [&str; 4] = ["delta", "Alpha", "charlie", "bravo"];
    let mut rows: Vec<Row> = (0..500)
      .map(|i| match i % 5 {
        0 => row(Some(NAMES[i % 4]), None, None),
        1 => row(Some("n"), None, Some(f64::NAN)),
        2 => row(None, None, None),
        _ => row(Some("n"), None, Some((i % 37) as f64)),
      })
      .collect();

    sort_by_field(&mut rows, "mixed", SortDirection::Asc);

    let kinds: Vec<u8> = rows
      .iter()
      .map(|r| match r.field("mixed") {
        Some(FieldValue::Number(n)) if n.is_nan() => 1,
        Some(FieldValue::Number(_)) => 0,
        Some(FieldValue::Text(_)) => 2,
        None => 3,
      })
      .collect();
    assert!(kinds.windows(2).all(|w| w[0] <= w[1]));

    let numbers: Vec<f64> = rows.iter().filter_map(|r| r.rank).filter(|n| !n.is_nan()).collect();
    assert!(numbers.windows(2).all(|w| w[0] <= w[1]));
  }

  #[test]
  fn paginate_slices_and_counts() {
    let page = paginate((1..=7).collect::<Vec<_>>(), 2, 3);
    assert_eq!(page.items, vec![4, 5, 6]);
    assert_eq!(page.total, 7);
    assert_eq!(page.total_pages, 3);

    let last = paginate((1..=7).collect::<Vec<_>>(), 3, 3);
    assert_eq!(last.items, vec![7]);
  }

  #[test]
  fn paginate_out_of_range_and_degenerate_input() {
    let page = paginate(vec![1, 2], 5, 10);
    assert!(page.items.is_empty());
    assert_eq!(page.total_pages, 1);

    let page = paginate(vec![1, 2], 0, 0);
    assert_eq!(page.page, 1);
    assert_eq!(page.page_size, 1);
    assert_eq!(page.items, vec![1]);

    let empty = paginate(Vec::<u8>::new(), 1, 20);
    assert_eq!(empty.total_pages, 0);
  }
}
