//! Search → filter → sort → paginate over a record snapshot.
//!
//! # Responsibility
//! - Implement the deterministic list transformation behind `list`.
//! - Normalize pagination input so no descriptor can divide by zero.
//!
//! # Invariants
//! - `total` counts records after search+filter, before pagination.
//! - Sorting is stable: equal keys keep their relative snapshot order.
//! - An out-of-range page yields an empty `data` page, not an error.

use crate::model::record::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_PER_PAGE: u32 = 10;

/// Sort direction for the optional sort stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Query descriptor for one `list` call.
///
/// Every field is optional; the empty descriptor lists the first ten records
/// in snapshot order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive substring matched against every scalar field.
    pub search: Option<String>,
    /// Per-field strict-equality filters, ANDed together.
    pub filters: BTreeMap<String, Value>,
    /// Field to order by; `None` keeps snapshot order.
    pub sort: Option<String>,
    pub order: SortOrder,
    /// 1-based page number; `None` or 0 means page 1.
    pub page: Option<u32>,
    /// Page size; `None` or 0 means 10.
    pub per_page: Option<u32>,
}

/// One page of results plus the pre-pagination total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResult {
    pub data: Vec<Record>,
    pub total: usize,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

/// Runs the full pipeline over a snapshot.
///
/// Pure and total: the snapshot is never mutated and no descriptor is
/// rejected. Two calls with the same snapshot and descriptor return the same
/// page.
pub fn run(records: &[Record], query: &ListQuery) -> PageResult {
    let page = normalize(query.page, DEFAULT_PAGE);
    let per_page = normalize(query.per_page, DEFAULT_PER_PAGE);

    let mut hits: Vec<&Record> = records
        .iter()
        .filter(|record| matches_search(record, query.search.as_deref()))
        .filter(|record| matches_filters(record, &query.filters))
        .collect();

    if let Some(sort_field) = query.sort.as_deref() {
        hits.sort_by(|a, b| {
            let ordering = compare_values(a.get(sort_field), b.get(sort_field));
            match query.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
    }

    let total = hits.len();
    let total_pages = (total as u32).div_ceil(per_page);
    let start = (page as usize - 1).saturating_mul(per_page as usize);
    let data = hits
        .into_iter()
        .skip(start)
        .take(per_page as usize)
        .cloned()
        .collect();

    PageResult {
        data,
        total,
        page,
        per_page,
        total_pages,
    }
}

fn normalize(value: Option<u32>, default: u32) -> u32 {
    match value {
        Some(v) if v >= 1 => v,
        _ => default,
    }
}

fn matches_search(record: &Record, search: Option<&str>) -> bool {
    let Some(search) = search else {
        return true;
    };
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    record.iter().any(|(_, value)| {
        searchable_text(value)
            .map(|text| text.to_lowercase().contains(&needle))
            .unwrap_or(false)
    })
}

/// String representation used by the search stage.
///
/// Only scalar values participate; nulls and nested structures never match,
/// so a search for "null" cannot hit an unset field.
fn searchable_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn matches_filters(record: &Record, filters: &BTreeMap<String, Value>) -> bool {
    filters.iter().all(|(field, expected)| {
        // Unset filter widgets submit nulls and empty strings; treat both as
        // "no constraint" rather than matching nothing.
        if expected.is_null() || expected.as_str() == Some("") {
            return true;
        }
        record.get(field) == Some(expected)
    })
}

/// Natural per-type ordering with a fixed rank across types.
///
/// Absent values and nulls sort first, then booleans, numbers, strings;
/// nested values compare equal among themselves so the stable sort preserves
/// their snapshot order.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let rank_a = type_rank(a);
    let rank_b = type_rank(b);
    if rank_a != rank_b {
        return rank_a.cmp(&rank_b);
    }
    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Bool(_)) => 1,
        Some(Value::Number(_)) => 2,
        Some(Value::String(_)) => 3,
        Some(Value::Array(_) | Value::Object(_)) => 4,
    }
}
