//! Shared operation wrappers for all interfaces (CLI, plugin).
//!
//! Each `op_*` function is a synchronous wrapper around one or more `algo`
//! modules. Input and output are `serde_json::Value`, with no dependency on
//! clap or nu-plugin.
//!
//! When the `store` feature is enabled, the bookmark and visitor operations
//! open a SQLite store at the given path.

use serde_json::{json, Value};

use crate::algo::catalog::Catalog;
use crate::algo::export::{export_case, ExportOptions};
use crate::algo::facets::build_facets;
use crate::algo::filter::{apply_filters, FilterState, SavedSet};
use crate::algo::header::{normalize_header, CanonicalKey};
use crate::algo::record::{coerce_severity, split_sources, CaseRecord};
use crate::error::{ArchiveError, Result};

#[cfg(feature = "store")]
use crate::algo::{
    saved::{toggle_saved, ArchiveStore},
    storage::SqliteStore,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

const RECORD_KEYS: &[CanonicalKey] = &[
    CanonicalKey::Image,
    CanonicalKey::Title,
    CanonicalKey::SubjectName,
    CanonicalKey::Summary,
    CanonicalKey::DateOfIncident,
    CanonicalKey::District,
    CanonicalKey::OtherLocation,
    CanonicalKey::CrimeType,
    CanonicalKey::Status,
    CanonicalKey::Severity,
    CanonicalKey::Sources,
];

fn is_record_key(key: &str) -> bool {
    RECORD_KEYS.iter().any(|k| k.as_str() == key)
}

/// Rewrite an object row onto record field names.
///
/// Snake-case field names are kept as they are. Any other key goes through
/// the header rules, so a row parsed from a sheet (`Title`, `Date of
/// Incident`) lines up with the record. A string severity or source list
/// under such a key is coerced the way ingest does it. A field name beats
/// a mapped header, and the first mapped header for a field wins. A row
/// where no key resolves to a field is rejected.
fn normalize_row(index: usize, row: &Value) -> Result<Value> {
    let Value::Object(map) = row else {
        return Ok(row.clone());
    };

    let mut out = serde_json::Map::new();
    for (key, value) in map.iter().filter(|(k, _)| is_record_key(k)) {
        out.insert(key.clone(), value.clone());
    }
    for (key, value) in map.iter().filter(|(k, _)| !is_record_key(k)) {
        let Some(canonical) = normalize_header(key) else {
            continue;
        };
        let value = match (canonical, value) {
            (CanonicalKey::Severity, Value::String(s)) => json!(coerce_severity(s)),
            (CanonicalKey::Sources, Value::String(s)) => json!(split_sources(s)),
            _ => value.clone(),
        };
        out.entry(canonical.as_str()).or_insert(value);
    }

    if out.is_empty() {
        return Err(ArchiveError::InvalidInput(format!(
            "row {index}: no recognizable case fields"
        )));
    }
    Ok(Value::Object(out))
}

fn record_from_row(index: usize, row: &Value) -> Result<CaseRecord> {
    serde_json::from_value(normalize_row(index, row)?)
        .map_err(|e| ArchiveError::InvalidInput(format!("row {index}: {e}")))
}

/// Deserialize JSON rows into records. Missing keys take record defaults.
/// Keys that are neither field names nor recognizable headers (such as
/// `_id`) are ignored.
pub fn records_from_rows(rows: &[Value]) -> Result<Vec<CaseRecord>> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| record_from_row(i, row))
        .collect()
}

fn records_to_value<'a>(records: impl IntoIterator<Item = &'a CaseRecord>) -> Result<Value> {
    let rows = records
        .into_iter()
        .map(serde_json::to_value)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(Value::Array(rows))
}

// ── Catalog operations ──────────────────────────────────────────────────────

/// Parse table text into records plus an ingest report.
pub fn op_ingest(text: &str) -> Result<Value> {
    let (catalog, report) = Catalog::ingest(text);
    Ok(json!({
        "records": records_to_value(&catalog)?,
        "report": serde_json::to_value(&report)?,
    }))
}

/// The built-in sample dataset as rows.
pub fn op_sample() -> Result<Value> {
    records_to_value(&Catalog::sample())
}

pub fn op_filter(rows: &[Value], state: &FilterState, saved: &SavedSet) -> Result<Value> {
    let records = records_from_rows(rows)?;
    let matched = apply_filters(&records, state, saved);
    tracing::debug!(total = records.len(), matched = matched.len(), "filtered");
    records_to_value(matched)
}

pub fn op_facets(rows: &[Value]) -> Result<Value> {
    let records = records_from_rows(rows)?;
    Ok(serde_json::to_value(build_facets(&records))?)
}

/// Each input row with its case identifier appended as `_id`.
pub fn op_case_ids(rows: &[Value]) -> Result<Value> {
    let records = records_from_rows(rows)?;
    let out = rows
        .iter()
        .zip(&records)
        .map(|(row, record)| {
            let mut row = row.clone();
            if let Value::Object(map) = &mut row {
                map.insert("_id".into(), Value::String(record.case_id()));
            }
            row
        })
        .collect();
    Ok(Value::Array(out))
}

pub fn op_export(row: &Value, options: &ExportOptions) -> Result<Value> {
    let record = record_from_row(0, row)?;
    let doc = export_case(&record, options);
    Ok(json!({
        "file_name": doc.file_name,
        "page_count": doc.page_count(),
        "text": doc.render(),
    }))
}

// ── Store operations ────────────────────────────────────────────────────────

/// Load bookmarks from a store, or an empty set when none is given.
pub fn load_saved(store_path: Option<&str>) -> Result<SavedSet> {
    #[cfg(feature = "store")]
    {
        if let Some(path) = store_path {
            return SqliteStore::open_or_create(path)?.load_saved_ids();
        }
    }

    #[cfg(not(feature = "store"))]
    {
        if store_path.is_some() {
            return Err(ArchiveError::Config(
                "Store feature not enabled. Build with --features store".into(),
            ));
        }
    }

    Ok(SavedSet::new())
}

#[cfg(feature = "store")]
pub fn op_saved_list(store_path: &str) -> Result<Value> {
    let ids = SqliteStore::open_or_create(store_path)?.load_saved_ids()?;
    Ok(json!({
        "path": store_path,
        "total": ids.len(),
        "ids": ids,
    }))
}

#[cfg(feature = "store")]
pub fn op_saved_toggle(store_path: &str, id: &str) -> Result<Value> {
    let mut store = SqliteStore::open_or_create(store_path)?;
    let saved = toggle_saved(&mut store, id)?;
    Ok(json!({ "id": id, "saved": saved }))
}

/// Force a bookmark on or off.
#[cfg(feature = "store")]
pub fn op_saved_set(store_path: &str, id: &str, saved: bool) -> Result<Value> {
    let mut store = SqliteStore::open_or_create(store_path)?;
    let mut ids = store.load_saved_ids()?;
    let changed = if saved {
        ids.insert(id.to_string())
    } else {
        ids.remove(id)
    };
    if changed {
        store.save_saved_ids(&ids)?;
    }
    Ok(json!({ "id": id, "saved": saved, "changed": changed }))
}

#[cfg(feature = "store")]
pub fn op_visits(store_path: &str, increment: bool) -> Result<Value> {
    let mut store = SqliteStore::open_or_create(store_path)?;
    let count = if increment {
        store.increment_visitor_count()?
    } else {
        store.load_visitor_count()?
    };
    Ok(json!({
        "visitors": count,
        "warning_accepted": store.warning_accepted()?,
    }))
}

#[cfg(feature = "store")]
pub fn op_accept_warning(store_path: &str) -> Result<Value> {
    let mut store = SqliteStore::open_or_create(store_path)?;
    let count = store.accept_warning()?;
    Ok(json!({
        "visitors": count,
        "warning_accepted": true,
    }))
}
