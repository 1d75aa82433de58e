//! Case records and the row → record builder.
//!
//! A [`CaseRecord`] is built once from a parsed row and never edited
//! afterwards; the catalog hands out shared references only.

use serde::{Deserialize, Serialize};

use super::dates::UNKNOWN_DATE;
use super::header::{CanonicalKey, HeaderMap};

pub const PLACEHOLDER_IMAGE: &str =
    "https://via.placeholder.com/600x400/8B0000/FFFFFF?text=No+Image+Available";
pub const UNTITLED_CASE: &str = "Untitled Case";
pub const NO_SUMMARY: &str = "No summary available.";
pub const UNKNOWN: &str = "Unknown";
pub const DEFAULT_STATUS: &str = "reported";
pub const DEFAULT_SEVERITY: i64 = 1;

/// One normalized case entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseRecord {
    pub image: String,
    pub title: String,
    pub subject_name: Option<String>,
    pub summary: String,
    pub date_of_incident: String,
    pub district: String,
    pub other_location: String,
    pub crime_type: String,
    pub status: String,
    /// Nominally 1–5, never clamped.
    pub severity: i64,
    pub sources: Vec<String>,
}

impl Default for CaseRecord {
    fn default() -> Self {
        Self {
            image: PLACEHOLDER_IMAGE.into(),
            title: UNTITLED_CASE.into(),
            subject_name: None,
            summary: NO_SUMMARY.into(),
            date_of_incident: UNKNOWN_DATE.into(),
            district: UNKNOWN.into(),
            other_location: String::new(),
            crime_type: UNKNOWN.into(),
            status: DEFAULT_STATUS.into(),
            severity: DEFAULT_SEVERITY,
            sources: Vec::new(),
        }
    }
}

impl CaseRecord {
    /// Stable identifier used for bookmarks.
    pub fn case_id(&self) -> String {
        generate_case_id(&self.title, &self.date_of_incident)
    }
}

/// Derive a case identifier from title and incident date.
///
/// The two parts are concatenated and every character outside
/// `[A-Za-z0-9-]` is stripped, so `("A Case!", "2020-01-01")` gives
/// `"ACase2020-01-01"`. Distinct records can collide after stripping.
pub fn generate_case_id(title: &str, date_of_incident: &str) -> String {
    title
        .chars()
        .chain(date_of_incident.chars())
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect()
}

/// Fall back to `default` when the cell is empty.
pub fn text_or(raw: &str, default: &str) -> String {
    if raw.is_empty() {
        default.to_string()
    } else {
        raw.to_string()
    }
}

/// `None` for an empty cell.
pub fn optional_text(raw: &str) -> Option<String> {
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Read a severity from the leading integer of the cell.
///
/// An optional sign followed by digits is taken (`"4 (high)"` → 4). No
/// digits, overflow, or a value of zero fall back to [`DEFAULT_SEVERITY`].
pub fn coerce_severity(raw: &str) -> i64 {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    match digits[..end].parse::<i64>() {
        Ok(0) | Err(_) => DEFAULT_SEVERITY,
        Ok(n) if negative => -n,
        Ok(n) => n,
    }
}

/// Split a `;`-delimited source list, trimming parts and dropping empty ones.
pub fn split_sources(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Build one record from a row.
///
/// Each mapped column whose index exists in `values` overrides the matching
/// default; when several columns map to the same key the rightmost wins.
/// The row is discarded (`None`) unless some title-mapped column had a
/// value in this row. An empty title cell still counts and yields
/// [`UNTITLED_CASE`].
pub fn build_record(headers: &HeaderMap, values: &[String]) -> Option<CaseRecord> {
    let mut record = CaseRecord::default();
    let mut has_title = false;

    for (index, key) in headers.mapped() {
        let Some(raw) = values.get(index) else {
            continue;
        };
        let raw = raw.as_str();
        match key {
            CanonicalKey::Image => record.image = text_or(raw, PLACEHOLDER_IMAGE),
            CanonicalKey::Title => {
                record.title = text_or(raw, UNTITLED_CASE);
                has_title = true;
            }
            CanonicalKey::SubjectName => record.subject_name = optional_text(raw),
            CanonicalKey::Summary => record.summary = text_or(raw, NO_SUMMARY),
            CanonicalKey::DateOfIncident => record.date_of_incident = text_or(raw, UNKNOWN_DATE),
            CanonicalKey::District => record.district = text_or(raw, UNKNOWN),
            CanonicalKey::OtherLocation => record.other_location = raw.to_string(),
            CanonicalKey::CrimeType => record.crime_type = text_or(raw, UNKNOWN),
            CanonicalKey::Status => record.status = text_or(raw, DEFAULT_STATUS),
            CanonicalKey::Severity => record.severity = coerce_severity(raw),
            CanonicalKey::Sources => record.sources = split_sources(raw),
        }
    }

    has_title.then_some(record)
}
