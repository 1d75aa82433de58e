//! Filter engine: conjunctive predicates over the catalog.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::dates::{incident_month, incident_year, month_key, parse_incident_date};
use super::record::CaseRecord;

/// Bookmarked case identifiers.
pub type SavedSet = BTreeSet<String>;

/// Active filter values. Unset (`None`, empty string, `false`) predicates
/// pass every record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    /// Case-insensitive substring over title, subject name, and summary.
    pub query: String,
    pub crime_type: Option<String>,
    pub district: Option<String>,
    pub status: Option<String>,
    /// Four-digit year, compared as a string.
    pub year: Option<String>,
    /// Two-digit month (`"01"`..`"12"`), compared as a string.
    pub month: Option<String>,
    /// Inclusive lower bound on the incident date.
    pub date_from: Option<String>,
    /// Inclusive upper bound on the incident date.
    pub date_to: Option<String>,
    pub saved_only: bool,
}

impl FilterState {
    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
            && active(&self.crime_type).is_none()
            && active(&self.district).is_none()
            && active(&self.status).is_none()
            && active(&self.year).is_none()
            && active(&self.month).is_none()
            && active(&self.date_from).is_none()
            && active(&self.date_to).is_none()
            && !self.saved_only
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn parse_bound(name: &str, value: &Option<String>) -> Option<NaiveDate> {
    let raw = active(value)?;
    let parsed = parse_incident_date(raw);
    if parsed.is_none() {
        tracing::warn!(bound = name, value = raw, "ignoring unparseable date bound");
    }
    parsed
}

/// One resolved predicate. Only set predicates are built.
enum Predicate<'a> {
    Saved(&'a SavedSet),
    Text(String),
    CrimeType(&'a str),
    District(&'a str),
    Status(&'a str),
    Year(&'a str),
    Month(&'a str),
    From(NaiveDate),
    To(NaiveDate),
}

impl Predicate<'_> {
    fn test(&self, record: &CaseRecord) -> bool {
        match self {
            Predicate::Saved(saved) => saved.contains(&record.case_id()),
            Predicate::Text(needle) => {
                record.title.to_lowercase().contains(needle.as_str())
                    || record
                        .subject_name
                        .as_deref()
                        .is_some_and(|s| s.to_lowercase().contains(needle.as_str()))
                    || record.summary.to_lowercase().contains(needle.as_str())
            }
            Predicate::CrimeType(v) => record.crime_type == *v,
            Predicate::District(v) => record.district == *v,
            Predicate::Status(v) => record.status == *v,
            Predicate::Year(v) => {
                incident_year(&record.date_of_incident).is_some_and(|y| y.to_string() == *v)
            }
            Predicate::Month(v) => {
                incident_month(&record.date_of_incident).is_some_and(|m| month_key(m) == *v)
            }
            Predicate::From(bound) => {
                parse_incident_date(&record.date_of_incident).is_some_and(|d| d >= *bound)
            }
            Predicate::To(bound) => {
                parse_incident_date(&record.date_of_incident).is_some_and(|d| d <= *bound)
            }
        }
    }
}

fn predicates<'a>(state: &'a FilterState, saved: &'a SavedSet) -> Vec<Predicate<'a>> {
    let mut out = Vec::new();
    if state.saved_only {
        out.push(Predicate::Saved(saved));
    }
    if !state.query.is_empty() {
        out.push(Predicate::Text(state.query.to_lowercase()));
    }
    if let Some(v) = active(&state.crime_type) {
        out.push(Predicate::CrimeType(v));
    }
    if let Some(v) = active(&state.district) {
        out.push(Predicate::District(v));
    }
    if let Some(v) = active(&state.status) {
        out.push(Predicate::Status(v));
    }
    if let Some(v) = active(&state.year) {
        out.push(Predicate::Year(v));
    }
    if let Some(v) = active(&state.month) {
        out.push(Predicate::Month(v));
    }
    if let Some(d) = parse_bound("date_from", &state.date_from) {
        out.push(Predicate::From(d));
    }
    if let Some(d) = parse_bound("date_to", &state.date_to) {
        out.push(Predicate::To(d));
    }
    out
}

/// Records passing every set predicate, in catalog order.
pub fn apply_filters<'r>(
    records: &'r [CaseRecord],
    state: &FilterState,
    saved: &SavedSet,
) -> Vec<&'r CaseRecord> {
    let preds = predicates(state, saved);
    records
        .iter()
        .filter(|r| preds.iter().all(|p| p.test(r)))
        .collect()
}
