//! Facet index: the distinct values that populate filter choices.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use super::dates::incident_year;
use super::record::CaseRecord;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facets {
    /// Distinct crime types, first-occurrence order.
    pub crime_types: Vec<String>,
    /// Distinct districts, first-occurrence order.
    pub districts: Vec<String>,
    /// Distinct statuses, first-occurrence order.
    pub statuses: Vec<String>,
    /// Distinct valid incident years, most recent first.
    pub years: Vec<i32>,
}

/// Collect distinct values in first-occurrence order.
fn ordered_distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

pub fn build_facets<'a, I>(records: I) -> Facets
where
    I: IntoIterator<Item = &'a CaseRecord>,
    I::IntoIter: Clone,
{
    let records = records.into_iter();
    let years: BTreeSet<i32> = records
        .clone()
        .filter_map(|r| incident_year(&r.date_of_incident))
        .collect();

    Facets {
        crime_types: ordered_distinct(records.clone().map(|r| r.crime_type.as_str())),
        districts: ordered_distinct(records.clone().map(|r| r.district.as_str())),
        statuses: ordered_distinct(records.map(|r| r.status.as_str())),
        years: years.into_iter().rev().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(date: &str, crime: &str, district: &str, status: &str) -> CaseRecord {
        CaseRecord {
            date_of_incident: date.into(),
            crime_type: crime.into(),
            district: district.into(),
            status: status.into(),
            ..CaseRecord::default()
        }
    }

    #[test]
    fn years_descending_without_unknown() {
        let records = vec![
            rec("2020-03-10", "a", "x", "s"),
            rec("2018-05-15", "a", "x", "s"),
            rec("Unknown", "a", "x", "s"),
        ];
        assert_eq!(build_facets(&records).years, vec![2020, 2018]);
    }

    #[test]
    fn duplicate_years_collapse() {
        let records = vec![
            rec("2018-01-01", "a", "x", "s"),
            rec("2021-06-30", "a", "x", "s"),
            rec("2018-12-31", "a", "x", "s"),
            rec("not a date", "a", "x", "s"),
        ];
        assert_eq!(build_facets(&records).years, vec![2021, 2018]);
    }

    #[test]
    fn categories_keep_first_occurrence_order() {
        let records = vec![
            rec("2020", "terrorism", "Dhaka", "convicted"),
            rec("2020", "murder", "Sylhet", "reported"),
            rec("2020", "terrorism", "Chittagong", "convicted"),
            rec("2020", "cyber_crime", "Dhaka", "charged"),
        ];
        let facets = build_facets(&records);
        assert_eq!(facets.crime_types, vec!["terrorism", "murder", "cyber_crime"]);
        assert_eq!(facets.districts, vec!["Dhaka", "Sylhet", "Chittagong"]);
        assert_eq!(facets.statuses, vec!["convicted", "reported", "charged"]);
    }

    #[test]
    fn empty_catalog_has_empty_facets() {
        let records: Vec<CaseRecord> = Vec::new();
        assert_eq!(build_facets(&records), Facets::default());
    }
}
