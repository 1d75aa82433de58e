//! The session's record set: ingestion from table text and the fallback
//! sample dataset.

use serde::{Deserialize, Serialize};

use super::header::{CanonicalKey, HeaderMap};
use super::record::{build_record, CaseRecord};
use super::tabular::{parse_table, split_header};
use crate::error::ArchiveError;

/// Ordered, immutable collection of records. Replaced wholesale on reload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    records: Vec<CaseRecord>,
}

/// Where the current catalog came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogOrigin {
    Remote,
    Fallback,
}

/// Result of a load attempt. Loading never fails; it degrades to the sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOutcome {
    pub catalog: Catalog,
    pub origin: CatalogOrigin,
}

/// Counters from one ingest pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    /// Non-blank data rows (header excluded).
    pub rows: usize,
    pub records: usize,
    pub dropped: usize,
    pub unmapped_headers: Vec<String>,
    pub has_title_column: bool,
}

impl Catalog {
    pub fn from_records(records: Vec<CaseRecord>) -> Self {
        Self { records }
    }

    /// Parse table text into a catalog. Row order is preserved.
    pub fn ingest(text: &str) -> (Self, IngestReport) {
        let (header, rows) = split_header(parse_table(text));
        let map = HeaderMap::from_headers(&header);

        let records: Vec<CaseRecord> = rows
            .iter()
            .filter_map(|values| build_record(&map, values))
            .collect();

        let report = IngestReport {
            rows: rows.len(),
            records: records.len(),
            dropped: rows.len() - records.len(),
            unmapped_headers: map
                .unmapped(&header)
                .into_iter()
                .map(str::to_string)
                .collect(),
            has_title_column: map.has_key(CanonicalKey::Title),
        };

        tracing::debug!(
            rows = report.rows,
            records = report.records,
            dropped = report.dropped,
            unmapped = ?report.unmapped_headers,
            "ingested case table"
        );
        if !report.has_title_column && report.rows > 0 {
            tracing::warn!("no column resolved to a title; every row was dropped");
        }

        (Self { records }, report)
    }

    /// Turn a fetch result into a catalog, substituting the sample dataset
    /// when the fetch failed or the text produced no records.
    pub fn from_fetch(result: Result<String, ArchiveError>) -> LoadOutcome {
        match result {
            Ok(text) => {
                let (catalog, report) = Self::ingest(&text);
                if catalog.is_empty() {
                    tracing::warn!(
                        rows = report.rows,
                        "fetched table yielded no records; using sample data"
                    );
                    Self::fallback()
                } else {
                    tracing::info!(records = catalog.len(), "loaded remote case table");
                    LoadOutcome {
                        catalog,
                        origin: CatalogOrigin::Remote,
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "case table fetch failed; using sample data");
                Self::fallback()
            }
        }
    }

    pub fn fallback() -> LoadOutcome {
        LoadOutcome {
            catalog: Self::sample(),
            origin: CatalogOrigin::Fallback,
        }
    }

    /// Built-in sample dataset shown when the published table is unavailable.
    pub fn sample() -> Self {
        let records = vec![
            CaseRecord {
                image: "https://via.placeholder.com/600x400/8B0000/FFFFFF?text=Gulshan+Attack".into(),
                title: "Gulshan Attack Case".into(),
                subject_name: None,
                summary: "Terrorist attack on a cafe in Gulshan that resulted in multiple casualties \
                          including foreigners. This was one of the most devastating terrorist attacks \
                          in Bangladesh's history, with 22 people killed including 17 foreigners. The \
                          attackers were well-educated young men from affluent families, which shocked \
                          the nation."
                    .into(),
                date_of_incident: "2016-07-01".into(),
                district: "Dhaka".into(),
                other_location: "Gulshan, Holey Artisan Bakery".into(),
                crime_type: "terrorism".into(),
                status: "convicted".into(),
                severity: 5,
                sources: vec![
                    "https://example.com/source1".into(),
                    "https://example.com/source2".into(),
                ],
            },
            CaseRecord {
                image: "https://via.placeholder.com/600x400/8B0000/FFFFFF?text=Rajanigandha+Murder"
                    .into(),
                title: "Rajanigandha Murder Case".into(),
                subject_name: Some("Saiful Islam".into()),
                summary: "Brutal murder of a young woman in her apartment in Mirpur. The victim was a \
                          university student who was found dead with multiple stab wounds. The case \
                          gained national attention due to the brutality of the crime and the young \
                          age of both victim and perpetrator."
                    .into(),
                date_of_incident: "2018-05-15".into(),
                district: "Dhaka".into(),
                other_location: "Mirpur, Section 12".into(),
                crime_type: "murder".into(),
                status: "under_trial".into(),
                severity: 4,
                sources: vec!["https://example.com/source3".into()],
            },
            CaseRecord {
                image: "https://via.placeholder.com/600x400/8B0000/FFFFFF?text=Cyber+Crime+Case".into(),
                title: "Digital Financial Fraud Case".into(),
                subject_name: Some("Mohammad Hasan".into()),
                summary: "Large-scale digital financial fraud involving multiple banks and financial \
                          institutions. The perpetrator used sophisticated phishing techniques to gain \
                          access to customer accounts and siphon off funds. The case exposed \
                          vulnerabilities in the country's digital financial infrastructure."
                    .into(),
                date_of_incident: "2020-03-10".into(),
                district: "Chittagong".into(),
                other_location: "Agrabad Commercial Area".into(),
                crime_type: "cyber_crime".into(),
                status: "charged".into(),
                severity: 3,
                sources: vec![
                    "https://example.com/source4".into(),
                    "https://example.com/source5".into(),
                ],
            },
        ];
        Self { records }
    }

    pub fn records(&self) -> &[CaseRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CaseRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record whose derived identifier equals `id`.
    pub fn find_by_id(&self, id: &str) -> Option<&CaseRecord> {
        self.records.iter().find(|r| r.case_id() == id)
    }

    pub fn into_records(self) -> Vec<CaseRecord> {
        self.records
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a CaseRecord;
    type IntoIter = std::slice::Iter<'a, CaseRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "Title,Subject Name,Summary,Date of Incident,District,Crime Type,Status,Severity,Sources\n\
        First Case,,One,2020-03-10,Dhaka,murder,charged,4,https://a;https://b\n\
        \n\
        \"Second, Case\",Jane Doe,Two,Unknown,Sylhet,theft,reported,abc,\n\
        Third Case,,Three,2018-05-15,Dhaka,murder,convicted,2,https://c\n";

    #[test]
    fn ingest_preserves_row_order() {
        let (catalog, report) = Catalog::ingest(TABLE);
        assert_eq!(report.rows, 3);
        assert_eq!(report.records, 3);
        assert_eq!(report.dropped, 0);
        let titles: Vec<&str> = catalog.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["First Case", "Second, Case", "Third Case"]);
    }

    #[test]
    fn ingest_applies_coercions() {
        let (catalog, _) = Catalog::ingest(TABLE);
        let second = &catalog.records()[1];
        assert_eq!(second.subject_name.as_deref(), Some("Jane Doe"));
        assert_eq!(second.severity, 1);
        assert!(second.sources.is_empty());
        assert_eq!(catalog.records()[0].sources, vec!["https://a", "https://b"]);
    }

    #[test]
    fn ingest_without_title_column_drops_everything() {
        let (catalog, report) = Catalog::ingest("Summary,District\nx,Dhaka\ny,Sylhet\n");
        assert!(catalog.is_empty());
        assert_eq!(report.rows, 2);
        assert_eq!(report.dropped, 2);
        assert!(!report.has_title_column);
    }

    #[test]
    fn ingest_reports_unmapped_headers() {
        let (_, report) = Catalog::ingest("Title,Notes,Reporter\nA,x,y\n");
        assert_eq!(report.unmapped_headers, vec!["Notes", "Reporter"]);
    }

    #[test]
    fn ingest_empty_text() {
        let (catalog, report) = Catalog::ingest("");
        assert!(catalog.is_empty());
        assert_eq!(report, IngestReport::default());
    }

    #[test]
    fn fetch_error_falls_back_to_sample() {
        let outcome = Catalog::from_fetch(Err(ArchiveError::Network("offline".into())));
        assert_eq!(outcome.origin, CatalogOrigin::Fallback);
        assert_eq!(outcome.catalog, Catalog::sample());
    }

    #[test]
    fn unusable_text_falls_back_to_sample() {
        let outcome = Catalog::from_fetch(Ok("<html>not a table</html>".into()));
        assert_eq!(outcome.origin, CatalogOrigin::Fallback);
        assert_eq!(outcome.catalog.len(), 3);
    }

    #[test]
    fn good_text_is_remote() {
        let outcome = Catalog::from_fetch(Ok(TABLE.into()));
        assert_eq!(outcome.origin, CatalogOrigin::Remote);
        assert_eq!(outcome.catalog.len(), 3);
    }

    #[test]
    fn sample_has_expected_shape() {
        let sample = Catalog::sample();
        assert_eq!(sample.len(), 3);
        assert!(sample.iter().all(|r| !r.title.is_empty()));
        assert_eq!(sample.records()[0].subject_name, None);
        assert_eq!(sample.records()[2].crime_type, "cyber_crime");
    }

    #[test]
    fn find_by_id_resolves_case() {
        let sample = Catalog::sample();
        let found = sample.find_by_id("RajanigandhaMurderCase2018-05-15").unwrap();
        assert_eq!(found.subject_name.as_deref(), Some("Saiful Islam"));
        assert!(sample.find_by_id("nope").is_none());
    }
}
