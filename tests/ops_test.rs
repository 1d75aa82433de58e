use nu_plugin_case_archive::algo::export::ExportOptions;
use nu_plugin_case_archive::algo::filter::{FilterState, SavedSet};
use nu_plugin_case_archive::ops;
use serde_json::{json, Value};

const SHEET: &str = "Image,Title,Subject Name,Summary,Date of Incident,District,Other Location,Crime Type,Status,Severity,Sources\n\
,Gulshan Attack Case,,Attack on a cafe.,2016-07-01,Dhaka,Gulshan,terrorism,convicted,5,https://www.thedailystar.net/a;https://bdnews24.com/b\n\
,\"Fraud, Digital\",Mohammad Hasan,Phishing at scale.,2020-03-10,Chittagong,Agrabad,cyber_crime,charged,3,\n\
,Cafe Robbery,,Night robbery.,2018-08-20,Dhaka,,robbery,reported,abc,https://example.com/c\n";

fn sample_records() -> Vec<Value> {
    vec![
        json!({"title": "Gulshan Attack Case", "date_of_incident": "2016-07-01", "district": "Dhaka", "crime_type": "terrorism", "status": "convicted", "severity": 5}),
        json!({"title": "Rajanigandha Murder Case", "subject_name": "Saiful Islam", "date_of_incident": "2018-05-15", "district": "Dhaka", "crime_type": "murder", "status": "under_trial", "severity": 4}),
        json!({"title": "Digital Financial Fraud Case", "subject_name": "Mohammad Hasan", "date_of_incident": "2020-03-10", "district": "Chittagong", "crime_type": "cyber_crime", "status": "charged", "severity": 3}),
    ]
}

fn titles(v: &Value) -> Vec<&str> {
    v.as_array()
        .unwrap()
        .iter()
        .map(|r| r["title"].as_str().unwrap())
        .collect()
}

#[test]
fn ops_ingest_normalizes_sheet() {
    let result = ops::op_ingest(SHEET).unwrap();
    let records = result["records"].as_array().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[1]["title"], "Fraud, Digital");
    assert_eq!(records[1]["subject_name"], "Mohammad Hasan");
    assert_eq!(records[1]["sources"], json!([]));
    assert_eq!(records[2]["severity"], 1);
    assert_eq!(records[2]["subject_name"], Value::Null);
    assert_eq!(records[0]["sources"].as_array().unwrap().len(), 2);
    assert!(records[0]["image"].as_str().unwrap().contains("No+Image+Available"));

    let report = &result["report"];
    assert_eq!(report["rows"], 3);
    assert_eq!(report["dropped"], 0);
    assert_eq!(report["has_title_column"], true);
}

#[test]
fn ops_ingest_without_title_column() {
    let result = ops::op_ingest("Name,District\nx,Dhaka\n").unwrap();
    assert_eq!(result["records"], json!([]));
    assert_eq!(result["report"]["dropped"], 1);
    assert_eq!(result["report"]["unmapped_headers"], json!(["Name"]));
}

#[test]
fn ops_sample_has_three_cases() {
    let result = ops::op_sample().unwrap();
    assert_eq!(result.as_array().unwrap().len(), 3);
}

#[test]
fn ops_filter_empty_state_keeps_order() {
    let rows = sample_records();
    let result = ops::op_filter(&rows, &FilterState::default(), &SavedSet::new()).unwrap();
    assert_eq!(
        titles(&result),
        vec!["Gulshan Attack Case", "Rajanigandha Murder Case", "Digital Financial Fraud Case"]
    );
}

#[test]
fn ops_filter_district_and_year() {
    let rows = sample_records();
    let state = FilterState {
        district: Some("Dhaka".into()),
        year: Some("2018".into()),
        ..Default::default()
    };
    let result = ops::op_filter(&rows, &state, &SavedSet::new()).unwrap();
    assert_eq!(titles(&result), vec!["Rajanigandha Murder Case"]);
}

#[test]
fn ops_filter_query_matches_subject() {
    let rows = sample_records();
    let state = FilterState {
        query: "hasan".into(),
        ..Default::default()
    };
    let result = ops::op_filter(&rows, &state, &SavedSet::new()).unwrap();
    assert_eq!(titles(&result), vec!["Digital Financial Fraud Case"]);
}

#[test]
fn ops_filter_saved_only() {
    let rows = sample_records();
    let saved: SavedSet = ["GulshanAttackCase2016-07-01".to_string()].into_iter().collect();
    let state = FilterState {
        saved_only: true,
        ..Default::default()
    };
    let result = ops::op_filter(&rows, &state, &saved).unwrap();
    assert_eq!(titles(&result), vec!["Gulshan Attack Case"]);
}

#[test]
fn ops_filter_rejects_malformed_rows() {
    let rows = vec![json!({"title": "T", "severity": "high"})];
    let result = ops::op_filter(&rows, &FilterState::default(), &SavedSet::new());
    assert!(result.is_err());
}

#[test]
fn ops_filter_accepts_sheet_headers() {
    let rows = vec![
        json!({"Title": "Cafe Attack", "District": "Dhaka", "Date of Incident": "2018-07-01", "Severity": "4 (high)", "Sources": "https://a.example;https://b.example"}),
        json!({"Title": "Bank Fraud", "District": "Chittagong", "Date of Incident": "2020-03-10"}),
    ];
    let state = FilterState {
        district: Some("Dhaka".into()),
        year: Some("2018".into()),
        ..Default::default()
    };
    let result = ops::op_filter(&rows, &state, &SavedSet::new()).unwrap();
    assert_eq!(titles(&result), vec!["Cafe Attack"]);
    assert_eq!(result[0]["severity"], 4);
    assert_eq!(result[0]["sources"].as_array().unwrap().len(), 2);
}

#[test]
fn ops_field_names_win_over_sheet_headers() {
    let rows = vec![json!({"Title": "Raw", "title": "Canonical"})];
    let result = ops::op_filter(&rows, &FilterState::default(), &SavedSet::new()).unwrap();
    assert_eq!(titles(&result), vec!["Canonical"]);
}

#[test]
fn ops_rejects_rows_without_case_fields() {
    let rows = sample_records()
        .into_iter()
        .chain([json!({"name": "x", "_id": "y"})])
        .collect::<Vec<_>>();
    let err = ops::op_facets(&rows).unwrap_err().to_string();
    assert!(err.contains("row 3"), "{err}");
    assert!(ops::op_export(&json!({}), &ExportOptions::default()).is_err());
}

#[test]
fn ops_case_ids_from_sheet_headers() {
    let rows = vec![json!({"Title": "A Case!", "Date of Incident": "2020-01-01"})];
    let result = ops::op_case_ids(&rows).unwrap();
    assert_eq!(result[0]["_id"], "ACase2020-01-01");
    assert_eq!(result[0]["Title"], "A Case!");
}

#[test]
fn ops_facets_lists_choices() {
    let mut rows = sample_records();
    rows.push(json!({"title": "Undated", "date_of_incident": "Unknown", "district": "Dhaka"}));
    let result = ops::op_facets(&rows).unwrap();
    assert_eq!(result["years"], json!([2020, 2018, 2016]));
    assert_eq!(result["districts"], json!(["Dhaka", "Chittagong"]));
    assert_eq!(
        result["crime_types"],
        json!(["terrorism", "murder", "cyber_crime", "Unknown"])
    );
    assert_eq!(
        result["statuses"],
        json!(["convicted", "under_trial", "charged", "reported"])
    );
}

#[test]
fn ops_case_ids_appends_column() {
    let rows = vec![json!({"title": "A Case!", "date_of_incident": "2020-01-01", "extra": 1})];
    let result = ops::op_case_ids(&rows).unwrap();
    assert_eq!(result[0]["_id"], "ACase2020-01-01");
    assert_eq!(result[0]["extra"], 1);
}

#[test]
fn ops_export_renders_case_file() {
    let row = sample_records().remove(1);
    let result = ops::op_export(&row, &ExportOptions::default()).unwrap();
    assert_eq!(result["file_name"], "RajanigandhaMurderCase2018-05-15.txt");
    assert_eq!(result["page_count"], 1);
    let text = result["text"].as_str().unwrap();
    assert!(text.contains("Saiful Islam"));
    assert!(text.contains("May 15, 2018"));
    assert!(text.ends_with("Page 1 of 1"));
}

#[cfg(feature = "store")]
mod store {
    use super::*;
    use std::path::PathBuf;

    fn temp_store(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "case_archive_ops_{}_{name}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir.join("archive.db")
    }

    #[test]
    fn ops_saved_toggle_and_list() {
        let path = temp_store("toggle");
        let path = path.to_str().unwrap();

        let on = ops::op_saved_toggle(path, "GulshanAttackCase2016-07-01").unwrap();
        assert_eq!(on["saved"], true);
        let list = ops::op_saved_list(path).unwrap();
        assert_eq!(list["total"], 1);
        assert_eq!(list["ids"], json!(["GulshanAttackCase2016-07-01"]));

        let off = ops::op_saved_toggle(path, "GulshanAttackCase2016-07-01").unwrap();
        assert_eq!(off["saved"], false);
        assert_eq!(ops::op_saved_list(path).unwrap()["total"], 0);
    }

    #[test]
    fn ops_saved_set_is_idempotent() {
        let path = temp_store("set");
        let path = path.to_str().unwrap();
        assert_eq!(ops::op_saved_set(path, "x", true).unwrap()["changed"], true);
        assert_eq!(ops::op_saved_set(path, "x", true).unwrap()["changed"], false);
        assert_eq!(ops::op_saved_set(path, "x", false).unwrap()["changed"], true);
    }

    #[test]
    fn ops_load_saved_feeds_filter() {
        let path = temp_store("filter");
        let path = path.to_str().unwrap();
        ops::op_saved_toggle(path, "DigitalFinancialFraudCase2020-03-10").unwrap();

        let saved = ops::load_saved(Some(path)).unwrap();
        let state = FilterState {
            saved_only: true,
            ..Default::default()
        };
        let result = ops::op_filter(&sample_records(), &state, &saved).unwrap();
        assert_eq!(titles(&result), vec!["Digital Financial Fraud Case"]);
    }

    #[test]
    fn ops_visits_and_warning() {
        let path = temp_store("visits");
        let path = path.to_str().unwrap();
        assert_eq!(ops::op_visits(path, false).unwrap()["visitors"], 0);
        let accepted = ops::op_accept_warning(path).unwrap();
        assert_eq!(accepted["visitors"], 1);
        assert_eq!(ops::op_accept_warning(path).unwrap()["visitors"], 1);
        let bumped = ops::op_visits(path, true).unwrap();
        assert_eq!(bumped["visitors"], 2);
        assert_eq!(bumped["warning_accepted"], true);
    }
}
