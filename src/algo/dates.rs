use chrono::{Datelike, NaiveDate};

/// Sentinel stored in `date_of_incident` when the source gave no date.
pub const UNKNOWN_DATE: &str = "Unknown";

const FULL_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Parse an incident date as a calendar date.
///
/// `"Unknown"`, blank strings, and anything that does not form a valid
/// calendar date yield `None`. Month-only (`2020-03`) and year-only (`2020`)
/// values resolve to the first day of the period.
pub fn parse_incident_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() || s.eq_ignore_ascii_case(UNKNOWN_DATE) {
        return None;
    }

    for fmt in FULL_DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    // ISO date-time: keep the date part.
    if s.len() > 10 && s.is_char_boundary(10) {
        let (date, rest) = s.split_at(10);
        if rest.starts_with('T') || rest.starts_with(' ') {
            if let Ok(d) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
                return Some(d);
            }
        }
    }

    if is_year_month(s) {
        return NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d").ok();
    }

    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        let year: i32 = s.parse().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1);
    }

    None
}

fn is_year_month(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 7 && b[4] == b'-' && b[..4].iter().chain(&b[5..]).all(u8::is_ascii_digit)
}

/// Calendar year of an incident date, if it parses.
pub fn incident_year(raw: &str) -> Option<i32> {
    parse_incident_date(raw).map(|d| d.year())
}

/// 1-indexed month of an incident date, if it parses.
pub fn incident_month(raw: &str) -> Option<u32> {
    parse_incident_date(raw).map(|d| d.month())
}

/// Month as a two-digit, zero-padded string (`"03"`), as the month filter
/// compares it.
pub fn month_key(month: u32) -> String {
    format!("{month:02}")
}
