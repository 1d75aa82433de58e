//! Display helpers for front ends that render records.

use url::Url;

use super::dates::{parse_incident_date, UNKNOWN_DATE};

pub const DATE_UNKNOWN_LABEL: &str = "Date unknown";
pub const SUMMARY_PREVIEW_CHARS: usize = 150;
const DOMAIN_FALLBACK_CHARS: usize = 30;

/// `"July 1, 2016"` for a parseable date, `"Date unknown"` for an absent one,
/// and the raw text unchanged otherwise.
pub fn format_incident_date(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == UNKNOWN_DATE {
        return DATE_UNKNOWN_LABEL.to_string();
    }
    match parse_incident_date(trimmed) {
        Some(d) => d.format("%B %-d, %Y").to_string(),
        None => raw.to_string(),
    }
}

/// `under_trial` → `under trial`.
///
/// Every underscore is replaced, so `a_b_c` gives `a b c`. The web front end
/// this archive started as replaced only the first one (`a b_c`).
pub fn humanize_label(value: &str) -> String {
    value.replace('_', " ")
}

/// Humanized label with the first letter capitalized (`cyber_crime` →
/// `Cyber crime`).
pub fn option_label(value: &str) -> String {
    let humanized = humanize_label(value);
    let mut chars = humanized.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Shorten a summary to `max_chars` characters followed by `...`.
pub fn truncate_summary(summary: &str, max_chars: usize) -> String {
    match summary.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &summary[..cut]),
        None => summary.to_string(),
    }
}

/// Short display form of a source link: the host without `www.`. A string
/// that is not an absolute URL is returned as is, or cut to its first 30
/// characters plus `...` when longer.
pub fn source_domain(source: &str) -> String {
    if let Some(host) = Url::parse(source).ok().and_then(|u| u.host_str().map(str::to_string)) {
        return host.strip_prefix("www.").unwrap_or(&host).to_string();
    }
    match source.char_indices().nth(DOMAIN_FALLBACK_CHARS) {
        Some((cut, _)) => format!("{}...", &source[..cut]),
        None => source.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_render_long_form() {
        assert_eq!(format_incident_date("2016-07-01"), "July 1, 2016");
        assert_eq!(format_incident_date("2020-03-10"), "March 10, 2020");
    }

    #[test]
    fn unknown_dates_render_label() {
        assert_eq!(format_incident_date("Unknown"), "Date unknown");
        assert_eq!(format_incident_date(""), "Date unknown");
    }

    #[test]
    fn unparseable_dates_pass_through() {
        assert_eq!(format_incident_date("late 1990s"), "late 1990s");
    }

    #[test]
    fn labels() {
        assert_eq!(humanize_label("under_trial"), "under trial");
        assert_eq!(humanize_label("a_b_c"), "a b c");
        assert_eq!(option_label("a_b_c"), "A b c");
        assert_eq!(option_label("cyber_crime"), "Cyber crime");
        assert_eq!(option_label("murder"), "Murder");
        assert_eq!(option_label(""), "");
    }

    #[test]
    fn truncation() {
        let long = "x".repeat(200);
        let short = truncate_summary(&long, SUMMARY_PREVIEW_CHARS);
        assert_eq!(short.len(), 153);
        assert!(short.ends_with("..."));
        assert_eq!(truncate_summary("brief", SUMMARY_PREVIEW_CHARS), "brief");
        let exact = "y".repeat(150);
        assert_eq!(truncate_summary(&exact, SUMMARY_PREVIEW_CHARS), exact);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let text = "অপরাধ".repeat(40);
        let out = truncate_summary(&text, 10);
        assert_eq!(out.chars().count(), 13);
    }

    #[test]
    fn domains() {
        assert_eq!(source_domain("https://www.thedailystar.net/news/1"), "thedailystar.net");
        assert_eq!(source_domain("http://example.com/a?b=c"), "example.com");
        assert_eq!(
            source_domain("Daily Star print edition, page four"),
            "Daily Star print edition, page..."
        );
        assert_eq!(source_domain("court record"), "court record");
    }

    #[test]
    fn short_non_urls_are_unchanged() {
        let exact = "a".repeat(30);
        assert_eq!(source_domain(&exact), exact);
        let over = "a".repeat(31);
        assert_eq!(source_domain(&over), format!("{}...", "a".repeat(30)));
    }
}
