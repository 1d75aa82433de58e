//! Plain-text case file export.
//!
//! A record is laid out as a sequence of lines (heading, metadata block,
//! wrapped summary, numbered sources), then cut into fixed-height pages.
//! Each page ends with a `Page i of n` footer and pages are joined with a
//! form feed, so the rendered text prints one case file per sheet.

use serde::{Deserialize, Serialize};

use super::present::{format_incident_date, humanize_label};
use super::record::CaseRecord;

const PAGE_BREAK: char = '\u{000C}';
/// Lines reserved at the bottom of each page for the footer.
const FOOTER_LINES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub line_width: usize,
    pub lines_per_page: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            line_width: 80,
            lines_per_page: 54,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseDocument {
    pub file_name: String,
    pub pages: Vec<String>,
}

impl CaseDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Full text with pages separated by form feeds.
    pub fn render(&self) -> String {
        let sep = PAGE_BREAK.to_string();
        self.pages.join(&sep)
    }
}

/// Greedy word wrap. Words longer than `width` are split hard.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        if word.is_empty() {
            continue;
        }
        let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
        if needed > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current_len += word.len();
        current.extend(word);
    }
    if current_len > 0 {
        lines.push(current);
    }
    lines
}

fn labelled(label: &str, value: &str, width: usize, out: &mut Vec<String>) {
    let prefix = format!("{label:<12}");
    let wrapped = wrap_text(value, width.saturating_sub(prefix.len()).max(1));
    if wrapped.is_empty() {
        out.push(prefix.trim_end().to_string());
        return;
    }
    for (i, line) in wrapped.into_iter().enumerate() {
        if i == 0 {
            out.push(format!("{prefix}{line}"));
        } else {
            out.push(format!("{:width$}{line}", "", width = prefix.len()));
        }
    }
}

fn body_lines(record: &CaseRecord, width: usize) -> Vec<String> {
    let mut out = wrap_text(&record.title.to_uppercase(), width);
    out.push("=".repeat(width.min(record.title.chars().count().max(1))));
    out.push(String::new());

    if let Some(subject) = &record.subject_name {
        labelled("Subject:", subject, width, &mut out);
    }
    labelled("Date:", &format_incident_date(&record.date_of_incident), width, &mut out);
    labelled("District:", &record.district, width, &mut out);
    if !record.other_location.is_empty() {
        labelled("Location:", &record.other_location, width, &mut out);
    }
    labelled("Crime type:", &humanize_label(&record.crime_type), width, &mut out);
    labelled("Status:", &humanize_label(&record.status), width, &mut out);
    labelled("Severity:", &record.severity.to_string(), width, &mut out);
    out.push(String::new());

    out.push("Summary".to_string());
    out.push("-------".to_string());
    out.extend(wrap_text(&record.summary, width));

    if !record.sources.is_empty() {
        out.push(String::new());
        out.push("Sources".to_string());
        out.push("-------".to_string());
        for (i, source) in record.sources.iter().enumerate() {
            let marker = format!("{}. ", i + 1);
            let wrapped = wrap_text(source, width.saturating_sub(marker.len()).max(1));
            for (j, line) in wrapped.into_iter().enumerate() {
                if j == 0 {
                    out.push(format!("{marker}{line}"));
                } else {
                    out.push(format!("{:w$}{line}", "", w = marker.len()));
                }
            }
        }
    }
    out
}

/// Lay out a record as a paginated case file named `<case id>.txt`.
pub fn export_case(record: &CaseRecord, options: &ExportOptions) -> CaseDocument {
    let width = options.line_width.max(20);
    let per_page = options.lines_per_page.max(FOOTER_LINES + 1) - FOOTER_LINES;
    let lines = body_lines(record, width);

    let chunks: Vec<&[String]> = lines.chunks(per_page).collect();
    let total = chunks.len().max(1);
    let pages = chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            let mut page = chunk.join("\n");
            page.push_str("\n\n");
            page.push_str(&format!("Page {} of {}", i + 1, total));
            page
        })
        .collect();

    CaseDocument {
        file_name: format!("{}.txt", record.case_id()),
        pages,
    }
}
