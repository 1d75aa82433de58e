use serde::{Deserialize, Serialize};

/// Semantic field a raw column header can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalKey {
    Image,
    Title,
    SubjectName,
    Summary,
    DateOfIncident,
    District,
    OtherLocation,
    CrimeType,
    Status,
    Severity,
    Sources,
}

impl CanonicalKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Title => "title",
            Self::SubjectName => "subject_name",
            Self::Summary => "summary",
            Self::DateOfIncident => "date_of_incident",
            Self::District => "district",
            Self::OtherLocation => "other_location",
            Self::CrimeType => "crime_type",
            Self::Status => "status",
            Self::Severity => "severity",
            Self::Sources => "sources",
        }
    }
}

/// Substring test applied to a normalized header.
#[derive(Debug, Clone, Copy)]
pub enum Pattern {
    /// Every fragment must occur.
    All(&'static [&'static str]),
    /// At least one fragment must occur.
    Any(&'static [&'static str]),
}

impl Pattern {
    pub fn matches(&self, normalized: &str) -> bool {
        match self {
            Pattern::All(parts) => parts.iter().all(|p| normalized.contains(p)),
            Pattern::Any(parts) => parts.iter().any(|p| normalized.contains(p)),
        }
    }
}

/// Header rules in priority order. The first matching rule wins, so a header
/// such as `source_image` resolves to `Image`.
pub const HEADER_RULES: &[(Pattern, CanonicalKey)] = &[
    (Pattern::All(&["image"]), CanonicalKey::Image),
    (Pattern::All(&["title"]), CanonicalKey::Title),
    (Pattern::All(&["subject", "name"]), CanonicalKey::SubjectName),
    (Pattern::All(&["summary"]), CanonicalKey::Summary),
    (Pattern::All(&["date", "incident"]), CanonicalKey::DateOfIncident),
    (Pattern::All(&["district"]), CanonicalKey::District),
    (Pattern::Any(&["other_location", "location"]), CanonicalKey::OtherLocation),
    (Pattern::All(&["crime", "type"]), CanonicalKey::CrimeType),
    (Pattern::All(&["status"]), CanonicalKey::Status),
    (Pattern::All(&["severity"]), CanonicalKey::Severity),
    (Pattern::All(&["source"]), CanonicalKey::Sources),
];

/// Lowercase and replace every character outside `[a-z0-9]` with `_`.
///
/// Surrounding whitespace is normalized too (it becomes `_`), which is
/// harmless for substring matching.
pub fn clean_header(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() { c } else { '_' })
        .collect()
}

/// Resolve a raw header to its canonical key, or `None` if no rule matches.
pub fn normalize_header(raw: &str) -> Option<CanonicalKey> {
    let cleaned = clean_header(raw);
    HEADER_RULES
        .iter()
        .find(|(pattern, _)| pattern.matches(&cleaned))
        .map(|(_, key)| *key)
}

/// Column index → canonical key, resolved once per table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMap {
    columns: Vec<Option<CanonicalKey>>,
}

impl HeaderMap {
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Self {
        let columns = headers
            .iter()
            .map(|h| {
                let h = h.as_ref();
                if h.is_empty() {
                    None
                } else {
                    normalize_header(h)
                }
            })
            .collect();
        Self { columns }
    }

    pub fn key_at(&self, index: usize) -> Option<CanonicalKey> {
        self.columns.get(index).copied().flatten()
    }

    /// Iterate `(column index, key)` for every mapped column.
    pub fn mapped(&self) -> impl Iterator<Item = (usize, CanonicalKey)> + '_ {
        self.columns
            .iter()
            .enumerate()
            .filter_map(|(i, k)| k.map(|k| (i, k)))
    }

    pub fn has_key(&self, key: CanonicalKey) -> bool {
        self.columns.iter().any(|k| *k == Some(key))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Headers that resolved to nothing (their columns are ignored).
    pub fn unmapped<'a, S: AsRef<str>>(&self, headers: &'a [S]) -> Vec<&'a str> {
        headers
            .iter()
            .enumerate()
            .filter(|(i, _)| self.key_at(*i).is_none())
            .map(|(_, h)| h.as_ref())
            .collect()
    }
}
