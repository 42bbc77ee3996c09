// ── Table controls ──
//
// Search, sort and record-count truncation over a fetched collection.
// The derived view is cached as row indices and rebuilt whenever the
// collection, the search term or the sort configuration changes.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::model::{FieldValue, RecordId, Tabular};

/// Records shown when a page first mounts.
pub const DEFAULT_RECORDS_PER_PAGE: usize = 10;

// ── Sort configuration ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Active sort column and direction. `direction` only matters when
/// `key` is set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: Option<String>,
    pub direction: SortDirection,
}

/// How a column's values are coerced before comparison, chosen from the
/// column name alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKind {
    /// `*_em*` and `data_*` columns: compared as timestamps.
    Date,
    /// `id`, `*valor*` and `*tempo*` columns: compared by their leading number, 0 when there is none.
    Numeric,
    /// Everything else: compared as given, null as empty text.
    Plain,
}

impl SortKind {
    pub fn for_key(key: &str) -> Self {
        if key.contains("_em") || key.starts_with("data_") {
            Self::Date
        } else if key == "id" || key.contains("valor") || key.contains("tempo") {
            Self::Numeric
        } else {
            Self::Plain
        }
    }
}

// ── TableState ──────────────────────────────────────────────────────

/// User intent for one table: search text, record cap and sort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableState {
    search_term: String,
    records_per_page: usize,
    sort: SortConfig,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            records_per_page: DEFAULT_RECORDS_PER_PAGE,
            sort: SortConfig::default(),
        }
    }
}

impl TableState {
    /// Default state with a different initial record cap. Zero keeps the default.
    pub fn with_records_per_page(records_per_page: usize) -> Self {
        Self {
            records_per_page: if records_per_page == 0 {
                DEFAULT_RECORDS_PER_PAGE
            } else {
                records_per_page
            },
            ..Self::default()
        }
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn records_per_page(&self) -> usize {
        self.records_per_page
    }

    pub fn sort_config(&self) -> &SortConfig {
        &self.sort
    }
}

// ── TableControls ───────────────────────────────────────────────────

/// Derives the filtered, sorted and truncated view of a collection.
///
/// There is no page cursor: `records_per_page` caps how many leading rows
/// of [`processed_data`](Self::processed_data) are displayed.
#[derive(Debug, Clone)]
pub struct TableControls<T> {
    data: Vec<T>,
    state: TableState,
    /// Indices into `data`, filtered and ordered.
    processed: Vec<usize>,
}

impl<T: Tabular> TableControls<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self::with_state(data, TableState::default())
    }

    pub fn with_state(data: Vec<T>, state: TableState) -> Self {
        let mut table = Self {
            data,
            state,
            processed: Vec::new(),
        };
        table.recompute();
        table
    }

    /// Replace the collection (after a refetch). User intent is kept.
    pub fn set_data(&mut self, data: Vec<T>) {
        self.data = data;
        self.recompute();
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.state.search_term = term.into();
        self.recompute();
    }

    /// Change the record cap. Returns `false` and keeps the previous cap
    /// when `n` is zero.
    pub fn set_records_per_page(&mut self, n: usize) -> bool {
        if n == 0 {
            debug!("ignoring records_per_page=0");
            return false;
        }
        self.state.records_per_page = n;
        true
    }

    /// Sort by `key`. The same key flips direction; a new key starts ascending.
    pub fn sort(&mut self, key: &str) {
        let sort = &mut self.state.sort;
        if sort.key.as_deref() == Some(key) {
            sort.direction = sort.direction.flipped();
        } else {
            sort.key = Some(key.to_owned());
            sort.direction = SortDirection::Asc;
        }
        self.recompute();
    }

    /// Every row passing the search, in sort order.
    pub fn processed_data(&self) -> Vec<&T> {
        self.processed.iter().map(|&i| &self.data[i]).collect()
    }

    /// The leading `records_per_page` rows of [`processed_data`](Self::processed_data).
    pub fn displayed_data(&self) -> Vec<&T> {
        self.processed
            .iter()
            .take(self.state.records_per_page)
            .map(|&i| &self.data[i])
            .collect()
    }

    pub fn processed_len(&self) -> usize {
        self.processed.len()
    }

    /// Look a record up in the full collection by id.
    pub fn find(&self, id: &RecordId) -> Option<&T> {
        self.data
            .iter()
            .find(|r| r.record_id().as_ref() == Some(id))
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn recompute(&mut self) {
        let needle = self.state.search_term.to_lowercase();
        let mut rows: Vec<usize> = self
            .data
            .iter()
            .enumerate()
            .filter(|(_, record)| matches_search(*record, &needle))
            .map(|(i, _)| i)
            .collect();

        if let Some(ref key) = self.state.sort.key {
            let kind = SortKind::for_key(key);
            let direction = self.state.sort.direction;
            let mut keyed: Vec<(usize, SortValue)> = rows
                .into_iter()
                .map(|i| (i, SortValue::coerce(kind, self.data[i].field(key))))
                .collect();
            // `sort_by` is stable: ties keep their filtered order.
            keyed.sort_by(|(_, a), (_, b)| match direction {
                SortDirection::Asc => a.compare(b),
                SortDirection::Desc => b.compare(a),
            });
            rows = keyed.into_iter().map(|(i, _)| i).collect();
        }

        trace!(
            total = self.data.len(),
            processed = rows.len(),
            "table view recomputed"
        );
        self.processed = rows;
    }
}

fn matches_search<T: Tabular>(record: &T, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    record
        .values()
        .iter()
        .filter_map(FieldValue::search_text)
        .any(|text| text.to_lowercase().contains(needle))
}

// ── Value coercion ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum SortValue {
    Date(Option<NaiveDateTime>),
    Number(f64),
    Plain(FieldValue),
}

impl SortValue {
    fn coerce(kind: SortKind, value: FieldValue) -> Self {
        match kind {
            SortKind::Date => Self::Date(parse_date(&value)),
            SortKind::Numeric => Self::Number(parse_number(&value)),
            SortKind::Plain => Self::Plain(value),
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Plain(a), Self::Plain(b)) => compare_plain(a, b),
            _ => Ordering::Equal,
        }
    }
}

fn parse_number(value: &FieldValue) -> f64 {
    let n = match value {
        FieldValue::Number(n) => *n,
        FieldValue::Text(s) => leading_number(s).unwrap_or(0.0),
        FieldValue::Bool(_) | FieldValue::Null => 0.0,
    };
    if n.is_nan() { 0.0 } else { n }
}

/// The longest numeric prefix of `s` after leading whitespace, so
/// `"10abc"` reads as 10 and `"12,50"` as 12. `None` when there is none.
fn leading_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut seen_digit = int_end > end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        seen_digit |= frac_end > end + 1;
        end = frac_end;
    }
    if !seen_digit {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_end = digits_from(end + 1 + sign);
        if exp_end > end + 1 + sign {
            end = exp_end;
        }
    }
    s.get(..end)?.parse().ok()
}

/// Unparseable dates become `None`, which orders before every real date.
fn parse_date(value: &FieldValue) -> Option<NaiveDateTime> {
    let FieldValue::Text(raw) = value else {
        return None;
    };
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_utc())
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").ok())
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn compare_plain(a: &FieldValue, b: &FieldValue) -> Ordering {
    match (a, b) {
        (FieldValue::Number(x), FieldValue::Number(y)) => x.total_cmp(y),
        (FieldValue::Bool(x), FieldValue::Bool(y)) => x.cmp(y),
        // Null stringifies to "" so it sorts first.
        _ => a.to_string().cmp(&b.to_string()),
    }
}
