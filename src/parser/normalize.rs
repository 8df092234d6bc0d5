//! Projects the flat record sequence into a uniform tabular dataset,
//! coercing the air-date field into a calendar date along the way.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::warn;

use super::reconstruct::{EpisodeRecord, COL_AIR_DATE};

// The visible air date usually repeats itself as an ISO reference in
// parentheses: "October 2, 1993 (1993-10-02)". The parenthesized part is
// the one we keep.
static PAREN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(([^)]*)\)").unwrap());

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%B %d, %Y"];

pub const COL_SEASON: &str = "season";
pub const COL_SUMMARY: &str = "Summary";

/// Uniform tabular view of the record sequence, ready for CSV export.
#[derive(Debug)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Project the records into a dataset. The column set is the union of
/// field keys across all records in first-seen order, with the season tag
/// first and the summary last; record order is preserved, and a record
/// missing a column gets an empty cell rather than a dropped column.
pub fn normalize(records: &[EpisodeRecord]) -> Dataset {
    let mut field_columns: Vec<String> = Vec::new();
    for record in records {
        for name in record.columns() {
            if !field_columns.iter().any(|c| c == name) {
                field_columns.push(name.to_string());
            }
        }
    }

    let mut columns = Vec::with_capacity(field_columns.len() + 2);
    columns.push(COL_SEASON.to_string());
    columns.append(&mut field_columns);
    columns.push(COL_SUMMARY.to_string());

    let rows = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|column| match column.as_str() {
                    COL_SEASON => record.season.to_string(),
                    COL_SUMMARY => record.summary.clone(),
                    COL_AIR_DATE => air_date_cell(record.get(COL_AIR_DATE)),
                    name => record.get(name).unwrap_or_default().to_string(),
                })
                .collect()
        })
        .collect();

    Dataset { columns, rows }
}

fn air_date_cell(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };
    match parse_air_date(raw) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => {
            // Degraded record, not a failed run: the field goes out empty.
            if !raw.is_empty() {
                warn!("Could not parse air date from {:?}", raw);
            }
            String::new()
        }
    }
}

/// Extract the first parenthesized group and parse it as a calendar date.
/// Text with no parentheses (or an unparseable group) yields `None`.
pub fn parse_air_date(raw: &str) -> Option<NaiveDate> {
    let inner = PAREN_RE.captures(raw)?.get(1)?.as_str().trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(inner, fmt).ok())
}

// ── Tests ──
