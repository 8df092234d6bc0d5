//! Rebuilds one logical episode record per output row from the physically
//! irregular grid. Wikipedia encodes multi-row records through `rowspan`
//! hints on the title, director, and writer cells; the fields those spans
//! do not fix arrive on marker-less continuation rows, and the synopsis
//! lives on a separate auxiliary row. Each span rule is a pure function
//! from (base record, following rows) to derived records.

use tracing::warn;

use super::table::{RowKind, TableGrid, TableRow};
use crate::error::ScrapeError;

pub const COL_TITLE: &str = "Title";
pub const COL_DIRECTOR: &str = "Directed by";
pub const COL_WRITER: &str = "Written by";
pub const COL_AIR_DATE: &str = "Original air date";

/// One logical episode: an insertion-ordered column-name → raw-text
/// mapping, plus the season tag and the synopsis from the auxiliary row.
/// `Clone` yields a fully isolated copy, which is what the continuation
/// rules rely on to derive records without aliasing the primary one.
#[derive(Debug, Clone, Default)]
pub struct EpisodeRecord {
    pub season: u32,
    pub summary: String,
    fields: Vec<(String, String)>,
}

impl EpisodeRecord {
    pub fn new(season: u32) -> Self {
        EpisodeRecord {
            season,
            ..Default::default()
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Overwrite `column` if present, append it otherwise. Insertion order
    /// is what the normalizer later uses as column order.
    pub fn set(&mut self, column: &str, value: impl Into<String>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| name == column) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((column.to_string(), value)),
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

/// Positional indices of the span-carrying columns, validated once per
/// table so a layout change surfaces before any row is processed.
struct ColumnMap {
    title: usize,
    director: usize,
    writer: usize,
}

impl ColumnMap {
    fn locate(header: &[String], season: u32) -> Result<Self, ScrapeError> {
        let index = |column: &'static str| {
            header
                .iter()
                .position(|name| name == column)
                .ok_or(ScrapeError::MissingColumn { season, column })
        };
        let map = ColumnMap {
            title: index(COL_TITLE)?,
            director: index(COL_DIRECTOR)?,
            writer: index(COL_WRITER)?,
        };
        index(COL_AIR_DATE)?;
        Ok(map)
    }
}

/// Walk every table in document order and emit the flat record sequence.
/// The Nth table (1-indexed) supplies `season == N` for all of its records.
pub fn reconstruct(tables: &[TableGrid]) -> Result<Vec<EpisodeRecord>, ScrapeError> {
    let mut records = Vec::new();
    for (index, table) in tables.iter().enumerate() {
        reconstruct_table(table, index as u32 + 1, &mut records)?;
    }
    Ok(records)
}

fn reconstruct_table(
    table: &TableGrid,
    season: u32,
    out: &mut Vec<EpisodeRecord>,
) -> Result<(), ScrapeError> {
    let columns = ColumnMap::locate(&table.header, season)?;

    for (i, row) in table.rows.iter().enumerate() {
        if row.kind != RowKind::Episode {
            continue;
        }

        let mut base = EpisodeRecord::new(season);
        for (name, cell) in table.header.iter().zip(&row.cells) {
            base.set(name, cell.text.clone());
        }

        // Missing cells read as span 1, so short rows never panic.
        let span = |idx: usize| row.cells.get(idx).map(|c| c.span).unwrap_or(1);
        let title_span = span(columns.title);
        let director_span = span(columns.director);
        let writer_span = span(columns.writer);

        let following = &table.rows[i + 1..];
        if let Some(synopsis) = find_synopsis(following) {
            base.summary = synopsis.to_string();
        }

        // The three span rules are independent; each may derive extra
        // records from the same base, in this fixed order.
        let mut derived = Vec::new();
        if title_span > 1 {
            derived.extend(title_continuation(&base, &table.header, following.first()));
        }
        if director_span >= 4 && title_span == 1 {
            director_continuations(&base, &table.header, following, &mut derived);
        }
        if writer_span > 1 {
            derived.extend(writer_continuation(&base, &table.header, following.first()));
        }

        out.push(base);
        out.append(&mut derived);
    }
    Ok(())
}

/// Synopsis of the first auxiliary row between this episode row and the
/// next one, if any.
fn find_synopsis(following: &[TableRow]) -> Option<&str> {
    following
        .iter()
        .take_while(|row| row.kind != RowKind::Episode)
        .find(|row| row.kind == RowKind::Summary)
        .and_then(|row| row.synopsis.as_deref())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Title spanning two rows: the single next physical row carries the
/// fields the span does not fix. 3 cells carry (overall, in-season, air
/// date); 4 cells carry (overall, in-season, writer, air date).
fn title_continuation(
    base: &EpisodeRecord,
    header: &[String],
    next: Option<&TableRow>,
) -> Option<EpisodeRecord> {
    let row = next.filter(|r| r.kind != RowKind::Summary)?;
    let (overall, in_season) = number_columns(header)?;
    let targets: Vec<&str> = match row.cells.len() {
        3 => vec![overall, in_season, COL_AIR_DATE],
        4 => vec![overall, in_season, COL_WRITER, COL_AIR_DATE],
        n => {
            warn!("Skipping title continuation row with {} cells (expected 3 or 4)", n);
            return None;
        }
    };
    Some(overwrite(base, &targets, row))
}

/// Director spanning four or more rows (multi-part episodes with per-part
/// credits): every following row is its own part, until the first
/// auxiliary row, a row with no cells, or the end of the table.
fn director_continuations(
    base: &EpisodeRecord,
    header: &[String],
    following: &[TableRow],
    out: &mut Vec<EpisodeRecord>,
) {
    let Some((overall, in_season)) = number_columns(header) else {
        return;
    };
    for row in following {
        if row.kind == RowKind::Summary || row.cells.is_empty() {
            break;
        }
        if row.cells.len() < 5 {
            warn!(
                "Skipping director continuation row with {} cells (expected at least 5)",
                row.cells.len()
            );
            continue;
        }
        out.push(overwrite(
            base,
            &[overall, in_season, COL_TITLE, COL_WRITER, COL_AIR_DATE],
            row,
        ));
    }
}

/// Writer spanning two rows: the single next physical row carries only the
/// two episode numbers; any other cell count means no continuation.
fn writer_continuation(
    base: &EpisodeRecord,
    header: &[String],
    next: Option<&TableRow>,
) -> Option<EpisodeRecord> {
    let row = next.filter(|r| r.cells.len() == 2)?;
    let (overall, in_season) = number_columns(header)?;
    Some(overwrite(base, &[overall, in_season], row))
}

/// Copy `base` and overwrite `targets` positionally from the row's cells.
fn overwrite(base: &EpisodeRecord, targets: &[&str], row: &TableRow) -> EpisodeRecord {
    let mut record = base.clone();
    for (target, cell) in targets.iter().zip(&row.cells) {
        record.set(target, cell.text.clone());
    }
    record
}

/// The first two header columns hold the overall and in-season numbers.
fn number_columns(header: &[String]) -> Option<(&str, &str)> {
    match header {
        [overall, in_season, ..] => Some((overall.as_str(), in_season.as_str())),
        _ => None,
    }
}

// ── Tests ──
