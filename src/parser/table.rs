//! Thin layer over the parsed DOM: locates the episode tables and flattens
//! each one into a plain grid, so the reconstruction pass can walk rows and
//! cells without touching selectors again.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::error::ScrapeError;

/// Class marker identifying episode-list tables on the page.
pub const EPISODE_TABLE_CLASS: &str = "wikitable plainrowheaders wikiepisodetable";

static TABLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table.wikitable.plainrowheaders.wikiepisodetable").unwrap());
static ROW_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static HEADER_CELL_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("th").unwrap());
static CELL_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("th, td").unwrap());
static SYNOPSIS_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.shortSummaryText").unwrap());

/// How a physical row participates in the logical record structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// Primary episode row (`vevent` marker).
    Episode,
    /// Auxiliary synopsis row (`expand-child` marker).
    Summary,
    /// Anything else; continuation rows land here.
    Plain,
}

#[derive(Debug, Clone)]
pub struct Cell {
    pub text: String,
    /// Declared vertical extent (`rowspan`), 1 when absent.
    pub span: u32,
}

#[derive(Debug)]
pub struct TableRow {
    pub kind: RowKind,
    pub cells: Vec<Cell>,
    /// Synopsis text, present only on summary rows that carry one.
    pub synopsis: Option<String>,
}

/// One episode table flattened to a header plus its physical body rows.
#[derive(Debug)]
pub struct TableGrid {
    pub header: Vec<String>,
    pub rows: Vec<TableRow>,
}

/// Collect every episode table on the page, in document order. Zero
/// matching tables means the page layout changed under us.
pub fn collect_tables(document: &Html) -> Result<Vec<TableGrid>, ScrapeError> {
    let grids: Vec<TableGrid> = document.select(&TABLE_SEL).map(flatten_table).collect();
    if grids.is_empty() {
        return Err(ScrapeError::NoEpisodeTables(EPISODE_TABLE_CLASS.to_string()));
    }
    Ok(grids)
}

fn flatten_table(table: ElementRef) -> TableGrid {
    let mut rows = table.select(&ROW_SEL);

    // Column names come from the header cells of the first physical row.
    let header = rows
        .next()
        .map(|first| first.select(&HEADER_CELL_SEL).map(element_text).collect())
        .unwrap_or_default();

    TableGrid {
        header,
        rows: rows.map(flatten_row).collect(),
    }
}

fn flatten_row(row: ElementRef) -> TableRow {
    let kind = match row.value().attr("class") {
        Some(c) if c.split_whitespace().any(|t| t == "vevent") => RowKind::Episode,
        Some(c) if c.split_whitespace().any(|t| t == "expand-child") => RowKind::Summary,
        _ => RowKind::Plain,
    };

    let synopsis = match kind {
        RowKind::Summary => row.select(&SYNOPSIS_SEL).next().map(element_text),
        _ => None,
    };

    let cells = row
        .select(&CELL_SEL)
        .map(|cell| Cell {
            text: element_text(cell),
            span: cell
                .value()
                .attr("rowspan")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(1),
        })
        .collect();

    TableRow {
        kind,
        cells,
        synopsis,
    }
}

fn element_text(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn grids(html: &str) -> Vec<TableGrid> {
        collect_tables(&Html::parse_document(html)).unwrap()
    }

    #[test]
    fn no_matching_tables_is_an_error() {
        let doc = Html::parse_document("<html><body><table><tr><td>x</td></tr></table></body></html>");
        let err = collect_tables(&doc).unwrap_err();
        assert!(matches!(err, ScrapeError::NoEpisodeTables(_)));
    }

    #[test]
    fn header_from_first_row() {
        let tables = grids(
            r#"<table class="wikitable plainrowheaders wikiepisodetable">
                <tr><th>No. overall</th><th>Title</th></tr>
                <tr class="vevent"><th>1</th><td>Pilot</td></tr>
            </table>"#,
        );
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].header, vec!["No. overall", "Title"]);
        assert_eq!(tables[0].rows.len(), 1);
    }

    #[test]
    fn row_classification_by_marker() {
        let tables = grids(
            r#"<table class="wikitable plainrowheaders wikiepisodetable">
                <tr><th>Title</th></tr>
                <tr class="vevent module-episode-list-row"><td>Pilot</td></tr>
                <tr><td>continuation</td></tr>
                <tr class="expand-child"><td><div class="shortSummaryText">Stuff happens.</div></td></tr>
            </table>"#,
        );
        let kinds: Vec<RowKind> = tables[0].rows.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![RowKind::Episode, RowKind::Plain, RowKind::Summary]);
        assert_eq!(tables[0].rows[2].synopsis.as_deref(), Some("Stuff happens."));
    }

    #[test]
    fn rowspan_defaults_to_one() {
        let tables = grids(
            r#"<table class="wikitable plainrowheaders wikiepisodetable">
                <tr><th>Title</th><th>Directed by</th></tr>
                <tr class="vevent"><td rowspan="2">Pilot</td><td>Someone</td></tr>
            </table>"#,
        );
        let cells = &tables[0].rows[0].cells;
        assert_eq!(cells[0].span, 2);
        assert_eq!(cells[1].span, 1);
    }

    #[test]
    fn cell_text_is_trimmed_and_flattened() {
        let tables = grids(
            r#"<table class="wikitable plainrowheaders wikiepisodetable">
                <tr><th>Title</th></tr>
                <tr class="vevent"><td>  <a href="/wiki/Pilot">Pilot</a> episode </td></tr>
            </table>"#,
        );
        assert_eq!(tables[0].rows[0].cells[0].text, "Pilot episode");
    }

    #[test]
    fn tables_in_document_order() {
        let tables = grids(
            r#"<table class="wikitable plainrowheaders wikiepisodetable">
                <tr><th>Title</th></tr><tr class="vevent"><td>first</td></tr>
            </table>
            <table class="wikitable plainrowheaders wikiepisodetable">
                <tr><th>Title</th></tr><tr class="vevent"><td>second</td></tr>
            </table>"#,
        );
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].rows[0].cells[0].text, "first");
        assert_eq!(tables[1].rows[0].cells[0].text, "second");
    }
}
