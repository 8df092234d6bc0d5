pub mod normalize;
pub mod reconstruct;
pub mod table;

use scraper::Html;

use crate::error::ScrapeError;

pub use normalize::{normalize, Dataset};
pub use reconstruct::EpisodeRecord;

/// Two-pass pipeline: HTML text → flattened table grids → episode records.
pub fn extract_episodes(html: &str) -> Result<Vec<EpisodeRecord>, ScrapeError> {
    let document = Html::parse_document(html);
    let tables = table::collect_tables(&document)?;
    reconstruct::reconstruct(&tables)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> String {
        std::fs::read_to_string("tests/fixtures/episode_list.html").unwrap()
    }

    #[test]
    fn full_pipeline_on_fixture() {
        let records = extract_episodes(&fixture()).unwrap();
        assert_eq!(records.len(), 4);

        // Season 1: a two-part premiere plus one regular episode.
        assert_eq!(records[0].get("Title"), Some("Night of the Sentinels"));
        assert_eq!(records[0].get("No. overall"), Some("1"));
        assert_eq!(records[0].summary, "Jubilee is captured by the Sentinels.");

        // The continuation shares title and credits but not the numbers.
        assert_eq!(records[1].get("Title"), Some("Night of the Sentinels"));
        assert_eq!(records[1].get("No. overall"), Some("2"));
        assert_eq!(records[1].get("Directed by"), records[0].get("Directed by"));
        assert_eq!(
            records[1].get("Original air date"),
            Some("November 7, 1992 (1992-11-07)")
        );

        assert_eq!(records[2].get("Title"), Some("Enter Magneto"));
        assert_eq!(records[2].summary, "Magneto attempts a breakout.");

        // Every record from the second table carries season 2.
        assert!(records[..3].iter().all(|r| r.season == 1));
        assert_eq!(records[3].season, 2);
        assert_eq!(records[3].get("Title"), Some("Till Death Do Us Part"));
    }

    #[test]
    fn fixture_normalizes_to_iso_dates() {
        let records = extract_episodes(&fixture()).unwrap();
        let dataset = normalize(&records);

        assert_eq!(dataset.columns.first().map(String::as_str), Some("season"));
        assert_eq!(dataset.columns.last().map(String::as_str), Some("Summary"));

        let air = dataset
            .columns
            .iter()
            .position(|c| c == "Original air date")
            .unwrap();
        assert_eq!(dataset.rows[0][air], "1992-10-31");
        assert_eq!(dataset.rows[1][air], "1992-11-07");
        assert_eq!(dataset.rows[3][air], "1993-10-23");
    }

    #[test]
    fn page_without_episode_tables_is_fatal() {
        let err = extract_episodes("<html><body><p>moved</p></body></html>").unwrap_err();
        assert!(matches!(err, ScrapeError::NoEpisodeTables(_)));
    }
}
