use thiserror::Error;

/// Failure taxonomy for a scrape run.
///
/// Only structural problems are fatal: a transport/HTTP failure, a page
/// with no episode tables, or a table whose header lost one of the columns
/// the reconstruction needs. Per-row degradations (unexpected continuation
/// shapes, unparseable air dates) are absorbed where they occur and logged.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Network transport failure or non-success HTTP status.
    #[error("fetching {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The page layout changed: no table carries the episode-list marker.
    #[error("no tables with class \"{0}\" found on the page")]
    NoEpisodeTables(String),

    /// The page layout changed: a required header column is gone.
    #[error("episode table for season {season} has no \"{column}\" column")]
    MissingColumn { season: u32, column: &'static str },
}
