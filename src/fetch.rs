use std::time::Duration;

use tracing::info;

use crate::error::ScrapeError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetch the page body from `url`. Any transport failure or non-success
/// status is fatal; there is nothing to reconstruct without the page.
pub async fn fetch_page(url: &str) -> Result<String, ScrapeError> {
    let fetch_err = |source| ScrapeError::Fetch {
        url: url.to_string(),
        source,
    };

    let client = reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(fetch_err)?;

    info!("Fetching {}", url);
    let body = client
        .get(url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(fetch_err)?
        .text()
        .await
        .map_err(fetch_err)?;

    info!("Received {} bytes", body.len());
    Ok(body)
}
