mod error;
mod export;
mod fetch;
mod parser;

use std::path::Path;
use std::time::Instant;

use tracing::info;

// ── Configuration ──
const WIKIPEDIA_URL: &str = "https://en.wikipedia.org/wiki/List_of_X-Men_(TV_series)_episodes";
const OUTPUT_CSV: &str = "xmen_episodes.csv";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();

    let html = fetch::fetch_page(WIKIPEDIA_URL).await?;
    let episodes = parser::extract_episodes(&html)?;
    info!("Reconstructed {} episode records", episodes.len());

    let dataset = parser::normalize(&episodes);
    export::write_csv(&dataset, Path::new(OUTPUT_CSV))?;

    println!(
        "Saved {} episodes ({} columns) to '{}' in {:.1}s",
        dataset.rows.len(),
        dataset.columns.len(),
        OUTPUT_CSV,
        t0.elapsed().as_secs_f64()
    );
    Ok(())
}
