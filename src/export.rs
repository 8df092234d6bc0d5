use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::parser::Dataset;

/// Write the dataset to `path`, overwriting any existing file. This runs
/// only after reconstruction and normalization have both completed, so a
/// failed run never leaves a partial file at the destination.
pub fn write_csv(dataset: &Dataset, path: &Path) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;

    writer.write_record(&dataset.columns)?;
    for row in &dataset.rows {
        writer.write_record(row)?;
    }
    writer
        .flush()
        .with_context(|| format!("flushing {}", path.display()))?;

    info!("Wrote {} rows to {}", dataset.rows.len(), path.display());
    Ok(())
}

// ── Tests ──
