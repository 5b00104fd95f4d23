use crate::errors::PricingError;
use crate::grid::CostGrid;
use crate::layout::SUMMARY_SHEET;
use crate::timing::{Phase, TimingRecorder};
use anyhow::{Context, anyhow};
use std::path::{Path, PathBuf};
use tokio::task;

/// Structured read of the stored workbook snapshot without the engine and
/// without recalculation. No shared state, so any number of fast reads may
/// run in parallel; only the `read` phase is timed.
pub async fn read_grid(path: &Path, timing: &mut TimingRecorder) -> Result<CostGrid, PricingError> {
    timing.start(Phase::Read);
    let owned: PathBuf = path.to_path_buf();
    let grid = task::spawn_blocking(move || read_grid_blocking(&owned))
        .await
        .map_err(|e| PricingError::engine("read", anyhow!("fast read task failed: {e}")))??;
    timing.stop(Phase::Read);
    Ok(grid)
}

fn read_grid_blocking(path: &Path) -> Result<CostGrid, PricingError> {
    let book = umya_spreadsheet::reader::xlsx::read(path)
        .map_err(anyhow::Error::from)
        .with_context(|| format!("failed to parse workbook '{}'", path.display()))
        .map_err(|e| PricingError::engine("read", e))?;

    let sheet = book.get_sheet_by_name(SUMMARY_SHEET).ok_or_else(|| {
        PricingError::engine(
            "read",
            anyhow!("summary sheet '{SUMMARY_SHEET}' not found in workbook"),
        )
    })?;

    Ok(CostGrid::from_sheet(sheet))
}
