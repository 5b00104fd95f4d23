use crate::engine::{CalcEngine, EngineError, EngineSession, OpenMode};
use crate::errors::PricingError;
use crate::grid::CostGrid;
use crate::layout::{CellWrite, SUMMARY_SHEET};
use crate::timing::{Phase, TimingRecorder};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Lease over the single engine seat. Acquisition is the only blocking
/// point in a computation and the wait is bounded; a miss fails
/// `EngineBusy` instead of queuing indefinitely.
#[derive(Clone)]
pub struct EngineLease(Arc<Semaphore>);

impl EngineLease {
    pub fn new() -> Self {
        Self(Arc::new(Semaphore::new(1)))
    }

    pub async fn acquire(&self, wait_ms: u64) -> Result<OwnedSemaphorePermit, PricingError> {
        tokio::time::timeout(
            Duration::from_millis(wait_ms),
            self.0.clone().acquire_owned(),
        )
        .await
        .map_err(|_| PricingError::EngineBusy)?
        .map_err(|_| PricingError::EngineBusy)
    }

    /// Free seats (0 while a session runs, 1 when idle).
    pub fn available(&self) -> usize {
        self.0.available_permits()
    }
}

impl Default for EngineLease {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct AutomationOutcome {
    pub grid: CostGrid,
    pub opened_readonly: bool,
}

/// One full automation lifecycle: open (read-write, falling back to
/// read-only on lock contention), write the input cells, recalculate,
/// read the bounded grid. Close runs on every exit path so a failed
/// write or recalculation never leaks an engine process. The caller must
/// already hold the engine lease.
pub async fn run_session(
    engine: &dyn CalcEngine,
    workbook: &Path,
    writes: &[CellWrite],
    recalc_timeout_ms: u64,
    timing: &mut TimingRecorder,
) -> Result<AutomationOutcome, PricingError> {
    timing.start(Phase::Open);
    let (mut session, opened_readonly) = open_with_fallback(engine, workbook).await?;
    timing.stop(Phase::Open);

    let result = drive(session.as_mut(), writes, recalc_timeout_ms, timing).await;

    if let Err(e) = session.close().await {
        tracing::warn!(error = %e, "engine session close failed");
    }

    let grid = result?;
    Ok(AutomationOutcome {
        grid,
        opened_readonly,
    })
}

/// Read-only warm pass: open, recalculate, close. Primes the external
/// engine without writing inputs or touching the cache.
pub async fn run_warm_session(
    engine: &dyn CalcEngine,
    workbook: &Path,
    recalc_timeout_ms: u64,
    timing: &mut TimingRecorder,
) -> Result<(), PricingError> {
    timing.start(Phase::Open);
    let mut session = engine
        .open(workbook, OpenMode::ReadOnly)
        .await
        .map_err(|e| PricingError::engine("open", e))?;
    timing.stop(Phase::Open);

    timing.start(Phase::Calc);
    let result = session.recalculate(recalc_timeout_ms).await;
    timing.stop(Phase::Calc);

    if let Err(e) = session.close().await {
        tracing::warn!(error = %e, "engine session close failed");
    }
    result.map_err(map_recalc_error)
}

async fn open_with_fallback(
    engine: &dyn CalcEngine,
    workbook: &Path,
) -> Result<(Box<dyn EngineSession>, bool), PricingError> {
    match engine.open(workbook, OpenMode::ReadWrite).await {
        Ok(session) => Ok((session, false)),
        Err(rw_err) => {
            tracing::warn!(error = %rw_err, "read-write open failed; falling back to read-only");
            let session = engine
                .open(workbook, OpenMode::ReadOnly)
                .await
                .map_err(|e| PricingError::engine("open", e))?;
            Ok((session, true))
        }
    }
}

async fn drive(
    session: &mut dyn EngineSession,
    writes: &[CellWrite],
    recalc_timeout_ms: u64,
    timing: &mut TimingRecorder,
) -> Result<CostGrid, PricingError> {
    timing.start(Phase::Write);
    session
        .write_cells(SUMMARY_SHEET, writes)
        .await
        .map_err(|e| PricingError::engine("write", e))?;
    timing.stop(Phase::Write);

    timing.start(Phase::Calc);
    session
        .recalculate(recalc_timeout_ms)
        .await
        .map_err(map_recalc_error)?;
    timing.stop(Phase::Calc);

    timing.start(Phase::Read);
    let grid = session
        .read_grid(SUMMARY_SHEET)
        .await
        .map_err(|e| PricingError::engine("read", e))?;
    timing.stop(Phase::Read);

    Ok(grid)
}

fn map_recalc_error(err: EngineError) -> PricingError {
    match err {
        EngineError::Timeout(ms) => PricingError::RecalcTimeout(ms),
        EngineError::Other(e) => PricingError::engine("calc", e),
    }
}
