#![allow(dead_code)]

use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use parking_lot::Mutex;
use quote_pricing::engine::{CalcEngine, EngineError, EngineSession, OpenMode};
use quote_pricing::grid::CostGrid;
use quote_pricing::layout::CellWrite;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    Open,
    OpenReadWrite,
    Write,
    Calc,
    CalcTimeout,
    Read,
}

/// Instrumentation shared between a fake engine and its sessions. Tests
/// assert on these counters to prove exclusivity and leak-freedom.
#[derive(Debug, Default)]
pub struct FakeEngineState {
    pub active: AtomicUsize,
    pub opens: AtomicUsize,
    pub closes: AtomicUsize,
    pub overlapped: AtomicBool,
}

pub struct FakeEngine {
    pub state: Arc<FakeEngineState>,
    grid: CostGrid,
    fail: Mutex<Option<FailPoint>>,
    calc_delay: Duration,
    available: bool,
}

impl FakeEngine {
    pub fn new(grid: CostGrid) -> Self {
        Self {
            state: Arc::new(FakeEngineState::default()),
            grid,
            fail: Mutex::new(None),
            calc_delay: Duration::ZERO,
            available: true,
        }
    }

    pub fn unavailable(grid: CostGrid) -> Self {
        Self {
            available: false,
            ..Self::new(grid)
        }
    }

    pub fn with_calc_delay(mut self, delay: Duration) -> Self {
        self.calc_delay = delay;
        self
    }

    pub fn set_fail(&self, fail: Option<FailPoint>) {
        *self.fail.lock() = fail;
    }
}

#[async_trait]
impl CalcEngine for FakeEngine {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn is_available(&self) -> bool {
        self.available
    }

    async fn open(&self, _workbook: &Path, mode: OpenMode) -> Result<Box<dyn EngineSession>> {
        let fail = *self.fail.lock();
        if fail == Some(FailPoint::Open) {
            bail!("injected open failure");
        }
        if fail == Some(FailPoint::OpenReadWrite) && mode == OpenMode::ReadWrite {
            bail!("injected read-write open failure");
        }

        let previously_active = self.state.active.fetch_add(1, Ordering::SeqCst);
        if previously_active > 0 {
            self.state.overlapped.store(true, Ordering::SeqCst);
        }
        self.state.opens.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(FakeSession {
            state: self.state.clone(),
            grid: self.grid.clone(),
            fail,
            calc_delay: self.calc_delay,
            closed: false,
        }))
    }
}

struct FakeSession {
    state: Arc<FakeEngineState>,
    grid: CostGrid,
    fail: Option<FailPoint>,
    calc_delay: Duration,
    closed: bool,
}

#[async_trait]
impl EngineSession for FakeSession {
    async fn write_cells(&mut self, _sheet: &str, _writes: &[CellWrite]) -> Result<()> {
        if self.fail == Some(FailPoint::Write) {
            bail!("injected write failure");
        }
        Ok(())
    }

    async fn recalculate(&mut self, timeout_ms: u64) -> Result<(), EngineError> {
        if !self.calc_delay.is_zero() {
            tokio::time::sleep(self.calc_delay).await;
        }
        match self.fail {
            Some(FailPoint::Calc) => Err(EngineError::Other(anyhow!("injected calc failure"))),
            Some(FailPoint::CalcTimeout) => Err(EngineError::Timeout(timeout_ms)),
            _ => Ok(()),
        }
    }

    async fn read_grid(&mut self, _sheet: &str) -> Result<CostGrid> {
        if self.fail == Some(FailPoint::Read) {
            bail!("injected read failure");
        }
        Ok(self.grid.clone())
    }

    async fn close(&mut self) -> Result<()> {
        if !self.closed {
            self.closed = true;
            self.state.active.fetch_sub(1, Ordering::SeqCst);
            self.state.closes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}
