mod headless;

pub use headless::HeadlessOfficeEngine;

use crate::grid::CostGrid;
use crate::layout::CellWrite;
use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    ReadOnly,
    ReadWrite,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("recalculation timed out after {0} ms")]
    Timeout(u64),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// One open workbook inside the external engine. Edits stay private to the
/// session (never saved back to the source workbook); `close` releases all
/// engine-side resources and must be called on every exit path.
#[async_trait]
pub trait EngineSession: Send {
    async fn write_cells(&mut self, sheet: &str, writes: &[CellWrite]) -> Result<()>;
    async fn recalculate(&mut self, timeout_ms: u64) -> Result<(), EngineError>;
    async fn read_grid(&mut self, sheet: &str) -> Result<CostGrid>;
    async fn close(&mut self) -> Result<()>;
}

/// The external calculation engine. Implementations are single-seat: the
/// orchestrator serializes sessions through a lease, so `open` is never
/// called concurrently in production use.
#[async_trait]
pub trait CalcEngine: Send + Sync {
    fn name(&self) -> &'static str;
    fn is_available(&self) -> bool;
    async fn open(&self, workbook: &Path, mode: OpenMode) -> Result<Box<dyn EngineSession>>;
}
