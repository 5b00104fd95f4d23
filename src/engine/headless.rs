use super::{CalcEngine, EngineError, EngineSession, OpenMode};
use crate::grid::CostGrid;
use crate::layout::CellWrite;
use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tempfile::TempDir;
use tokio::process::Command;
use tokio::task;
use tokio::time;

const DEFAULT_BINARY: &str = "/usr/bin/soffice";

/// Calculation engine backed by a headless office process. Each session
/// works on a private copy of the workbook in a temp dir, so source
/// workbooks are never mutated and concurrent fast reads stay safe.
pub struct HeadlessOfficeEngine {
    binary: PathBuf,
}

impl HeadlessOfficeEngine {
    pub fn new(binary: Option<PathBuf>) -> Self {
        Self {
            binary: binary.unwrap_or_else(|| PathBuf::from(DEFAULT_BINARY)),
        }
    }
}

#[async_trait]
impl CalcEngine for HeadlessOfficeEngine {
    fn name(&self) -> &'static str {
        "headless_office"
    }

    fn is_available(&self) -> bool {
        self.binary.exists()
    }

    async fn open(&self, workbook: &Path, mode: OpenMode) -> Result<Box<dyn EngineSession>> {
        let source = workbook
            .canonicalize()
            .with_context(|| format!("failed to canonicalize '{}'", workbook.display()))?;

        if mode == OpenMode::ReadWrite {
            // Surfaces lock contention at open time, mirroring an exclusive
            // open; edits themselves land in the private copy.
            OpenOptions::new()
                .read(true)
                .write(true)
                .open(&source)
                .with_context(|| {
                    format!("workbook '{}' is locked or read-only", source.display())
                })?;
        }

        let work_dir = TempDir::new().context("failed to create session work dir")?;
        let work_path = work_dir.path().join("session.xlsx");
        tokio::fs::copy(&source, &work_path)
            .await
            .with_context(|| format!("failed to stage '{}'", source.display()))?;

        Ok(Box::new(HeadlessSession {
            binary: self.binary.clone(),
            work_dir: Some(work_dir),
            work_path,
        }))
    }
}

struct HeadlessSession {
    binary: PathBuf,
    work_dir: Option<TempDir>,
    work_path: PathBuf,
}

#[async_trait]
impl EngineSession for HeadlessSession {
    async fn write_cells(&mut self, sheet: &str, writes: &[CellWrite]) -> Result<()> {
        let path = self.work_path.clone();
        let sheet = sheet.to_string();
        let writes = writes.to_vec();
        task::spawn_blocking(move || apply_writes(&path, &sheet, &writes))
            .await
            .map_err(|e| anyhow!("write task failed: {e}"))?
    }

    async fn recalculate(&mut self, timeout_ms: u64) -> Result<(), EngineError> {
        let file_url = format!("file://{}", self.work_path.display());
        let macro_uri = recalc_and_save_uri(&file_url)?;
        let profile_dir = self
            .work_dir
            .as_ref()
            .ok_or_else(|| anyhow!("session already closed"))?
            .path()
            .join(format!("profile-{}", uuid::Uuid::new_v4()));

        let output = time::timeout(
            Duration::from_millis(timeout_ms),
            Command::new(&self.binary)
                .args([
                    "--headless",
                    "--norestore",
                    "--nodefault",
                    "--nofirststartwizard",
                    "--nolockcheck",
                    "--calc",
                    &format!("-env:UserInstallation=file://{}", profile_dir.display()),
                    &macro_uri,
                ])
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .output(),
        )
        .await
        .map_err(|_| EngineError::Timeout(timeout_ms))?
        .map_err(|e| anyhow!("failed to spawn '{}': {e}", self.binary.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EngineError::Other(anyhow!(
                "recalculation failed (exit {}): {}",
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }
        Ok(())
    }

    async fn read_grid(&mut self, sheet: &str) -> Result<CostGrid> {
        let path = self.work_path.clone();
        let sheet = sheet.to_string();
        task::spawn_blocking(move || read_grid_blocking(&path, &sheet))
            .await
            .map_err(|e| anyhow!("read task failed: {e}"))?
    }

    async fn close(&mut self) -> Result<()> {
        let Some(work_dir) = self.work_dir.take() else {
            return Ok(());
        };
        task::spawn_blocking(move || work_dir.close().map_err(anyhow::Error::from))
            .await
            .map_err(|e| anyhow!("close task failed: {e}"))?
    }
}

fn apply_writes(path: &Path, sheet_name: &str, writes: &[CellWrite]) -> Result<()> {
    let mut book = umya_spreadsheet::reader::xlsx::read(path)
        .with_context(|| format!("failed to open workbook '{}'", path.display()))?;

    let sheet = book
        .get_sheet_by_name_mut(sheet_name)
        .ok_or_else(|| anyhow!("sheet '{}' not found", sheet_name))?;

    for write in writes {
        sheet
            .get_cell_mut(write.address.as_str())
            .set_value_number(write.value);
    }

    umya_spreadsheet::writer::xlsx::write(&book, path)
        .with_context(|| format!("failed to save workbook '{}'", path.display()))?;
    Ok(())
}

fn read_grid_blocking(path: &Path, sheet_name: &str) -> Result<CostGrid> {
    let book = umya_spreadsheet::reader::xlsx::read(path)
        .with_context(|| format!("failed to open workbook '{}'", path.display()))?;
    let sheet = book
        .get_sheet_by_name(sheet_name)
        .ok_or_else(|| anyhow!("sheet '{}' not found", sheet_name))?;
    Ok(CostGrid::from_sheet(sheet))
}

/// `macro:///...` URI for the shipped RecalculateAndSave Basic macro, with
/// the argument escaped for Basic string literal context.
fn recalc_and_save_uri(workbook_url: &str) -> Result<String> {
    if workbook_url.chars().any(|c| c.is_control()) {
        bail!("workbook url must not contain control characters");
    }
    let mut literal = String::with_capacity(workbook_url.len() + 2);
    literal.push('"');
    for ch in workbook_url.chars() {
        if ch == '"' {
            literal.push('"');
        }
        literal.push(ch);
    }
    literal.push('"');
    Ok(format!(
        "macro:///Standard.Module1.RecalculateAndSave({literal})"
    ))
}
