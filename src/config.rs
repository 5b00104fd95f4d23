use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_RECALC_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_LEASE_WAIT_MS: u64 = 2_000;

/// Settings consumed from the surrounding application. Persistence and
/// domain validation happen upstream; this crate treats the struct as a
/// pre-validated value object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Gates all workbook access. When off, both automation and cache
    /// serving are disabled.
    pub compat_mode_enabled: bool,
    /// Local path or network-share path to the costing workbook.
    pub workbook_path: String,
    /// Hard ceiling on a single recalculation pass.
    pub recalc_timeout_ms: u64,
    /// Bounded wait for the single engine seat before failing busy.
    pub lease_wait_ms: u64,
    /// Override for the headless engine binary.
    pub engine_binary: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            compat_mode_enabled: true,
            workbook_path: String::new(),
            recalc_timeout_ms: DEFAULT_RECALC_TIMEOUT_MS,
            lease_wait_ms: DEFAULT_LEASE_WAIT_MS,
            engine_binary: None,
        }
    }
}

impl Settings {
    pub fn load_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse settings file '{}'", path.display()))
    }
}
