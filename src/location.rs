use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    Local,
    Remote,
    Invalid,
}

/// A resolved workbook location. The change-signature is recomputed on
/// every request and never cached, so a swapped workbook always produces
/// a fresh fingerprint.
#[derive(Debug, Clone)]
pub struct WorkbookLocation {
    pub raw: String,
    pub path: PathBuf,
    pub kind: LocationKind,
    /// Opaque signature derived from file metadata; `None` when the file
    /// is unreachable.
    pub signature: Option<String>,
}

/// Classify a workbook location string. Classification itself is pure
/// path-shape inspection; only the signature probe touches the filesystem.
/// Automation is attempted only against `Local` locations, `Remote`
/// (network-share) locations take the fast-read path, and `Invalid`
/// locations fail fast upstream.
pub fn classify(raw: &str) -> WorkbookLocation {
    let trimmed = raw.trim();
    let kind = kind_of(trimmed);
    let path = PathBuf::from(trimmed);
    let signature = match kind {
        LocationKind::Invalid => None,
        LocationKind::Local | LocationKind::Remote => path_signature(&path),
    };

    WorkbookLocation {
        raw: trimmed.to_string(),
        path,
        kind,
        signature,
    }
}

fn kind_of(path: &str) -> LocationKind {
    if path.is_empty() {
        return LocationKind::Invalid;
    }
    // URL schemes have no filesystem counterpart here; neither strategy
    // can consume them.
    if path.contains("://") {
        return LocationKind::Invalid;
    }
    if path.starts_with(r"\\") || path.starts_with("//") {
        return LocationKind::Remote;
    }
    LocationKind::Local
}

fn path_signature(path: &Path) -> Option<String> {
    let metadata = fs::metadata(path).ok()?;
    if !metadata.is_file() {
        return None;
    }
    let mtime = metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    Some(format!("{}-{}", metadata.len(), mtime))
}
