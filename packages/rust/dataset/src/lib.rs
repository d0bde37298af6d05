//! Dataset I/O: spreadsheet/CSV loading, tabular output, Parquet snapshots,
//! and JSON documents.
//!
//! Every writer encodes the whole file in memory first and then replaces the
//! target atomically, so a failed run never leaves a partial output behind.

mod json;
mod loader;
mod snapshot;
mod writer;

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::debug;

use pharmacorpus_shared::{PharmaCorpusError, Result};

pub use json::{read_json, write_json};
pub use loader::load_table;
pub use snapshot::write_snapshot;
pub use writer::write_table;

/// Metadata for a file written by one of the writers in this crate.
#[derive(Debug, Clone, serde::Serialize)]
pub struct OutputMeta {
    pub path: PathBuf,
    pub sha256: String,
    pub size_bytes: usize,
}

/// Tabular file formats, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Any workbook calamine can open (`xlsx`, `xlsm`, `xlsb`, `xls`, `ods`).
    Workbook,
    Csv,
}

impl TableFormat {
    /// Detect the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Self::Workbook),
            "csv" => Ok(Self::Csv),
            _ => Err(PharmaCorpusError::validation(format!(
                "unsupported table format for {} (expected .xlsx, .xls, .ods or .csv)",
                path.display()
            ))),
        }
    }
}

/// Write `bytes` to `path` through a sibling temp file and an atomic rename.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<OutputMeta> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| PharmaCorpusError::io(parent, e))?;
    }

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| PharmaCorpusError::write(path, "output path has no file name"))?;
    let temp = path.with_file_name(format!(".{file_name}.tmp"));

    std::fs::write(&temp, bytes).map_err(|e| PharmaCorpusError::io(&temp, e))?;
    if let Err(e) = std::fs::rename(&temp, path) {
        let _ = std::fs::remove_file(&temp);
        return Err(PharmaCorpusError::io(path, e));
    }

    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let sha256 = format!("{:x}", hasher.finalize());

    debug!(path = %path.display(), size = bytes.len(), "wrote file");

    Ok(OutputMeta {
        path: path.to_path_buf(),
        sha256,
        size_bytes: bytes.len(),
    })
}

#[cfg(test)]
pub(crate) fn temp_dir(prefix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("{prefix}-{}", uuid::Uuid::now_v7()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
