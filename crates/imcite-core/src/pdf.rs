//! PDF resolution and hand-off to the platform opener

use std::path::{Path, PathBuf};

use crate::error::{ImciteError, Result};
use crate::record::PaperRecord;

/// Resolve the PDF path stored on a record, verifying it still exists on
/// disk at invocation time.
pub fn resolve_pdf_path(record: &PaperRecord) -> Result<PathBuf> {
    let path = record
        .pdf_path
        .clone()
        .ok_or_else(|| ImciteError::PdfMissing(record.cite_key.clone()))?;
    ensure_exists(path)
}

/// Fail with `FileNotFound` when the path has gone stale.
pub fn ensure_exists(path: PathBuf) -> Result<PathBuf> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(ImciteError::FileNotFound(path))
    }
}

/// Hand a path to the platform's default application. The viewer process
/// is not managed or awaited.
pub fn open_path(path: &Path) -> Result<()> {
    tracing::debug!(path = %path.display(), "opening with default application");
    opener::open(path).map_err(|e| ImciteError::OpenFailed(e.to_string()))
}
