//! Backup and scoped file writes
//!
//! Replacing the saved-variables file is destructive and irreversible, so a
//! timestamped defensive copy is taken first. Writes are scoped: create,
//! write fully, flush, sync, close — the handle is released even when a
//! write fails partway.

use chrono::Local;
use gathermine_core::error::{Error, Result};
use gathermine_core::report::{ReportSink, RunEvent};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Build the backup path for a timestamp: `<path>.backup_<YYYYMMDD_HHMMSS>`
fn backup_path(path: &Path, stamp: &str) -> PathBuf {
    PathBuf::from(format!("{}.backup_{}", path.display(), stamp))
}

/// Take a timestamped defensive copy of `path` before it is overwritten
///
/// Returns the backup's path, or `None` when the target does not exist yet
/// (a first write needs no backup).
pub fn backup_file(path: &Path, sink: &dyn ReportSink) -> Result<Option<PathBuf>> {
    if !path.exists() {
        return Ok(None);
    }
    let stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let backup = backup_path(path, &stamp);
    std::fs::copy(path, &backup)?;
    debug!(from = %path.display(), to = %backup.display(), "backup copied");
    sink.report(RunEvent::BackupCreated {
        path: backup.clone(),
    });
    Ok(Some(backup))
}

/// Write text to a file with scoped-resource semantics
///
/// The whole content is written, flushed and synced before the handle
/// closes; the handle is released even if a write fails partway.
pub fn write_text(path: &Path, text: &str) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(text.as_bytes())?;
    file.flush()?;
    file.sync_all()
}

/// Write the merged persisted document back to its path
///
/// Failures map to [`Error::DocumentWrite`] carrying the target path: the
/// merge step is the only fatal casualty, table artifacts written earlier
/// stay valid.
pub fn write_document(path: &Path, text: &str) -> Result<()> {
    write_text(path, text).map_err(|source| Error::DocumentWrite {
        path: path.display().to_string(),
        source,
    })
}
