//! Run event reporting
//!
//! The pipeline's entry points take an explicit [`ReportSink`] instead of
//! writing to a process-wide logger hook. Diagnostic detail still goes to
//! `tracing`; the sink carries the user-visible run narrative (what was
//! written, what degraded, how much of it was new) so a caller can render
//! progress however it likes.

use crate::types::{Category, Partition};
use std::path::PathBuf;
use tracing::{info, warn};

/// A user-visible event produced during a run
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    /// Upstream page's zone label disagreed with the registry's name
    ZoneNameMismatch {
        external_id: String,
        expected: String,
        found: String,
    },
    /// A category section of the persisted document failed to parse and is
    /// treated as empty for this merge (first-write semantics)
    CategoryParseFallback { category: Category },
    /// No prior cache snapshot exists for the partition (first run)
    CacheMissing { partition: Partition },
    /// Prior cache snapshot was unreadable and is treated as empty
    CacheCorrupt { partition: Partition, reason: String },
    /// Defensive copy of the merge target was created
    BackupCreated { path: PathBuf },
    /// A standalone category table artifact was written
    ArtifactWritten {
        category: Category,
        path: PathBuf,
        records: usize,
    },
    /// The merged persisted document was written back
    DocumentMerged { path: PathBuf },
    /// Novelty totals for one category after cache classification
    NewRecords {
        category: Category,
        total: usize,
        new: usize,
    },
}

/// Sink for user-visible run events
///
/// Injected into pipeline entry points; implementations must not panic.
pub trait ReportSink {
    /// Receive one event
    fn report(&self, event: RunEvent);
}

/// Default sink: forwards events to `tracing`
///
/// Degradations go out at `warn` level, progress at `info`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ReportSink for TracingSink {
    fn report(&self, event: RunEvent) {
        match event {
            RunEvent::ZoneNameMismatch {
                external_id,
                expected,
                found,
            } => {
                warn!(zone = %external_id, %expected, %found, "zone name mismatch");
            }
            RunEvent::CategoryParseFallback { category } => {
                warn!(%category, "category section unreadable, merging as first write");
            }
            RunEvent::CacheMissing { partition } => {
                info!(%partition, "no cache found (first run)");
            }
            RunEvent::CacheCorrupt { partition, reason } => {
                warn!(%partition, %reason, "could not load cache, treating as empty");
            }
            RunEvent::BackupCreated { path } => {
                info!(path = %path.display(), "backup created");
            }
            RunEvent::ArtifactWritten {
                category,
                path,
                records,
            } => {
                info!(%category, path = %path.display(), records, "table artifact written");
            }
            RunEvent::DocumentMerged { path } => {
                info!(path = %path.display(), "merged data into persisted document");
            }
            RunEvent::NewRecords {
                category,
                total,
                new,
            } => {
                info!(%category, total, new, "category totals");
            }
        }
    }
}

/// Sink that discards every event (tests, silent embedding)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ReportSink for NullSink {
    fn report(&self, _event: RunEvent) {}
}
