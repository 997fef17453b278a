//! Error types for the gathermine pipeline
//!
//! This module defines all fatal error types used throughout the workspace.
//! We use `thiserror` for automatic `Display` and `Error` trait
//! implementations.
//!
//! Recoverable conditions (an unparseable category section, a missing or
//! corrupt cache file) are deliberately *not* represented here: they degrade
//! to empty data at the site of the failure and surface as warnings through
//! the report sink instead of aborting the run.

use std::io;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal error types for the pipeline
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Observation coordinate outside the `[0, 100]` percent range
    ///
    /// Never coerced: a clamped coordinate would corrupt the packing and
    /// ordering guarantees of the persisted table.
    #[error("coordinate ({x}, {y}) out of range [0, 100] in zone {zone}")]
    CoordinateOutOfRange {
        /// Canonical id of the zone the observation claimed
        zone: String,
        /// Offending horizontal percent
        x: f64,
        /// Offending vertical percent
        y: f64,
    },

    /// Zone canonical id is not numeric where numeric ordering is required
    #[error("zone id {0:?} is not numeric")]
    NonNumericZoneId(String),

    /// Cache snapshot serialization error
    #[error("cache snapshot error: {0}")]
    Snapshot(String),

    /// Persisted document could not be written
    ///
    /// Fatal for the merge step only; standalone table artifacts written
    /// earlier in the run remain valid.
    #[error("failed to write document {path}: {source}")]
    DocumentWrite {
        /// Target path of the merge output
        path: String,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Snapshot(e.to_string())
    }
}
