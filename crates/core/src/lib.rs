//! Core types for the gathermine node-data pipeline
//!
//! This crate defines the foundational vocabulary shared by every layer:
//! - Zone: a region of the world map, identified by its canonical map id
//! - Category: the class of recorded node (herb, ore, fish pool, treasure)
//! - PackedCoord: single-integer encoding of an in-zone position
//! - ZoneRegistry: external-id lookup owned by the data-supplying side
//! - Error: the workspace-wide error taxonomy
//! - ReportSink: injected sink for user-visible run events

pub mod coord;
pub mod error;
pub mod registry;
pub mod report;
pub mod types;

pub use coord::{allocate, encode, PackedCoord};
pub use error::{Error, Result};
pub use registry::ZoneRegistry;
pub use report::{NullSink, ReportSink, RunEvent, TracingSink};
pub use types::{Category, Partition, RawObservation, SourceId, Zone};
