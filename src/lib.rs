//! Gathermine - resource-node table miner for GatherMate2-format addon data
//!
//! Gathermine turns raw per-object coordinate observations into the compact,
//! versioned table files a gathering addon consumes: packed-coordinate
//! encoding, per-zone aggregation with collision resolution, canonical
//! serialization, non-destructive merging into an existing saved-variables
//! document, and a per-expansion delta cache that tracks which records are
//! new across runs.
//!
//! # Quick Start
//!
//! ```ignore
//! use gathermine::{run, Partition, RunBatch, RunConfig, TracingSink};
//! use gathermine::{Category, RawObservation, SourceId, ZoneRegistry};
//!
//! let mut registry = ZoneRegistry::new();
//! let zone = registry.insert("331", "63", "Ashenvale");
//!
//! let mut batch = RunBatch::new(Partition::new("TWW"));
//! batch.push(
//!     Category::Herb,
//!     RawObservation::new(zone, 10.0, 20.0, SourceId::new("401")),
//! );
//!
//! let summary = run(&RunConfig::new("out"), batch, &TracingSink)?;
//! println!("{} new records", summary.total_new());
//! ```
//!
//! # Architecture
//!
//! Fetching and scraping are not part of this crate: a collaborator hands
//! the pipeline a fully materialized [`RunBatch`] and consumes the written
//! artifacts. The layers underneath ([`gathermine_table`],
//! [`gathermine_store`], [`gathermine_cache`]) are re-exported for callers
//! that need the pieces individually.

pub use gathermine_core::{
    Category, Error, NullSink, PackedCoord, Partition, RawObservation, ReportSink, Result,
    RunEvent, SourceId, TracingSink, Zone, ZoneRegistry,
};
pub use gathermine_engine::{run, CategorySummary, RunBatch, RunConfig, RunSummary};

pub use gathermine_cache as cache;
pub use gathermine_store as store;
pub use gathermine_table as table;
