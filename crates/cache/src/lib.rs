//! Per-partition delta cache
//!
//! Each partition (content expansion) keeps a JSON snapshot of every
//! `(zone, category, coordinate) → source` record ever aggregated for it.
//! At the start of a run all prior snapshots are merged into a read-only
//! union view; a record is *new* iff its composite key is absent from that
//! union. After the run, the processed partition's snapshot is rebuilt
//! wholesale from the aggregated tables and persisted with a timestamp.
//!
//! The cache tracks novelty only — it is never the source of truth for the
//! merged output, and losing it merely makes the next run report everything
//! as new.

pub mod snapshot;

pub use snapshot::{
    cache_file_name, composite_key, count_new, discover_partitions, CacheSnapshot, PriorView,
};
