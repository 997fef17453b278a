//! Run pipeline
//!
//! Ties the layers together for one mining run: aggregate the supplied
//! observations per category, write the standalone table artifacts, update
//! the partition's delta cache, and (when configured) merge into the
//! externally-owned saved-variables document behind a timestamped backup.
//!
//! The pipeline is single-threaded and synchronous; the only concurrent
//! actor in the wider system is the fetching collaborator, which hands the
//! engine a fully materialized [`RunBatch`] in a defined order before
//! anything here starts.

pub mod run;

pub use run::{run, CategorySummary, RunBatch, RunConfig, RunSummary};
