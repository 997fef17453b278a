//! Shared helpers for the pipeline suites

use gathermine::{Category, Partition, RawObservation, RunBatch, SourceId, Zone};
use std::sync::Arc;

pub fn zone(external: &str, canonical: &str, name: &str) -> Arc<Zone> {
    Arc::new(Zone::new(external, canonical, name))
}

/// Batch for one partition from `(category, zone, x, y, source)` rows,
/// preserving row order
pub fn batch(
    partition: &str,
    rows: &[(Category, &Arc<Zone>, f64, f64, &str)],
) -> RunBatch {
    let mut batch = RunBatch::new(Partition::new(partition));
    for (category, zone, x, y, source) in rows {
        batch.push(
            *category,
            RawObservation::new((*zone).clone(), *x, *y, SourceId::new(*source)),
        );
    }
    batch
}
