//! Cache snapshot model and novelty classification
//!
//! On-disk artifact, one file per partition (`node_cache_<PARTITION>.json`):
//!
//! ```json
//! {
//!   "expansion": "TWW",
//!   "last_run": "2026-08-07 12:00:00",
//!   "nodes": {
//!     "2248_herbs": { "1000200000": "401" }
//!   }
//! }
//! ```
//!
//! Load failures never abort a run: a missing file is a first run, a
//! corrupt file degrades to an empty snapshot with a warning. Both make
//! every record of that partition classify as new, which is the safe
//! direction for a novelty tracker.

use chrono::Local;
use gathermine_core::coord::PackedCoord;
use gathermine_core::error::Result;
use gathermine_core::report::{ReportSink, RunEvent};
use gathermine_core::types::{Category, Partition};
use gathermine_table::ZoneMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::{debug, warn};

/// File name of a partition's snapshot
pub fn cache_file_name(partition: &Partition) -> String {
    format!("node_cache_{}.json", partition)
}

/// Composite key grouping one zone's records of one category
pub fn composite_key(zone_id: u64, category: Category) -> String {
    format!("{}_{}", zone_id, category.cache_key_part())
}

/// Persisted snapshot of everything ever aggregated for one partition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSnapshot {
    /// Partition short code
    pub expansion: String,
    /// Timestamp of the run that wrote this snapshot
    pub last_run: String,
    /// `"<zoneId>_<category>"` → packed-coordinate text → source id
    pub nodes: BTreeMap<String, BTreeMap<String, String>>,
}

impl CacheSnapshot {
    /// An empty snapshot for a partition that has never run
    pub fn empty(partition: &Partition) -> Self {
        CacheSnapshot {
            expansion: partition.to_string(),
            last_run: "never".to_string(),
            nodes: BTreeMap::new(),
        }
    }

    /// Rebuild a partition's snapshot wholesale from this run's aggregates
    ///
    /// Coordinates are the post-collision values of the aggregated tables,
    /// so cache keys always match what was serialized.
    pub fn from_tables(
        partition: &Partition,
        tables: &BTreeMap<Category, ZoneMap>,
    ) -> Self {
        let mut nodes: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        for (category, zones) in tables {
            for (zone_id, entries) in zones {
                if entries.is_empty() {
                    continue;
                }
                let bucket = nodes.entry(composite_key(*zone_id, *category)).or_default();
                for (coord, source) in entries {
                    bucket.insert(coord.to_string(), source.clone());
                }
            }
        }
        CacheSnapshot {
            expansion: partition.to_string(),
            last_run: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            nodes,
        }
    }

    /// Total number of cached records
    pub fn len(&self) -> usize {
        self.nodes.values().map(BTreeMap::len).sum()
    }

    /// Whether the snapshot holds no records
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Load a partition's snapshot from `dir`
    ///
    /// Missing and corrupt files both degrade to an empty snapshot; only
    /// the latter is a warning.
    pub fn load(dir: &Path, partition: &Partition, sink: &dyn ReportSink) -> Self {
        let path = dir.join(cache_file_name(partition));
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(_) => {
                sink.report(RunEvent::CacheMissing {
                    partition: partition.clone(),
                });
                return CacheSnapshot::empty(partition);
            }
        };
        match serde_json::from_str(&text) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                sink.report(RunEvent::CacheCorrupt {
                    partition: partition.clone(),
                    reason: e.to_string(),
                });
                CacheSnapshot::empty(partition)
            }
        }
    }

    /// Persist the snapshot into `dir`, wholesale replacement
    pub fn save(&self, dir: &Path) -> Result<()> {
        let path = dir.join(cache_file_name(&Partition::new(self.expansion.clone())));
        let text = serde_json::to_string_pretty(self)?;
        let mut file = File::create(&path)?;
        file.write_all(text.as_bytes())?;
        file.flush()?;
        debug!(path = %path.display(), records = self.len(), "cache snapshot saved");
        Ok(())
    }
}

/// Read-only union of all prior partition snapshots
///
/// Presence, not value equality, decides novelty: a coordinate key that
/// reappears with a different source id still counts as already seen.
#[derive(Debug, Default)]
pub struct PriorView {
    nodes: BTreeMap<String, BTreeMap<String, String>>,
}

impl PriorView {
    /// An empty view (first run ever)
    pub fn new() -> Self {
        PriorView::default()
    }

    /// Fold one partition's snapshot into the union
    pub fn absorb(&mut self, snapshot: &CacheSnapshot) {
        for (key, bucket) in &snapshot.nodes {
            self.nodes
                .entry(key.clone())
                .or_default()
                .extend(bucket.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
    }

    /// Whether a record was never seen in any prior partition snapshot
    pub fn is_new(&self, zone_id: u64, category: Category, coord: PackedCoord) -> bool {
        !self
            .nodes
            .get(&composite_key(zone_id, category))
            .map_or(false, |bucket| bucket.contains_key(&coord.to_string()))
    }

    /// Total number of records in the union
    pub fn len(&self) -> usize {
        self.nodes.values().map(BTreeMap::len).sum()
    }

    /// Whether no prior records exist at all
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Count how many of a table's records are new against the prior view
pub fn count_new(view: &PriorView, category: Category, zones: &ZoneMap) -> usize {
    zones
        .iter()
        .flat_map(|(zone_id, entries)| {
            entries
                .keys()
                .filter(|coord| view.is_new(*zone_id, category, PackedCoord::from_raw(**coord)))
        })
        .count()
}

/// Partitions with a snapshot file present in `dir`
///
/// An unreadable directory yields no partitions; the run proceeds with
/// everything classified as new.
pub fn discover_partitions(dir: &Path) -> Vec<Partition> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "could not scan for cache snapshots");
            return Vec::new();
        }
    };
    let mut partitions: Vec<Partition> = entries
        .filter_map(|entry| {
            let name = entry.ok()?.file_name().into_string().ok()?;
            let code = name
                .strip_prefix("node_cache_")?
                .strip_suffix(".json")?
                .to_string();
            if code.is_empty() {
                None
            } else {
                Some(Partition::new(code))
            }
        })
        .collect();
    partitions.sort();
    partitions
}
