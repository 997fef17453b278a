//! Observation aggregation
//!
//! Groups individual `(zone, x, y, source)` observations into a per-zone,
//! collision-free table for one category. Every observation yields exactly
//! one entry: when two observations round to the identical packed value the
//! later one is bumped into the reserved low digits, never dropped.
//!
//! ## Ordering
//!
//! Collision resolution is order-dependent within a zone: the packed value
//! an observation ends up with depends on what was already placed there.
//! Callers must feed observations in a defined order (source registration
//! order) so results are reproducible across runs.

use crate::ZoneMap;
use gathermine_core::coord::{allocate, encode, PackedCoord};
use gathermine_core::error::Result;
use gathermine_core::types::{Category, RawObservation, SourceId, Zone};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// One aggregated record: a unique packed coordinate and its source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Packed coordinate, unique within its zone after collision resolution
    pub coord: PackedCoord,
    /// Source object that produced the record
    pub source: SourceId,
}

/// Entries collected for one zone
#[derive(Debug, Clone)]
pub struct ZoneEntries {
    zone: Arc<Zone>,
    /// Entries in insertion order; rendering sorts by coordinate
    entries: Vec<Entry>,
    /// Packed values already placed in this zone, the allocation state
    occupied: BTreeSet<PackedCoord>,
}

impl ZoneEntries {
    fn new(zone: Arc<Zone>) -> Self {
        ZoneEntries {
            zone,
            entries: Vec::new(),
            occupied: BTreeSet::new(),
        }
    }

    /// The zone these entries belong to
    pub fn zone(&self) -> &Arc<Zone> {
        &self.zone
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    fn place(&mut self, hint: PackedCoord, source: SourceId) -> PackedCoord {
        let coord = allocate(hint, &self.occupied);
        self.occupied.insert(coord);
        self.entries.push(Entry { coord, source });
        coord
    }
}

/// Per-zone aggregate for one record category
///
/// Zones are keyed by the numeric value of their canonical id, so iteration
/// already follows the canonical ascending order of the persisted format.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    category: Category,
    zones: BTreeMap<u64, ZoneEntries>,
}

impl CategoryTable {
    /// Create an empty table for a category
    pub fn new(category: Category) -> Self {
        CategoryTable {
            category,
            zones: BTreeMap::new(),
        }
    }

    /// Aggregate a whole observation sequence
    ///
    /// Total over well-formed input. Out-of-range coordinates and
    /// non-numeric canonical ids are caller precondition violations and
    /// abort the aggregation.
    pub fn aggregate<I>(category: Category, observations: I) -> Result<Self>
    where
        I: IntoIterator<Item = RawObservation>,
    {
        let mut table = CategoryTable::new(category);
        for obs in observations {
            table.add(obs)?;
        }
        Ok(table)
    }

    /// Place one observation, resolving collisions against everything
    /// already in its zone
    ///
    /// Returns the packed coordinate the entry ended up with.
    pub fn add(&mut self, obs: RawObservation) -> Result<PackedCoord> {
        let hint = encode(&obs.zone, obs.x, obs.y)?;
        let zone_id = obs.zone.numeric_id()?;
        let slot = self
            .zones
            .entry(zone_id)
            .or_insert_with(|| ZoneEntries::new(obs.zone.clone()));
        Ok(slot.place(hint, obs.source))
    }

    /// The table's category
    pub fn category(&self) -> Category {
        self.category
    }

    /// Zones ascending by numeric canonical id
    pub fn zones(&self) -> impl Iterator<Item = (u64, &ZoneEntries)> {
        self.zones.iter().map(|(id, z)| (*id, z))
    }

    /// Total number of entries across all zones
    pub fn len(&self) -> usize {
        self.zones.values().map(|z| z.entries.len()).sum()
    }

    /// Whether the table holds no entries
    pub fn is_empty(&self) -> bool {
        self.zones.values().all(|z| z.entries.is_empty())
    }

    /// Structured form for merging and cache classification
    pub fn to_zone_map(&self) -> ZoneMap {
        let mut map = ZoneMap::new();
        for (zone_id, slot) in &self.zones {
            let inner = map.entry(*zone_id).or_default();
            for entry in &slot.entries {
                inner.insert(entry.coord.get(), entry.source.as_str().to_string());
            }
        }
        map
    }
}
