//! Observation file → RunBatch conversion
//!
//! The CLI stands in for the scraping collaborator: it reads a JSON file of
//! already-fetched observations and builds the registry and batch the
//! pipeline consumes. Object order in the file is preserved — collision
//! resolution downstream depends on it.
//!
//! ```json
//! {
//!   "expansion": "TWW",
//!   "zones": [
//!     { "external_id": "331", "canonical_id": "63", "name": "Ashenvale" }
//!   ],
//!   "suppressed": ["6511"],
//!   "objects": [
//!     {
//!       "source_id": "401",
//!       "category": "herb",
//!       "name": "Mycobloom",
//!       "locations": [
//!         { "zone": "331", "coords": [[10.0, 20.0], [34.5, 61.2]] }
//!       ]
//!     }
//!   ]
//! }
//! ```

use gathermine_core::report::ReportSink;
use gathermine_core::types::{Category, Partition, RawObservation, SourceId};
use gathermine_core::ZoneRegistry;
use gathermine_engine::RunBatch;
use serde::Deserialize;
use tracing::warn;

/// Top-level observation file
#[derive(Debug, Deserialize)]
pub struct ObservationFile {
    /// Partition (expansion short code) the whole file belongs to
    pub expansion: String,
    /// Zone lookup table
    #[serde(default)]
    pub zones: Vec<ZoneDef>,
    /// External ids whose absence from the lookup is expected
    #[serde(default)]
    pub suppressed: Vec<String>,
    /// Tracked source objects, in registration order
    #[serde(default)]
    pub objects: Vec<SourceObject>,
}

/// One zone lookup entry
#[derive(Debug, Deserialize)]
pub struct ZoneDef {
    pub external_id: String,
    pub canonical_id: String,
    pub name: String,
}

/// One tracked source object and its fetched locations
#[derive(Debug, Deserialize)]
pub struct SourceObject {
    pub source_id: String,
    pub category: Category,
    /// Display name, for diagnostics only
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub locations: Vec<Location>,
}

/// Coordinates fetched for one zone of one object
#[derive(Debug, Deserialize)]
pub struct Location {
    /// External zone id, resolved through the lookup table
    pub zone: String,
    /// Zone label as the upstream page showed it, cross-checked if present
    #[serde(default)]
    pub zone_name: Option<String>,
    pub coords: Vec<(f64, f64)>,
}

/// Build the registry and batch from a parsed observation file
pub fn build_batch(file: ObservationFile, sink: &dyn ReportSink) -> RunBatch {
    let mut registry = ZoneRegistry::new();
    for def in &file.zones {
        registry.insert(&*def.external_id, &*def.canonical_id, &*def.name);
    }
    for external_id in &file.suppressed {
        registry.suppress(external_id.clone());
    }

    let mut batch = RunBatch::new(Partition::new(file.expansion));
    for object in file.objects {
        let source = SourceId::new(object.source_id);
        for location in object.locations {
            let zone = match &location.zone_name {
                Some(seen) => registry.resolve_named(&location.zone, seen, sink),
                None => registry.resolve(&location.zone),
            };
            let Some(zone) = zone else {
                if !registry.is_suppressed(&location.zone) {
                    warn!(
                        zone = %location.zone,
                        object = object.name.as_deref().unwrap_or("?"),
                        "found unlisted zone"
                    );
                }
                continue;
            };
            for (x, y) in location.coords {
                batch.push(
                    object.category,
                    RawObservation::new(zone.clone(), x, y, source.clone()),
                );
            }
        }
    }
    batch
}
