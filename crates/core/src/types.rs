//! Domain types for node-data aggregation
//!
//! This module defines the foundational types:
//! - Zone: world-map region, identity is the canonical map id
//! - SourceId: stable identifier of a tracked source object
//! - Category: class of recorded node, mapped to its persisted table name
//! - Partition: independent cache bucket (one per content expansion)
//! - RawObservation: one scraped coordinate, handed in by the collaborator

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A named region of the world map
///
/// Identity (equality and hashing) is defined by `canonical_id` alone.
/// `external_id` is the upstream lookup key and may alias: several external
/// ids can resolve to the same canonical zone. Zones are immutable once
/// constructed and are handed out as `Arc<Zone>` by [`ZoneRegistry`] so at
/// most one value exists per canonical id within a run.
///
/// [`ZoneRegistry`]: crate::registry::ZoneRegistry
#[derive(Debug, Clone)]
pub struct Zone {
    /// Upstream lookup key (not identity)
    pub external_id: String,
    /// Canonical map id used by the persisted table format
    pub canonical_id: String,
    /// Human-readable zone name
    pub display_name: String,
}

impl Zone {
    /// Create a new zone
    pub fn new(
        external_id: impl Into<String>,
        canonical_id: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Zone {
            external_id: external_id.into(),
            canonical_id: canonical_id.into(),
            display_name: display_name.into(),
        }
    }

    /// Canonical id as a number, for the table format's numeric ordering
    ///
    /// # Errors
    /// Returns [`Error::NonNumericZoneId`] if the canonical id does not
    /// parse as an unsigned integer. Numeric ordering is a correctness
    /// requirement of the serialized format, so this is never coerced.
    pub fn numeric_id(&self) -> Result<u64> {
        self.canonical_id
            .parse::<u64>()
            .map_err(|_| Error::NonNumericZoneId(self.canonical_id.clone()))
    }
}

impl PartialEq for Zone {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_id == other.canonical_id
    }
}

impl Eq for Zone {}

impl Hash for Zone {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical_id.hash(state);
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.display_name, self.canonical_id)
    }
}

/// Stable identifier of a tracked source object (a small integer as text)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(String);

impl SourceId {
    /// Create a source id
    pub fn new(id: impl Into<String>) -> Self {
        SourceId(id.into())
    }

    /// The id as text, exactly as it is persisted
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceId {
    fn from(s: &str) -> Self {
        SourceId(s.to_string())
    }
}

/// Class of recorded node
///
/// Each category is persisted as an independent table. The persisted label
/// differs from the category name for ores, which live under the historical
/// `Mine` table name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Herb,
    Ore,
    Fish,
    Treasure,
}

impl Category {
    /// All categories, in canonical document order
    pub const ALL: [Category; 4] = [
        Category::Herb,
        Category::Ore,
        Category::Fish,
        Category::Treasure,
    ];

    /// Label inside the persisted table name (`GatherMate2<label>DB`)
    pub fn db_label(self) -> &'static str {
        match self {
            Category::Herb => "Herb",
            Category::Ore => "Mine",
            Category::Fish => "Fish",
            Category::Treasure => "Treasure",
        }
    }

    /// Full persisted table name
    pub fn table_name(self) -> String {
        format!("GatherMate2{}DB", self.db_label())
    }

    /// Key fragment used in cache composite keys (`<zoneId>_<fragment>`)
    pub fn cache_key_part(self) -> &'static str {
        match self {
            Category::Herb => "herbs",
            Category::Ore => "ores",
            Category::Fish => "fish",
            Category::Treasure => "treasures",
        }
    }

    /// File stem of the standalone table artifact
    pub fn artifact_stem(self) -> &'static str {
        match self {
            Category::Herb => "Mined_HerbalismData",
            Category::Ore => "Mined_MiningData",
            Category::Fish => "Mined_FishData",
            Category::Treasure => "Mined_TreasureData",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cache_key_part())
    }
}

/// Independent cache bucket: the short code of a content expansion
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Partition(String);

impl Partition {
    /// Create a partition from an expansion short code (e.g. `"TWW"`)
    pub fn new(code: impl Into<String>) -> Self {
        Partition(code.into())
    }

    /// The short code as text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One raw scraped coordinate, supplied by the fetching collaborator
///
/// Coordinates are percentages of the zone map and must lie in `[0, 100]`;
/// out-of-range values are rejected at encode time, never coerced.
/// Ephemeral: observations are consumed by aggregation and never persisted.
#[derive(Debug, Clone)]
pub struct RawObservation {
    /// Zone the coordinate belongs to
    pub zone: Arc<Zone>,
    /// Horizontal position, percent of map width
    pub x: f64,
    /// Vertical position, percent of map height
    pub y: f64,
    /// Source object that produced this coordinate
    pub source: SourceId,
}

impl RawObservation {
    /// Create an observation
    pub fn new(zone: Arc<Zone>, x: f64, y: f64, source: SourceId) -> Self {
        RawObservation { zone, x, y, source }
    }
}
