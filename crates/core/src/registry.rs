//! Zone registry: external-id lookup and zone interning
//!
//! The fetching collaborator owns a table mapping upstream zone ids to the
//! zones of the persisted format. The registry enforces the interning
//! invariant behind that table: at most one [`Zone`] value exists per
//! canonical id within a run, no matter how many external ids alias it.
//! Every resolve for an alias hands back the same `Arc<Zone>`.
//!
//! A suppression list covers upstream maps (dungeons, scenarios) whose
//! absence from the lookup is expected; unresolved ids outside that list are
//! worth a warning, suppressed ids are not.

use crate::report::{ReportSink, RunEvent};
use crate::types::Zone;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// External-id → zone lookup with canonical-id interning
#[derive(Debug, Default)]
pub struct ZoneRegistry {
    /// Zones by external (upstream) id
    by_external: HashMap<String, Arc<Zone>>,
    /// Interned zones by canonical id
    by_canonical: HashMap<String, Arc<Zone>>,
    /// External ids whose absence from the lookup is expected
    suppressed: HashSet<String>,
}

impl ZoneRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        ZoneRegistry::default()
    }

    /// Register a zone under an external id
    ///
    /// If the canonical id is already interned, the existing zone value is
    /// reused and the external id becomes an alias for it; the zone's
    /// original display name and external id are kept. Returns the interned
    /// zone.
    pub fn insert(
        &mut self,
        external_id: impl Into<String>,
        canonical_id: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Arc<Zone> {
        let external_id = external_id.into();
        let canonical_id = canonical_id.into();

        let zone = self
            .by_canonical
            .entry(canonical_id.clone())
            .or_insert_with(|| {
                Arc::new(Zone::new(external_id.clone(), canonical_id, display_name))
            })
            .clone();

        self.by_external.insert(external_id, zone.clone());
        zone
    }

    /// Look up the zone for an external id
    pub fn resolve(&self, external_id: &str) -> Option<Arc<Zone>> {
        self.by_external.get(external_id).cloned()
    }

    /// Look up a zone and cross-check the name the upstream page showed
    ///
    /// Emits a [`RunEvent::ZoneNameMismatch`] when the upstream label
    /// disagrees with the registered display name. The zone is still
    /// returned; the registry's name wins.
    pub fn resolve_named(
        &self,
        external_id: &str,
        seen_name: &str,
        sink: &dyn ReportSink,
    ) -> Option<Arc<Zone>> {
        let zone = self.resolve(external_id)?;
        if zone.display_name != seen_name {
            sink.report(RunEvent::ZoneNameMismatch {
                external_id: external_id.to_string(),
                expected: zone.display_name.clone(),
                found: seen_name.to_string(),
            });
        }
        Some(zone)
    }

    /// Mark an external id as expected-to-be-absent
    pub fn suppress(&mut self, external_id: impl Into<String>) {
        self.suppressed.insert(external_id.into());
    }

    /// Whether an unresolved external id should be reported
    pub fn is_suppressed(&self, external_id: &str) -> bool {
        self.suppressed.contains(external_id)
    }

    /// Number of interned zones (not aliases)
    pub fn len(&self) -> usize {
        self.by_canonical.len()
    }

    /// Whether the registry holds no zones
    pub fn is_empty(&self) -> bool {
        self.by_canonical.is_empty()
    }
}
