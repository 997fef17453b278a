//! Merge engine
//!
//! Combines freshly aggregated tables with a previously persisted document.
//! The merge is additive union: for every coordinate key in the new data the
//! new source id overwrites the old one; keys present only in the existing
//! document are preserved untouched. The engine cannot represent "this node
//! no longer exists" — removal is not a merge outcome. Categories absent
//! from the new data pass through unchanged, as does the settings block.

use crate::document::PersistedDocument;
use gathermine_core::types::Category;
use gathermine_table::ZoneMap;
use std::collections::BTreeMap;

/// Merge new category tables into an existing document
///
/// Returns the replacement document; the input document is untouched.
/// `merge(doc, {})` is the identity.
pub fn merge(
    existing: &PersistedDocument,
    new_tables: &BTreeMap<Category, ZoneMap>,
) -> PersistedDocument {
    let mut merged = existing.clone();
    for (category, new_zones) in new_tables {
        let mut zones = existing.table(*category).cloned().unwrap_or_default();
        for (zone_id, new_entries) in new_zones {
            zones
                .entry(*zone_id)
                .or_default()
                .extend(new_entries.iter().map(|(k, v)| (*k, v.clone())));
        }
        merged.set_table(*category, zones);
    }
    merged
}
