//! Canonical table rendering
//!
//! Renders an aggregate (or its structured [`ZoneMap`] form) to the
//! persisted text format:
//!
//! ```text
//! GatherMate2HerbDB = {
//! 	[63] = {
//! 		[1000200000] = 401,
//! 	},
//! }
//! ```
//!
//! Zones ascending by numeric canonical id, entries ascending by packed
//! coordinate. The ordering is a correctness requirement: consumers rely on
//! file diffs staying minimal between runs.

use crate::aggregate::CategoryTable;
use crate::ZoneMap;
use gathermine_core::types::Category;
use std::fmt::Write;

/// Render an aggregated table to canonical text
pub fn render_table(table: &CategoryTable) -> String {
    render_zone_map(table.category(), &table.to_zone_map())
}

/// Render a structured zone map to canonical text
///
/// `BTreeMap` iteration supplies both ascending orders.
pub fn render_zone_map(category: Category, zones: &ZoneMap) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} = {{", category.table_name());
    for (zone_id, entries) in zones {
        let _ = writeln!(out, "\t[{}] = {{", zone_id);
        for (coord, source) in entries {
            let _ = writeln!(out, "\t\t[{}] = {},", coord, source);
        }
        out.push_str("\t},\n");
    }
    out.push_str("}\n");
    out
}
