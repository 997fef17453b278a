//! Aggregation and the persisted table text format
//!
//! Three pieces, forming the serialize/parse round-trip pair around the
//! in-memory aggregate:
//! - [`aggregate`]: groups raw observations into per-zone, collision-free
//!   entry lists
//! - [`render`]: canonical text rendering (zones and entries ascending
//!   numeric)
//! - [`parse`]: tokenizer + recursive-descent parser recovering the same
//!   structure from previously serialized or hand-edited text

pub mod aggregate;
pub mod parse;
pub mod render;

pub use aggregate::{CategoryTable, Entry, ZoneEntries};
pub use parse::{parse_category, parse_zone_map, section_body, section_span};
pub use render::{render_table, render_zone_map};

use std::collections::BTreeMap;

/// Structured, diff-able form of one category's table
///
/// Outer key: numeric canonical zone id. Inner key: packed coordinate.
/// Value: source id exactly as persisted. `BTreeMap` keys give the
/// canonical ascending-numeric iteration order for free.
pub type ZoneMap = BTreeMap<u64, BTreeMap<u64, String>>;
