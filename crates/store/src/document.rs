//! The persisted document
//!
//! A document is the full saved-variables file: one settings block the core
//! never interprets, plus zero or more category tables. It is read once per
//! merge and fully replaced on write; there are no partial updates.

use gathermine_core::report::{ReportSink, RunEvent};
use gathermine_core::types::Category;
use gathermine_table::{parse, render, ZoneMap};
use std::collections::BTreeMap;

/// Name of the opaque settings section
pub const SETTINGS_TABLE: &str = "GatherMate2DB";

/// Settings block synthesized when the file has none
const EMPTY_SETTINGS: &str = "GatherMate2DB = {\n}";

/// The full externally-owned file: opaque settings plus category tables
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedDocument {
    /// Settings section text, carried through verbatim
    settings: String,
    /// Category tables present in the document
    tables: BTreeMap<Category, ZoneMap>,
}

impl PersistedDocument {
    /// A fresh document: synthesized empty settings, no tables
    pub fn empty() -> Self {
        PersistedDocument {
            settings: EMPTY_SETTINGS.to_string(),
            tables: BTreeMap::new(),
        }
    }

    /// Parse a document from saved-variables text
    ///
    /// The settings section is captured verbatim (synthesized if absent).
    /// A category whose section is present but malformed degrades to absent
    /// — the next merge treats it as a first write — and is reported
    /// through the sink rather than failing the parse.
    pub fn parse(text: &str, sink: &dyn ReportSink) -> Self {
        let settings = parse::section_span(text, SETTINGS_TABLE)
            .map(|span| text[span].to_string())
            .unwrap_or_else(|| EMPTY_SETTINGS.to_string());

        let mut tables = BTreeMap::new();
        for category in Category::ALL {
            match parse::parse_category(text, category) {
                Some(zones) => {
                    tables.insert(category, zones);
                }
                None => {
                    // absent is normal; present-but-unreadable is worth a
                    // warning before we fall back to first-write semantics
                    if text.contains(&category.table_name()) {
                        sink.report(RunEvent::CategoryParseFallback { category });
                    }
                }
            }
        }

        PersistedDocument { settings, tables }
    }

    /// The verbatim settings section
    pub fn settings(&self) -> &str {
        &self.settings
    }

    /// One category's table, if present
    pub fn table(&self, category: Category) -> Option<&ZoneMap> {
        self.tables.get(&category)
    }

    /// All category tables
    pub fn tables(&self) -> &BTreeMap<Category, ZoneMap> {
        &self.tables
    }

    /// Replace one category's table
    pub(crate) fn set_table(&mut self, category: Category, zones: ZoneMap) {
        self.tables.insert(category, zones);
    }

    /// Render the whole document in canonical order
    ///
    /// Settings first, then the categories in canonical order; categories
    /// with no entries are omitted, matching the format the addon writes.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(self.settings.trim_end());
        out.push('\n');
        for category in Category::ALL {
            if let Some(zones) = self.tables.get(&category) {
                if !zones.is_empty() {
                    out.push_str(&render::render_zone_map(category, zones));
                }
            }
        }
        out
    }
}
