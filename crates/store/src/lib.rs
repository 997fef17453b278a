//! Persisted document handling
//!
//! The externally-owned saved-variables file holds one opaque settings block
//! plus one table per category. This crate models that document, merges
//! freshly aggregated tables into it (additive, new data winning at exact
//! keys), and writes it back behind a timestamped backup.

pub mod backup;
pub mod document;
pub mod merge;

pub use backup::{backup_file, write_document, write_text};
pub use document::{PersistedDocument, SETTINGS_TABLE};
pub use merge::merge;
