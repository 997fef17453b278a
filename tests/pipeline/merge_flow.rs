//! Merge Flow Tests
//!
//! Runs against a pre-existing saved-variables file: backup taken, settings
//! carried verbatim, new data winning at exact keys, everything else
//! preserved.

use crate::common::*;
use gathermine::store::PersistedDocument;
use gathermine::{run, Category, NullSink, RunConfig};
use std::path::Path;

const SAVED_VARIABLES: &str = "\
GatherMate2DB = {\n\
\t[\"profileKeys\"] = {\n\
\t\t[\"Char - Realm\"] = \"Default\",\n\
\t},\n\
}\n\
GatherMate2HerbDB = {\n\
\t[63] = {\n\
\t\t[1000200000] = 777,\n\
\t\t[9000900000] = 778,\n\
\t},\n\
}\n\
GatherMate2MineDB = {\n\
\t[63] = {\n\
\t\t[2000300000] = 181,\n\
\t},\n\
}\n";

fn backups_in(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok()?.file_name().into_string().ok())
        .filter(|name| name.contains(".backup_"))
        .collect()
}

#[test]
fn merge_overrides_exact_keys_and_preserves_the_rest() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("GatherMate2.lua");
    std::fs::write(&target, SAVED_VARIABLES).unwrap();

    let zone_a = zone("331", "63", "Ashenvale");
    let config = RunConfig::new(dir.path().join("out")).with_merge_target(&target);
    // encodes to 1000200000, the key source 777 held before
    run(
        &config,
        batch("TWW", &[(Category::Herb, &zone_a, 10.0, 20.0, "401")]),
        &NullSink,
    )
    .unwrap();

    let merged = std::fs::read_to_string(&target).unwrap();
    let doc = PersistedDocument::parse(&merged, &NullSink);

    let herbs = doc.table(Category::Herb).unwrap();
    assert_eq!(herbs[&63][&1_000_200_000], "401");
    assert_eq!(herbs[&63][&9_000_900_000], "778");

    // category untouched by the run passes through
    let ores = doc.table(Category::Ore).unwrap();
    assert_eq!(ores[&63][&2_000_300_000], "181");

    // opaque settings carried verbatim
    assert!(doc.settings().contains("Char - Realm"));
}

#[test]
fn merge_takes_a_timestamped_backup_first() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("GatherMate2.lua");
    std::fs::write(&target, SAVED_VARIABLES).unwrap();

    let zone_a = zone("331", "63", "Ashenvale");
    let config = RunConfig::new(dir.path().join("out")).with_merge_target(&target);
    run(
        &config,
        batch("TWW", &[(Category::Herb, &zone_a, 10.0, 20.0, "401")]),
        &NullSink,
    )
    .unwrap();

    let backups = backups_in(dir.path());
    assert_eq!(backups.len(), 1);
    assert!(backups[0].starts_with("GatherMate2.lua.backup_"));

    // the backup holds the pre-merge content
    let backup_text = std::fs::read_to_string(dir.path().join(&backups[0])).unwrap();
    assert_eq!(backup_text, SAVED_VARIABLES);
}

#[test]
fn remerging_identical_data_is_structurally_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("GatherMate2.lua");
    std::fs::write(&target, SAVED_VARIABLES).unwrap();

    let zone_a = zone("331", "63", "Ashenvale");
    let config = RunConfig::new(dir.path().join("out")).with_merge_target(&target);
    let rows = [(Category::Herb, &zone_a, 10.0, 20.0, "401")];

    run(&config, batch("TWW", &rows), &NullSink).unwrap();
    let after_first = PersistedDocument::parse(&std::fs::read_to_string(&target).unwrap(), &NullSink);

    run(&config, batch("TWW", &rows), &NullSink).unwrap();
    let after_second = PersistedDocument::parse(&std::fs::read_to_string(&target).unwrap(), &NullSink);

    assert_eq!(after_first, after_second);
}

#[test]
fn malformed_category_section_merges_as_first_write() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("GatherMate2.lua");
    // herb section never closes its braces
    std::fs::write(
        &target,
        "GatherMate2DB = {\n}\nGatherMate2HerbDB = {\n\t[63] = {\n\t\t[5] = 777,\n",
    )
    .unwrap();

    let zone_a = zone("331", "63", "Ashenvale");
    let config = RunConfig::new(dir.path().join("out")).with_merge_target(&target);
    run(
        &config,
        batch("TWW", &[(Category::Herb, &zone_a, 10.0, 20.0, "401")]),
        &NullSink,
    )
    .unwrap();

    let doc = PersistedDocument::parse(&std::fs::read_to_string(&target).unwrap(), &NullSink);
    let herbs = doc.table(Category::Herb).unwrap();
    // the unreadable section's records are gone; the new data stands alone
    assert_eq!(herbs[&63].len(), 1);
    assert_eq!(herbs[&63][&1_000_200_000], "401");
}
