//! Cache Lifecycle Tests
//!
//! Snapshot degradation, wholesale replacement, and partition isolation
//! across runs.

use crate::common::*;
use gathermine::cache::{cache_file_name, CacheSnapshot};
use gathermine::{run, Category, NullSink, Partition, RunConfig};

#[test]
fn corrupt_cache_degrades_to_all_new_and_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("node_cache_TWW.json"), "{broken json").unwrap();

    let zone_a = zone("331", "63", "Ashenvale");
    let config = RunConfig::new(dir.path());
    let summary = run(
        &config,
        batch("TWW", &[(Category::Herb, &zone_a, 10.0, 20.0, "401")]),
        &NullSink,
    )
    .unwrap();

    // unreadable prior snapshot never aborts; everything counts as new
    assert_eq!(summary.total_new(), 1);

    // and the file is now a valid snapshot again
    let reloaded = CacheSnapshot::load(dir.path(), &Partition::new("TWW"), &NullSink);
    assert_eq!(reloaded.len(), 1);
    assert_ne!(reloaded.last_run, "never");
}

#[test]
fn snapshot_is_rebuilt_wholesale_not_patched() {
    let dir = tempfile::tempdir().unwrap();
    let config = RunConfig::new(dir.path());
    let zone_a = zone("331", "63", "Ashenvale");

    run(
        &config,
        batch(
            "TWW",
            &[
                (Category::Herb, &zone_a, 10.0, 20.0, "401"),
                (Category::Ore, &zone_a, 30.0, 40.0, "181"),
            ],
        ),
        &NullSink,
    )
    .unwrap();

    // second run carries only herbs; the ore records drop out of the
    // snapshot because replacement is wholesale
    run(
        &config,
        batch("TWW", &[(Category::Herb, &zone_a, 10.0, 20.0, "401")]),
        &NullSink,
    )
    .unwrap();

    let snapshot = CacheSnapshot::load(dir.path(), &Partition::new("TWW"), &NullSink);
    assert!(snapshot.nodes.contains_key("63_herbs"));
    assert!(!snapshot.nodes.contains_key("63_ores"));
}

#[test]
fn unprocessed_partition_keeps_its_snapshot_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let config = RunConfig::new(dir.path());
    let zone_a = zone("331", "63", "Ashenvale");

    run(
        &config,
        batch("TWW", &[(Category::Herb, &zone_a, 10.0, 20.0, "401")]),
        &NullSink,
    )
    .unwrap();
    let tww_before =
        std::fs::read_to_string(dir.path().join(cache_file_name(&Partition::new("TWW")))).unwrap();

    // a later run for a different partition must not rewrite TWW's file
    run(
        &config,
        batch("MD", &[(Category::Herb, &zone_a, 50.0, 60.0, "402")]),
        &NullSink,
    )
    .unwrap();

    let tww_after =
        std::fs::read_to_string(dir.path().join(cache_file_name(&Partition::new("TWW")))).unwrap();
    assert_eq!(tww_before, tww_after);
    assert!(dir.path().join("node_cache_MD.json").exists());
}

#[test]
fn collision_bumped_records_cache_their_resolved_coordinates() {
    let dir = tempfile::tempdir().unwrap();
    let config = RunConfig::new(dir.path());
    let zone_a = zone("331", "63", "Ashenvale");

    run(
        &config,
        batch(
            "TWW",
            &[
                (Category::Herb, &zone_a, 10.0, 20.0, "401"),
                (Category::Herb, &zone_a, 10.0, 20.0, "402"),
            ],
        ),
        &NullSink,
    )
    .unwrap();

    let snapshot = CacheSnapshot::load(dir.path(), &Partition::new("TWW"), &NullSink);
    let bucket = &snapshot.nodes["63_herbs"];
    assert_eq!(bucket["1000200000"], "401");
    assert_eq!(bucket["1000200001"], "402");
}
