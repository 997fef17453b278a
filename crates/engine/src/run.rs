//! The run pipeline
//!
//! Order of operations for one run:
//!
//! 1. aggregate every category of the batch (fatal on precondition
//!    violations — out-of-range coordinates, non-numeric zone ids)
//! 2. write a standalone table artifact per non-empty category
//! 3. classify every aggregated record against the union of all prior
//!    partition snapshots and rebuild + save this partition's snapshot
//! 4. merge into the saved-variables document, if a target is configured
//!
//! The merge comes last: a failed document write is fatal to the run but
//! the artifacts and the cache snapshot are already on disk and valid.

use gathermine_cache::{count_new, CacheSnapshot, PriorView};
use gathermine_core::error::Result;
use gathermine_core::report::{ReportSink, RunEvent};
use gathermine_core::types::{Category, Partition, RawObservation};
use gathermine_store::{backup_file, merge, write_document, write_text, PersistedDocument};
use gathermine_table::{render_table, CategoryTable, ZoneMap};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{info, warn};

/// Where a run writes its outputs
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory for table artifacts and cache snapshots
    pub out_dir: PathBuf,
    /// Saved-variables file to merge into, if any
    pub merge_target: Option<PathBuf>,
}

impl RunConfig {
    /// Artifacts and caches under `out_dir`, no merge
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        RunConfig {
            out_dir: out_dir.into(),
            merge_target: None,
        }
    }

    /// Additionally merge into a saved-variables file
    pub fn with_merge_target(mut self, target: impl Into<PathBuf>) -> Self {
        self.merge_target = Some(target.into());
        self
    }
}

/// One run's worth of observations, fully materialized by the collaborator
///
/// Observation order within a category is significant: collision
/// resolution depends on it, and reproducible runs require the collaborator
/// to supply source objects in registration order.
#[derive(Debug)]
pub struct RunBatch {
    /// Partition the observations belong to
    pub partition: Partition,
    observations: BTreeMap<Category, Vec<RawObservation>>,
}

impl RunBatch {
    /// Create an empty batch for a partition
    pub fn new(partition: Partition) -> Self {
        RunBatch {
            partition,
            observations: BTreeMap::new(),
        }
    }

    /// Append one observation to a category, preserving order
    pub fn push(&mut self, category: Category, observation: RawObservation) {
        self.observations.entry(category).or_default().push(observation);
    }

    /// Append many observations to a category, preserving order
    pub fn extend<I>(&mut self, category: Category, observations: I)
    where
        I: IntoIterator<Item = RawObservation>,
    {
        self.observations
            .entry(category)
            .or_default()
            .extend(observations);
    }

    /// Total observation count across categories
    pub fn len(&self) -> usize {
        self.observations.values().map(Vec::len).sum()
    }

    /// Whether the batch holds no observations
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Per-category outcome of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    /// Records aggregated this run
    pub total: usize,
    /// Records absent from every prior partition snapshot
    pub new: usize,
    /// Standalone artifact path, when one was written
    pub artifact: Option<PathBuf>,
}

/// Outcome of one run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Partition the run processed
    pub partition: Partition,
    /// Per-category totals, in canonical category order
    pub categories: BTreeMap<Category, CategorySummary>,
    /// Merge target, when the document merge ran
    pub merged_into: Option<PathBuf>,
    /// Backup taken before the merge target was replaced
    pub backup: Option<PathBuf>,
}

impl RunSummary {
    /// Records that were new across all categories
    pub fn total_new(&self) -> usize {
        self.categories.values().map(|c| c.new).sum()
    }

    /// Records aggregated across all categories
    pub fn total(&self) -> usize {
        self.categories.values().map(|c| c.total).sum()
    }
}

/// Execute one run
///
/// # Errors
/// Fatal conditions only: aggregation precondition violations, artifact
/// I/O failures, and a failed document merge write. Cache problems never
/// abort — they degrade and are reported through the sink.
pub fn run(config: &RunConfig, batch: RunBatch, sink: &dyn ReportSink) -> Result<RunSummary> {
    std::fs::create_dir_all(&config.out_dir)?;

    let partition = batch.partition.clone();
    info!(%partition, observations = batch.len(), "run started");

    // 1. aggregate
    let mut tables: BTreeMap<Category, CategoryTable> = BTreeMap::new();
    for (category, observations) in batch.observations {
        tables.insert(category, CategoryTable::aggregate(category, observations)?);
    }
    let zone_maps: BTreeMap<Category, ZoneMap> = tables
        .iter()
        .filter(|(_, table)| !table.is_empty())
        .map(|(category, table)| (*category, table.to_zone_map()))
        .collect();

    // 2. standalone artifacts
    let mut summaries: BTreeMap<Category, CategorySummary> = BTreeMap::new();
    for (category, table) in &tables {
        if table.is_empty() {
            continue;
        }
        let path = config
            .out_dir
            .join(format!("{}.lua", category.artifact_stem()));
        write_text(&path, &render_table(table))?;
        sink.report(RunEvent::ArtifactWritten {
            category: *category,
            path: path.clone(),
            records: table.len(),
        });
        summaries.insert(
            *category,
            CategorySummary {
                total: table.len(),
                new: 0,
                artifact: Some(path),
            },
        );
    }

    // 3. novelty against all prior partitions, then wholesale snapshot
    let known = gathermine_cache::discover_partitions(&config.out_dir);
    if known.is_empty() {
        sink.report(RunEvent::CacheMissing {
            partition: partition.clone(),
        });
    }
    let mut prior = PriorView::new();
    for prior_partition in &known {
        prior.absorb(&CacheSnapshot::load(&config.out_dir, prior_partition, sink));
    }
    for (category, zones) in &zone_maps {
        let new = count_new(&prior, *category, zones);
        if let Some(summary) = summaries.get_mut(category) {
            summary.new = new;
            sink.report(RunEvent::NewRecords {
                category: *category,
                total: summary.total,
                new,
            });
        }
    }
    if !zone_maps.is_empty() {
        let snapshot = CacheSnapshot::from_tables(&partition, &zone_maps);
        if let Err(e) = snapshot.save(&config.out_dir) {
            warn!(%partition, error = %e, "could not save cache snapshot");
        }
    }

    // 4. merge into the saved-variables document
    let mut merged_into = None;
    let mut backup = None;
    if let Some(target) = &config.merge_target {
        let existing = if target.exists() {
            PersistedDocument::parse(&std::fs::read_to_string(target)?, sink)
        } else {
            PersistedDocument::empty()
        };
        backup = backup_file(target, sink)?;
        let merged = merge(&existing, &zone_maps);
        write_document(target, &merged.render())?;
        sink.report(RunEvent::DocumentMerged {
            path: target.clone(),
        });
        merged_into = Some(target.clone());
    }

    info!(%partition, total = summaries.values().map(|c| c.total).sum::<usize>(), "run finished");
    Ok(RunSummary {
        partition,
        categories: summaries,
        merged_into,
        backup,
    })
}
