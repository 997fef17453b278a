//! Gathermine CLI — thin shell around the run pipeline.
//!
//! Consumes a JSON observation file (the hand-off a scraping collaborator
//! produces), writes the standalone table artifacts and cache snapshot into
//! the output directory, and optionally merges into a saved-variables file:
//!
//! ```text
//! gathermine observations.json --out mined/ --merge-into GatherMate2.lua
//! ```

mod input;

use anyhow::Context;
use clap::{Arg, ArgMatches, Command};
use gathermine_core::report::TracingSink;
use gathermine_core::types::Category;
use gathermine_engine::{run, RunConfig, RunSummary};
use std::process;

fn build_cli() -> Command {
    Command::new("gathermine")
        .about("Pack scraped node observations into GatherMate2-format tables")
        .arg(
            Arg::new("input")
                .value_name("OBSERVATIONS")
                .help("JSON observation file produced by the fetching side")
                .required(true),
        )
        .arg(
            Arg::new("out")
                .long("out")
                .short('o')
                .value_name("DIR")
                .help("Output directory for table artifacts and cache snapshots")
                .default_value("."),
        )
        .arg(
            Arg::new("merge-into")
                .long("merge-into")
                .value_name("SAVED_VARIABLES")
                .help("Merge results into this saved-variables file (backed up first)"),
        )
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let matches = build_cli().get_matches();
    if let Err(e) = run_cli(&matches) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run_cli(matches: &ArgMatches) -> anyhow::Result<()> {
    let input_path = matches.get_one::<String>("input").expect("required arg");
    let out_dir = matches.get_one::<String>("out").expect("defaulted arg");

    let text = std::fs::read_to_string(input_path)
        .with_context(|| format!("reading {input_path}"))?;
    let file: input::ObservationFile =
        serde_json::from_str(&text).with_context(|| format!("parsing {input_path}"))?;

    let batch = input::build_batch(file, &TracingSink);
    let mut config = RunConfig::new(out_dir);
    if let Some(target) = matches.get_one::<String>("merge-into") {
        config = config.with_merge_target(target);
    }

    let summary = run(&config, batch, &TracingSink)?;
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    for category in Category::ALL {
        if let Some(totals) = summary.categories.get(&category) {
            println!(
                "{}: {} records ({} new)",
                category, totals.total, totals.new
            );
        }
    }
    if let Some(target) = &summary.merged_into {
        println!("merged into {}", target.display());
    }
    match summary.total_new() {
        0 => println!("no new records since last run"),
        n => println!("{n} new records found since last run"),
    }
}
