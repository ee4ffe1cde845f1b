//! seg-runner: unattended QM segmentation run.
//!
//! Usage:
//!   seg-runner --variant data/variants/coffee.json --input items.csv --db report.db
//!   seg-runner --variant data/variants/coffee.json --warehouse dwh.db --category TE --db report.db
//!   seg-runner --input items.csv --dry-run --json

use anyhow::{bail, Result};
use qmseg_core::{
    config::VariantConfig,
    engine::SegmentationEngine,
    output::RunOutput,
    pipeline::{run_pipeline, ResultSink},
    run::RunContext,
    source::{CsvItemSource, ItemSource},
    store::{ReportStore, WarehouseSource},
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let variant_path = arg_value(&args, "--variant");
    let input = arg_value(&args, "--input");
    let warehouse = arg_value(&args, "--warehouse");
    let category = arg_value(&args, "--category").map(str::to_string);
    let db = arg_value(&args, "--db").unwrap_or("report.db");
    let dry_run = args.iter().any(|a| a == "--dry-run");
    let json = args.iter().any(|a| a == "--json");

    let config = match variant_path {
        Some(path) => VariantConfig::load(path)?,
        None => VariantConfig::coffee(),
    };

    let mut source: Box<dyn ItemSource> = match (input, warehouse) {
        (Some(path), None) => Box::new(CsvItemSource::new(path)),
        (None, Some(path)) => Box::new(WarehouseSource::open(path, category)?),
        _ => bail!("pass exactly one of --input <csv> or --warehouse <db>"),
    };

    if !json {
        println!("QM segmentation: seg-runner");
        println!("  variant:   {}", config.name);
        println!("  source:    {}", source.name());
        println!("  db:        {}", if dry_run { "(dry run)" } else { db });
        println!();
    }

    let ctx = RunContext::start(config.source_name.clone());
    let engine = SegmentationEngine::new(config)?;
    log::info!("run={} starting, dry_run={dry_run}", ctx.run_id);

    // The store is opened only after the config validated, and rows reach
    // it only after the engine classified every item.
    let store = if dry_run {
        None
    } else {
        let store = ReportStore::open(db)?;
        store.migrate()?;
        Some(store)
    };
    let sink = store.as_ref().map(|s| s as &dyn ResultSink);

    let (output, report) = run_pipeline(source.as_mut(), &engine, sink, &ctx)?;
    if json {
        // Full result sets for downstream tooling; nothing else on stdout.
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }
    print_summary(&output);
    if let (Some(store), Some(report)) = (&store, report) {
        println!();
        println!("=== LOADED ===");
        println!("  segmentation rows: {}", report.segmentation_rows);
        println!("  quantile rows:     {}", report.quantile_rows);
        for (label, count) in store.segment_counts(&ctx.run_id)? {
            println!("  {label:<16} {count}");
        }
    }
    Ok(())
}

fn print_summary(output: &RunOutput) {
    println!("=== RUN SUMMARY ===");
    println!("  run_id:    {}", output.context.run_id);
    println!("  timestamp: {}", output.context.timestamp);
    println!("  cohorts:   {}", output.cohort_count());
    println!("  active:    {}", output.active_count());
    println!("  inactive:  {}", output.inactive_count());
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
