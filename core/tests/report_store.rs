use anyhow::anyhow;
use chrono::{TimeZone, Utc};
use qmseg_core::{
    config::VariantConfig,
    engine::SegmentationEngine,
    error::{SegError, SegResult},
    item::Item,
    output::{ExecutionLogEntry, QuantileRow, SegmentDetail, SegmentationRow},
    pipeline::{load, run_pipeline, ResultSink},
    run::RunContext,
    source::{load_items, ItemSource},
    store::ReportStore,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

const SNAPSHOT_CSV: &str = "\
item_no,status,department,item_type,volume,monetary_value,activity_count,age_days
1001,Aktiv,Kaffe,Bønner,10,4,12,400
1002,Aktiv,Kaffe,Bønner,20,3,9,400
1003,Aktiv,Kaffe,Bønner,30,2,20,400
1004,Aktiv,Kaffe,Bønner,40,1,31,400
1005,Aktiv,Kaffe,Kapsler,5,-2,1,30
1006,Aktiv,Kaffe,Formalet,,,,95
1007,Er udgået,Kaffe,Formalet,,,0,500
";

struct CsvText(&'static str);

impl ItemSource for CsvText {
    fn name(&self) -> &str {
        "csv:inline"
    }

    fn fetch(&mut self) -> SegResult<Vec<Item>> {
        load_items(self.0.as_bytes())
    }
}

/// Writes segmentation rows, then loses the connection.
struct FlakyStore<'a>(&'a ReportStore);

impl ResultSink for FlakyStore<'_> {
    fn append_segmentation(&self, rows: &[SegmentationRow]) -> SegResult<usize> {
        self.0.append_segmentation(rows)
    }

    fn append_quantiles(&self, _rows: &[QuantileRow]) -> SegResult<usize> {
        Err(SegError::Other(anyhow!("store unavailable")))
    }

    fn append_log(&self, entry: &ExecutionLogEntry) -> SegResult<()> {
        self.0.append_log(entry)
    }
}

fn make_store() -> ReportStore {
    let _ = env_logger::builder().is_test(true).try_init();
    let store = ReportStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
}

fn context() -> RunContext {
    let ts = Utc.with_ymd_and_hms(2026, 10, 18, 2, 0, 0).unwrap();
    RunContext::at(ts, "QM_Coffee")
}

fn coffee_engine() -> SegmentationEngine {
    SegmentationEngine::new(VariantConfig::coffee()).unwrap()
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn stored_rows_read_back_unchanged() {
    let store = make_store();
    let ctx = context();

    let (output, report) =
        run_pipeline(&mut CsvText(SNAPSHOT_CSV), &coffee_engine(), Some(&store), &ctx).unwrap();
    let report = report.expect("load report");

    assert_eq!(report.segmentation_rows, 7);
    assert_eq!(report.quantile_rows, 6);
    assert_eq!(store.segmentation_rows(&ctx.run_id).unwrap(), output.segmentation);
    assert_eq!(store.quantile_rows(&ctx.run_id).unwrap(), output.quantiles);
    assert_eq!(store.log_entries().unwrap(), vec![output.log.clone()]);
}

#[test]
fn one_run_is_reconstructable_by_run_id() {
    let store = make_store();
    let engine = coffee_engine();
    let first = context();
    let second = context();

    run_pipeline(&mut CsvText(SNAPSHOT_CSV), &engine, Some(&store), &first).unwrap();
    run_pipeline(&mut CsvText(SNAPSHOT_CSV), &engine, Some(&store), &second).unwrap();

    assert_eq!(store.segmentation_count(&first.run_id).unwrap(), 7);
    assert_eq!(store.segmentation_count(&second.run_id).unwrap(), 7);
    assert!(store
        .segmentation_rows(&second.run_id)
        .unwrap()
        .iter()
        .all(|r| r.run_id == second.run_id));

    let notes: Vec<Option<String>> = store
        .log_entries()
        .unwrap()
        .into_iter()
        .map(|e| e.note)
        .collect();
    assert_eq!(
        notes,
        vec![Some(first.run_id.to_string()), Some(second.run_id.to_string())]
    );
}

#[test]
fn inactive_rows_store_no_measures() {
    let store = make_store();
    let ctx = context();
    run_pipeline(&mut CsvText(SNAPSHOT_CSV), &coffee_engine(), Some(&store), &ctx).unwrap();

    let rows = store.segmentation_rows(&ctx.run_id).unwrap();
    let inactive: Vec<_> = rows.iter().filter(|r| !r.is_active()).collect();
    assert_eq!(inactive.len(), 2);
    assert_eq!(inactive[0].item_id, "1006");
    assert_eq!(inactive[0].score, 1);
    assert_eq!(inactive[1].item_id, "1007");
    assert_eq!(inactive[1].score, 0);

    let counts = store.segment_counts(&ctx.run_id).unwrap();
    assert!(counts.contains(&("Discontinued".to_string(), 1)));
    assert!(counts.contains(&("Dead stock".to_string(), 1)));
}

#[test]
fn malformed_input_writes_nothing() {
    let bad = "\
item_no,status,department,item_type,volume,monetary_value,activity_count,age_days
1001,Aktiv,Kaffe,Bønner,10,4,12,400
1002,Aktiv,Kaffe,Bønner,many,3,9,400
";
    let store = make_store();
    let ctx = context();

    let result = run_pipeline(&mut CsvText(bad), &coffee_engine(), Some(&store), &ctx);
    assert!(matches!(result, Err(SegError::MalformedInput { row: 2, .. })));
    assert_eq!(store.segmentation_count(&ctx.run_id).unwrap(), 0);
    assert!(store.log_entries().unwrap().is_empty());
}

#[test]
fn missing_column_is_malformed() {
    let no_age = "\
item_no,status,department,item_type,volume,monetary_value,activity_count
1001,Aktiv,Kaffe,Bønner,10,4,12
";
    assert!(matches!(
        load_items(no_age.as_bytes()),
        Err(SegError::MalformedInput { row: 1, .. })
    ));
}

#[test]
fn partial_load_keeps_earlier_tables() {
    let store = make_store();
    let ctx = context();
    let output = coffee_engine()
        .run(&load_items(SNAPSHOT_CSV.as_bytes()).unwrap(), &ctx)
        .unwrap();

    let result = load(&output, &FlakyStore(&store));
    assert!(matches!(result, Err(SegError::Other(_))));

    assert_eq!(store.segmentation_count(&ctx.run_id).unwrap(), 7);
    assert!(store.quantile_rows(&ctx.run_id).unwrap().is_empty());
    assert!(store.log_entries().unwrap().is_empty());
}

#[test]
fn dry_run_loads_nothing() {
    let ctx = context();
    let (output, report) =
        run_pipeline(&mut CsvText(SNAPSHOT_CSV), &coffee_engine(), None, &ctx).unwrap();
    assert!(report.is_none());
    assert_eq!(output.segmentation.len(), 7);
}

#[test]
fn migrate_twice_is_harmless() {
    let store = make_store();
    store.migrate().expect("second migration");
}

#[test]
fn unlabelled_variant_still_routes_and_scores() {
    let tea = VariantConfig::load(&format!(
        "{}/../data/variants/tea.json",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap();
    assert!(!tea.output.include_label);

    let csv = "\
item_no,status,department,item_type,volume,monetary_value,activity_count,age_days
3001,Aktiv,Te,Løs,14,9,6,400
3002,Spærret,Te,Løs,30,12,8,400
3003,Aktiv,Te,Løs,,,0,200
";
    let store = make_store();
    let ctx = RunContext::at(Utc.with_ymd_and_hms(2026, 10, 18, 2, 0, 0).unwrap(), "QM_Tea");
    let engine = SegmentationEngine::new(tea).unwrap();
    let (output, _) = run_pipeline(&mut CsvText(csv), &engine, Some(&store), &ctx).unwrap();

    assert!(output.segmentation.iter().all(|r| r.label.is_none()));

    let by_id = |id: &str| output.segmentation.iter().find(|r| r.item_id == id).unwrap();
    // Lone active item in its cohort.
    assert_eq!(by_id("3001").score, 44);
    assert!(matches!(
        by_id("3001").detail,
        SegmentDetail::Active { volume_rank: Some(4), monetary_rank: Some(4), .. }
    ));
    // Second discontinued status routes an active item to the inactive path.
    assert_eq!(by_id("3002").detail, SegmentDetail::Inactive);
    assert_eq!(by_id("3002").score, 0);
    // 200 days exceeds the 180-day threshold.
    assert_eq!(by_id("3003").score, 1);

    let stored = store.segmentation_rows(&ctx.run_id).unwrap();
    assert!(stored.iter().all(|r| r.label.is_none()));
    assert_eq!(
        store.segment_counts(&ctx.run_id).unwrap(),
        vec![("(unlabelled)".to_string(), 3)]
    );
}

#[test]
fn unlabelled_variant_still_requires_a_complete_table() {
    let mut config = VariantConfig::coffee();
    config.output.include_label = false;
    config.labels.labels.remove(&33);
    assert!(matches!(
        SegmentationEngine::new(config),
        Err(SegError::UnmappedCode { code: 33, .. })
    ));
}
