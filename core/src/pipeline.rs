//! Extract → segment → load for one run.
//!
//! The three result sets are appended independently, in a fixed order:
//! item segmentation, quantile thresholds, execution log. There is no
//! transaction spanning them. If a later append fails the earlier ones
//! stay written; a consumer keys on the run id to see what landed.

use crate::{
    engine::SegmentationEngine,
    error::SegResult,
    output::{ExecutionLogEntry, QuantileRow, RunOutput, SegmentationRow},
    run::RunContext,
    source::ItemSource,
};

/// The load side of the pipeline. Each method is one atomic append.
pub trait ResultSink {
    fn append_segmentation(&self, rows: &[SegmentationRow]) -> SegResult<usize>;
    fn append_quantiles(&self, rows: &[QuantileRow]) -> SegResult<usize>;
    fn append_log(&self, entry: &ExecutionLogEntry) -> SegResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub segmentation_rows: usize,
    pub quantile_rows:     usize,
}

/// Append a finished run to the sink.
pub fn load(output: &RunOutput, sink: &dyn ResultSink) -> SegResult<LoadReport> {
    let segmentation_rows = sink.append_segmentation(&output.segmentation)?;
    let quantile_rows = sink.append_quantiles(&output.quantiles)?;
    sink.append_log(&output.log)?;
    log::info!(
        "run={}: loaded {segmentation_rows} segmentation rows, {quantile_rows} quantile rows",
        output.context.run_id
    );
    Ok(LoadReport {
        segmentation_rows,
        quantile_rows,
    })
}

/// Fetch, segment, and (unless `sink` is `None`) load one run.
///
/// Nothing reaches the sink until the engine has classified every item,
/// so malformed input never leaves partial output behind.
pub fn run_pipeline(
    source: &mut dyn ItemSource,
    engine: &SegmentationEngine,
    sink: Option<&dyn ResultSink>,
    ctx: &RunContext,
) -> SegResult<(RunOutput, Option<LoadReport>)> {
    log::info!("run={}: extracting from {}", ctx.run_id, source.name());
    let items = source.fetch()?;
    let output = engine.run(&items, ctx)?;
    let report = match sink {
        Some(sink) => Some(load(&output, sink)?),
        None => None,
    };
    Ok((output, report))
}
