//! The segmentation engine.
//!
//! EXECUTION ORDER (fixed):
//!   1. Validate every item. Any malformed row aborts the run.
//!   2. Split items into active (activity > 0) and inactive.
//!   3. Partition active items into cohorts.
//!   4. Per cohort: thresholds, quartile ranks, composite score, label.
//!   5. Score and label inactive items.
//!   6. Assemble rows stamped with the run context.
//!
//! RULES:
//!   - The engine owns no connection. It takes items in, hands rows out.
//!   - Cohorts are independent; none reads another's thresholds.
//!   - No row is ever emitted without a resolved score and label.

use crate::{
    cohort::{partition, CohortKey},
    config::VariantConfig,
    error::SegResult,
    item::{validate_items, Item},
    output::{ExecutionLogEntry, QuantileRow, RunOutput, SegmentDetail, SegmentationRow},
    quantile::CohortThresholds,
    run::RunContext,
    score::composite,
};

pub struct SegmentationEngine {
    config: VariantConfig,
}

impl SegmentationEngine {
    /// Build an engine for a variant. The variant is validated here so a
    /// broken label table fails before any data is read.
    pub fn new(config: VariantConfig) -> SegResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &VariantConfig {
        &self.config
    }

    /// Run one full segmentation over a snapshot of items.
    pub fn run(&self, items: &[Item], ctx: &RunContext) -> SegResult<RunOutput> {
        validate_items(items)?;

        let (active, inactive): (Vec<&Item>, Vec<&Item>) =
            items.iter().partition(|item| self.is_active(item));

        log::info!(
            "run={} variant={}: {} active, {} inactive items",
            ctx.run_id,
            self.config.name,
            active.len(),
            inactive.len()
        );

        let mut segmentation = Vec::with_capacity(items.len());
        let mut quantiles = Vec::new();

        let cohorts = partition(active, &self.config.group_by);
        for (key, members) in &cohorts {
            let thresholds = CohortThresholds::compute(members)?;
            log::debug!(
                "run={} cohort '{}': {} items, volume {:?}, monetary {:?}",
                ctx.run_id,
                key.tag(),
                members.len(),
                thresholds.volume,
                thresholds.monetary
            );
            for item in members {
                segmentation.push(self.classify_active(item, key, &thresholds, ctx)?);
            }
            quantiles.extend(threshold_rows(key, &thresholds, ctx));
        }

        for item in inactive {
            segmentation.push(self.classify_inactive(item, ctx)?);
        }

        log::info!(
            "run={} variant={}: {} rows across {} cohorts",
            ctx.run_id,
            self.config.name,
            segmentation.len(),
            cohorts.len()
        );

        Ok(RunOutput {
            context: ctx.clone(),
            segmentation,
            quantiles,
            log: ExecutionLogEntry::for_run(ctx),
        })
    }

    fn is_active(&self, item: &Item) -> bool {
        if self.config.discontinued_is_inactive && self.config.inactive.is_discontinued(item) {
            return false;
        }
        item.has_activity()
    }

    fn classify_active(
        &self,
        item: &Item,
        key: &CohortKey,
        thresholds: &CohortThresholds,
        ctx: &RunContext,
    ) -> SegResult<SegmentationRow> {
        let volume_rank = thresholds.volume.rank(item.volume);
        let monetary_rank = thresholds.monetary.rank(item.monetary_value);
        let score = composite(volume_rank, monetary_rank);
        let label = self.config.labels.resolve(score)?;
        let with_ranks = self.config.output.include_ranks;

        Ok(SegmentationRow {
            run_id: ctx.run_id,
            timestamp: ctx.timestamp,
            item_id: item.item_id.clone(),
            detail: SegmentDetail::Active {
                volume: item.volume,
                monetary_value: item.monetary_value,
                volume_rank: with_ranks.then_some(volume_rank),
                monetary_rank: with_ranks.then_some(monetary_rank),
            },
            score,
            label: self.config.output.include_label.then(|| label.to_string()),
            group_tag: key.tag(),
            source_name: ctx.source_name.clone(),
        })
    }

    fn classify_inactive(&self, item: &Item, ctx: &RunContext) -> SegResult<SegmentationRow> {
        let score = self.config.inactive.score(item);
        let label = self.config.labels.resolve(score)?;

        Ok(SegmentationRow {
            run_id: ctx.run_id,
            timestamp: ctx.timestamp,
            item_id: item.item_id.clone(),
            detail: SegmentDetail::Inactive,
            score,
            label: self.config.output.include_label.then(|| label.to_string()),
            group_tag: CohortKey::for_item(item, &self.config.group_by).tag(),
            source_name: ctx.source_name.clone(),
        })
    }
}

fn threshold_rows(
    key: &CohortKey,
    thresholds: &CohortThresholds,
    ctx: &RunContext,
) -> Vec<QuantileRow> {
    let group_tag = key.tag();
    thresholds
        .volume
        .points()
        .into_iter()
        .zip(thresholds.monetary.points())
        .map(|((percentile, volume), (_, monetary_value))| QuantileRow {
            run_id: ctx.run_id,
            timestamp: ctx.timestamp,
            group_tag: group_tag.clone(),
            percentile,
            volume,
            monetary_value,
        })
        .collect()
}
