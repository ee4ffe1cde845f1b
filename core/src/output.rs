//! Result rows produced by one run.
//!
//! RULE: every row built here takes its run id and timestamp from the
//! same RunContext. Nothing else stamps rows.

use crate::{
    run::{RunContext, RunId},
    types::{ItemId, QuartileRank, SegmentCode},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Per-item measure detail. Active and inactive items carry different
/// shapes of the same logical result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SegmentDetail {
    Active {
        volume:         f64,
        monetary_value: f64,
        /// `None` when the variant's output omits ranks.
        volume_rank:    Option<QuartileRank>,
        monetary_rank:  Option<QuartileRank>,
    },
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentationRow {
    pub run_id:      RunId,
    pub timestamp:   DateTime<Utc>,
    pub item_id:     ItemId,
    pub detail:      SegmentDetail,
    /// Composite score for active items, reserved code for inactive ones.
    pub score:       SegmentCode,
    /// `None` when the variant's output omits labels.
    pub label:       Option<String>,
    pub group_tag:   String,
    pub source_name: String,
}

impl SegmentationRow {
    pub fn is_active(&self) -> bool {
        matches!(self.detail, SegmentDetail::Active { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantileRow {
    pub run_id:         RunId,
    pub timestamp:      DateTime<Utc>,
    pub group_tag:      String,
    pub percentile:     f64,
    pub volume:         f64,
    pub monetary_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionLogEntry {
    pub date:  DateTime<Utc>,
    pub event: String,
    pub note:  Option<String>,
}

impl ExecutionLogEntry {
    pub fn for_run(ctx: &RunContext) -> Self {
        Self {
            date:  ctx.timestamp,
            event: ctx.source_name.clone(),
            note:  Some(ctx.run_id.to_string()),
        }
    }
}

/// Everything one run hands to the load stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunOutput {
    pub context:      RunContext,
    pub segmentation: Vec<SegmentationRow>,
    pub quantiles:    Vec<QuantileRow>,
    pub log:          ExecutionLogEntry,
}

impl RunOutput {
    pub fn active_count(&self) -> usize {
        self.segmentation.iter().filter(|r| r.is_active()).count()
    }

    pub fn inactive_count(&self) -> usize {
        self.segmentation.len() - self.active_count()
    }

    /// Number of cohorts that produced thresholds.
    pub fn cohort_count(&self) -> usize {
        self.quantiles.len() / 3
    }
}
