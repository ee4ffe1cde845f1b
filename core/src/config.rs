//! Variant configuration.
//!
//! One engine serves every product family. What differs between families
//! lives here: grouping fields, label table, inactive rule and the output
//! column set. Variants are loaded from `data/variants/*.json`; tests use
//! the built-in constructors.

use crate::{
    cohort::GroupField,
    error::{SegError, SegResult},
    inactive::InactiveRule,
    label::LabelTable,
    score::all_composites,
    types::SegmentCode,
};
use serde::{Deserialize, Serialize};

/// Status the warehouse uses for discontinued items.
pub const DISCONTINUED_STATUS: &str = "Er udgået";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputColumns {
    #[serde(default = "yes")]
    pub include_ranks: bool,
    #[serde(default = "yes")]
    pub include_label: bool,
}

fn yes() -> bool {
    true
}

impl Default for OutputColumns {
    fn default() -> Self {
        Self {
            include_ranks: true,
            include_label: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantConfig {
    pub name: String,
    /// Written on every segmentation row and as the log event name.
    pub source_name: String,
    pub group_by: Vec<GroupField>,
    /// Route discontinued items to the inactive path even when they
    /// still show activity in the window.
    #[serde(default)]
    pub discontinued_is_inactive: bool,
    pub inactive: InactiveRule,
    #[serde(default)]
    pub output: OutputColumns,
    pub labels: LabelTable,
}

impl VariantConfig {
    /// Load and validate a variant file.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: VariantConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Every code the label table must be able to resolve for this variant.
    pub fn code_domain(&self) -> Vec<SegmentCode> {
        let mut domain = self.inactive.codes();
        domain.extend(all_composites());
        domain
    }

    pub fn validate(&self) -> SegResult<()> {
        let invalid = |reason: String| SegError::InvalidConfig { reason };

        if self.source_name.trim().is_empty() {
            return Err(invalid(format!("variant '{}' has no source name", self.name)));
        }
        match self.group_by.as_slice() {
            [_] => {}
            [a, b] if a != b => {}
            _ => {
                return Err(invalid(format!(
                    "variant '{}' must group by one or two distinct fields, got {:?}",
                    self.name, self.group_by
                )))
            }
        }
        let threshold = self.inactive.age_threshold_days;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(invalid(format!(
                "variant '{}' has an invalid age threshold {threshold}",
                self.name
            )));
        }
        if let Some(code) = self.inactive.codes().into_iter().find(|c| *c > 10) {
            return Err(invalid(format!(
                "variant '{}' inactive code {code} overlaps the composite score range",
                self.name
            )));
        }
        if self.inactive.stale_code == self.inactive.fresh_code {
            return Err(invalid(format!(
                "variant '{}' uses the same code for stale and fresh items",
                self.name
            )));
        }
        if self.discontinued_is_inactive && self.inactive.discontinued_statuses.is_empty() {
            return Err(invalid(format!(
                "variant '{}' routes discontinued items but lists no discontinued status",
                self.name
            )));
        }
        self.labels.ensure_covers(self.code_domain())
    }

    /// Coffee: department x coffee type cohorts, {0, 1, 2} inactive codes.
    pub fn coffee() -> Self {
        Self {
            name: "coffee".into(),
            source_name: "QM_Coffee".into(),
            group_by: vec![GroupField::Department, GroupField::ItemType],
            discontinued_is_inactive: true,
            inactive: InactiveRule {
                discontinued_statuses: vec![DISCONTINUED_STATUS.into()],
                discontinued_code: Some(0),
                age_threshold_days: 90.0,
                stale_code: 1,
                fresh_code: 2,
            },
            output: OutputColumns::default(),
            labels: coffee_labels(),
        }
    }

    /// Department-only cohorts, status-blind {0, 1} inactive codes.
    pub fn coffee_by_department() -> Self {
        Self {
            name: "coffee_department".into(),
            source_name: "QM_Coffee_Department".into(),
            group_by: vec![GroupField::Department],
            discontinued_is_inactive: false,
            inactive: InactiveRule {
                discontinued_statuses: Vec::new(),
                discontinued_code: None,
                age_threshold_days: 90.0,
                stale_code: 0,
                fresh_code: 1,
            },
            output: OutputColumns {
                include_ranks: false,
                include_label: true,
            },
            labels: department_labels(),
        }
    }

    /// Config for unit and integration tests.
    pub fn default_test() -> Self {
        Self::coffee()
    }
}

fn coffee_labels() -> LabelTable {
    LabelTable::new(
        "coffee_segments",
        &[
            (0, "Discontinued"),
            (1, "Dead stock"),
            (2, "New item"),
            (11, "Star"),
            (12, "Star"),
            (21, "Star"),
            (22, "Star"),
            (13, "Volume driver"),
            (14, "Volume driver"),
            (23, "Volume driver"),
            (24, "Volume driver"),
            (31, "Cash cow"),
            (32, "Cash cow"),
            (41, "Cash cow"),
            (42, "Cash cow"),
            (33, "Question mark"),
            (34, "Question mark"),
            (43, "Question mark"),
            (44, "Phase out"),
        ],
    )
}

fn department_labels() -> LabelTable {
    LabelTable::new(
        "department_segments",
        &[
            (0, "Phase out"),
            (1, "New item"),
            (11, "Top seller"),
            (12, "Core"),
            (21, "Core"),
            (22, "Core"),
            (13, "Traffic builder"),
            (14, "Traffic builder"),
            (23, "Traffic builder"),
            (24, "Traffic builder"),
            (31, "Niche"),
            (32, "Niche"),
            (41, "Niche"),
            (42, "Niche"),
            (33, "Tail"),
            (34, "Tail"),
            (43, "Tail"),
            (44, "Phase out"),
        ],
    )
}
