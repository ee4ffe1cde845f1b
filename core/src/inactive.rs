//! Scoring for items without sales activity.
//!
//! Variants disagree on the codes and on whether status matters, so the
//! whole rule is data. Nothing here assumes a canonical rule.

use crate::{item::Item, types::SegmentCode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InactiveRule {
    /// Status values that mark an item as discontinued. Matched exactly.
    #[serde(default)]
    pub discontinued_statuses: Vec<String>,
    /// Code for discontinued items, regardless of age. `None` means the
    /// variant does not look at status at all.
    #[serde(default)]
    pub discontinued_code: Option<SegmentCode>,
    /// Items strictly older than this are stale.
    pub age_threshold_days: f64,
    pub stale_code: SegmentCode,
    pub fresh_code: SegmentCode,
}

impl InactiveRule {
    pub fn is_discontinued(&self, item: &Item) -> bool {
        self.discontinued_statuses.iter().any(|s| *s == item.status)
    }

    pub fn score(&self, item: &Item) -> SegmentCode {
        if let Some(code) = self.discontinued_code {
            if self.is_discontinued(item) {
                return code;
            }
        }
        if item.age_days > self.age_threshold_days {
            self.stale_code
        } else {
            self.fresh_code
        }
    }

    /// Every code this rule can emit.
    pub fn codes(&self) -> Vec<SegmentCode> {
        let mut codes: Vec<SegmentCode> = self
            .discontinued_code
            .into_iter()
            .chain([self.stale_code, self.fresh_code])
            .collect();
        codes.sort_unstable();
        codes.dedup();
        codes
    }
}
