//! The item row consumed by the engine.
//!
//! Items arrive fully materialized from an extract adapter. The engine
//! never reaches back to the source; everything it needs is on this struct.

use crate::{
    error::{SegError, SegResult},
    types::ItemId,
};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub item_id:        ItemId,
    /// Verbatim status text from the source (e.g. "Er udgået").
    pub status:         String,
    pub department:     Option<String>,
    pub item_type:      Option<String>,
    /// Physical quantity moved in the measurement window.
    pub volume:         f64,
    /// Revenue minus cost. May be negative.
    pub monetary_value: f64,
    /// Transactions in the window. 0 means no sales activity.
    pub activity_count: u64,
    pub age_days:       f64,
}

impl Item {
    pub fn has_activity(&self) -> bool {
        self.activity_count > 0
    }

    /// Check the per-row invariants. `row` is 1-based and only used
    /// for the error message.
    pub fn validate(&self, row: usize) -> SegResult<()> {
        let malformed = |reason: String| SegError::MalformedInput { row, reason };

        if self.item_id.trim().is_empty() {
            return Err(malformed("empty item id".into()));
        }
        if !self.volume.is_finite() || self.volume < 0.0 {
            return Err(malformed(format!(
                "item {}: volume must be a finite number >= 0, got {}",
                self.item_id, self.volume
            )));
        }
        if !self.monetary_value.is_finite() {
            return Err(malformed(format!(
                "item {}: monetary value is not a finite number",
                self.item_id
            )));
        }
        if !self.age_days.is_finite() || self.age_days < 0.0 {
            return Err(malformed(format!(
                "item {}: age in days must be a finite number >= 0, got {}",
                self.item_id, self.age_days
            )));
        }
        Ok(())
    }
}

/// Validate every row and the uniqueness of ids. Any failure aborts the
/// whole batch.
pub fn validate_items(items: &[Item]) -> SegResult<()> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        item.validate(idx + 1)?;
        if !seen.insert(item.item_id.as_str()) {
            return Err(SegError::DuplicateItem {
                item_id: item.item_id.clone(),
            });
        }
    }
    Ok(())
}
