//! Segment label lookup.
//!
//! A label table is pure data: a map from segment code to business label.
//! It has no fallback. A code missing from the table is a configuration
//! error and resolving it fails.

use crate::{
    error::{SegError, SegResult},
    types::SegmentCode,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelTable {
    pub name:   String,
    pub labels: BTreeMap<SegmentCode, String>,
}

impl LabelTable {
    pub fn new(name: impl Into<String>, entries: &[(SegmentCode, &str)]) -> Self {
        Self {
            name:   name.into(),
            labels: entries
                .iter()
                .map(|(code, label)| (*code, label.to_string()))
                .collect(),
        }
    }

    pub fn resolve(&self, code: SegmentCode) -> SegResult<&str> {
        self.labels
            .get(&code)
            .map(String::as_str)
            .ok_or_else(|| SegError::UnmappedCode {
                table: self.name.clone(),
                code,
            })
    }

    /// Check that every code in `domain` maps to a non-empty label.
    pub fn ensure_covers<I>(&self, domain: I) -> SegResult<()>
    where
        I: IntoIterator<Item = SegmentCode>,
    {
        for code in domain {
            let label = self.resolve(code)?;
            if label.trim().is_empty() {
                return Err(SegError::InvalidConfig {
                    reason: format!("table '{}' has an empty label for code {code}", self.name),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmapped_code_fails() {
        let table = LabelTable::new("tiny", &[(11, "Star")]);
        assert_eq!(table.resolve(11).unwrap(), "Star");
        assert!(matches!(
            table.resolve(12),
            Err(SegError::UnmappedCode { code: 12, .. })
        ));
    }

    #[test]
    fn blank_label_does_not_cover() {
        let table = LabelTable::new("blank", &[(11, "Star"), (44, "  ")]);
        assert!(table.ensure_covers([11]).is_ok());
        assert!(matches!(
            table.ensure_covers([11, 44]),
            Err(SegError::InvalidConfig { .. })
        ));
    }
}
