//! Extract adapters.
//!
//! RULE: sources own their I/O and hand back fully materialized items.
//! The engine never sees a file handle or a connection.
//!
//! CSV columns (header row required):
//!   item_no, status, department, item_type, volume,
//!   monetary_value | (revenue, cost), activity_count, age_days
//!
//! `department`, `item_type` and `activity_count` may be absent or empty.
//! A missing activity count means no activity. When `monetary_value` is
//! absent it is derived as revenue minus cost. Items without activity may
//! leave the measures empty (an outer join upstream yields nothing for
//! them); those default to zero. Items with activity must carry them.

use crate::{
    error::{SegError, SegResult},
    item::Item,
};
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Anything that can produce the item snapshot for one run.
pub trait ItemSource {
    /// Stable name used in logs.
    fn name(&self) -> &str;

    /// Read the full snapshot. Called once per run.
    fn fetch(&mut self) -> SegResult<Vec<Item>>;
}

/// One raw input row before monetary derivation and defaulting.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemRecord {
    pub item_no: String,
    pub status: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub monetary_value: Option<f64>,
    #[serde(default)]
    pub revenue: Option<f64>,
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub activity_count: Option<u64>,
    pub age_days: f64,
}

impl ItemRecord {
    /// `row` is the 1-based data row, used in error messages.
    pub fn into_item(self, row: usize) -> SegResult<Item> {
        let activity_count = self.activity_count.unwrap_or(0);
        let malformed = |reason: String| SegError::MalformedInput { row, reason };

        let monetary_value = match (self.monetary_value, self.revenue, self.cost) {
            (Some(value), _, _) => Some(value),
            (None, Some(revenue), Some(cost)) => Some(revenue - cost),
            _ => None,
        };
        let (volume, monetary_value) = match (self.volume, monetary_value) {
            (Some(volume), Some(monetary_value)) => (volume, monetary_value),
            (volume, monetary_value) if activity_count == 0 => {
                (volume.unwrap_or(0.0), monetary_value.unwrap_or(0.0))
            }
            (None, _) => {
                return Err(malformed(format!("item {}: volume is missing", self.item_no)))
            }
            (Some(_), None) => {
                return Err(malformed(format!(
                    "item {}: needs monetary_value or both revenue and cost",
                    self.item_no
                )))
            }
        };

        Ok(Item {
            item_id: self.item_no,
            status: self.status,
            department: self.department,
            item_type: self.item_type,
            volume,
            monetary_value,
            activity_count,
            age_days: self.age_days,
        })
    }
}

/// Parse items from any CSV reader. Stops at the first bad row.
pub fn load_items<R: Read>(reader: R) -> SegResult<Vec<Item>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut items = Vec::new();
    for (idx, result) in csv_reader.deserialize::<ItemRecord>().enumerate() {
        let row = idx + 1;
        let record = result.map_err(|e| SegError::MalformedInput {
            row,
            reason: e.to_string(),
        })?;
        items.push(record.into_item(row)?);
    }
    Ok(items)
}

/// Items from a CSV export on disk.
pub struct CsvItemSource {
    path: PathBuf,
    name: String,
}

impl CsvItemSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = format!("csv:{}", path.display());
        Self { path, name }
    }
}

impl ItemSource for CsvItemSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&mut self) -> SegResult<Vec<Item>> {
        let file = std::fs::File::open(&self.path)?;
        let items = load_items(file)?;
        log::info!("{}: read {} items", self.name, items.len());
        Ok(items)
    }
}
