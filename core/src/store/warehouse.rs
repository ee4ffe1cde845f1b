//! Item snapshot read from a SQLite warehouse extract.
//!
//! Expects an `item` table with columns
//!   item_no, status, category, department, item_type,
//!   volume, revenue, cost, activity_count, age_days
//! Monetary value is revenue minus cost. A NULL activity count means the
//! item had no sales in the window, and then NULL measures read as zero.

use crate::{
    error::{SegError, SegResult},
    item::Item,
    source::{ItemRecord, ItemSource},
};
use rusqlite::{params, Connection, OpenFlags};

pub struct WarehouseSource {
    conn:     Connection,
    category: Option<String>,
    name:     String,
}

impl WarehouseSource {
    /// Open a warehouse file read-only, optionally restricted to one
    /// item category.
    pub fn open(path: &str, category: Option<String>) -> SegResult<Self> {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        Ok(Self::from_connection(conn, category, format!("warehouse:{path}")))
    }

    pub fn from_connection(conn: Connection, category: Option<String>, name: String) -> Self {
        Self {
            conn,
            category,
            name,
        }
    }
}

type RawRow = (
    String,
    String,
    Option<String>,
    Option<String>,
    Option<f64>,
    Option<f64>,
    Option<f64>,
    Option<i64>,
    Option<f64>,
);

impl ItemSource for WarehouseSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&mut self) -> SegResult<Vec<Item>> {
        let mut stmt = self.conn.prepare(
            "SELECT item_no, status, department, item_type, volume,
                    revenue, cost, activity_count, age_days
             FROM item
             WHERE (?1 IS NULL OR category = ?1)
             ORDER BY item_no ASC",
        )?;
        let raw = stmt.query_map(params![self.category], |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
                row.get(6)?,
                row.get(7)?,
                row.get(8)?,
            ))
        })?;

        let mut items = Vec::new();
        for (idx, result) in raw.enumerate() {
            let row = idx + 1;
            let raw: RawRow = result.map_err(|e| match e {
                rusqlite::Error::InvalidColumnType(..)
                | rusqlite::Error::FromSqlConversionFailure(..) => SegError::MalformedInput {
                    row,
                    reason: e.to_string(),
                },
                other => other.into(),
            })?;
            items.push(into_record(raw, row)?.into_item(row)?);
        }
        log::info!("{}: read {} items", self.name, items.len());
        Ok(items)
    }
}

fn into_record(raw: RawRow, row: usize) -> SegResult<ItemRecord> {
    let (item_no, status, department, item_type, volume, revenue, cost, activity_count, age_days) =
        raw;
    let activity_count = match activity_count {
        Some(n) if n < 0 => {
            return Err(SegError::MalformedInput {
                row,
                reason: format!("item {item_no}: negative activity count {n}"),
            })
        }
        other => other.map(|n| n as u64),
    };
    let Some(age_days) = age_days else {
        return Err(SegError::MalformedInput {
            row,
            reason: format!("item {item_no}: age_days is NULL"),
        });
    };
    Ok(ItemRecord {
        item_no,
        status,
        department,
        item_type,
        volume,
        monetary_value: None,
        revenue,
        cost,
        activity_count,
        age_days,
    })
}
