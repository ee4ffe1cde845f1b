//! Item segmentation and quantile threshold tables.

use super::{parse_run_id, parse_timestamp, timestamp_text, ReportStore};
use crate::{
    error::SegResult,
    output::{QuantileRow, SegmentDetail, SegmentationRow},
    run::RunId,
};
use rusqlite::params;

impl ReportStore {
    /// Append segmentation rows in one transaction.
    pub fn insert_segmentation_rows(&self, rows: &[SegmentationRow]) -> SegResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO item_segmentation (
                    execution_id, timestamp, item_no, quantity, monetary_value,
                    quantity_quartile, monetary_quartile, score, segment, type, script
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            )?;
            for row in rows {
                let (volume, monetary_value, volume_rank, monetary_rank) = match &row.detail {
                    SegmentDetail::Active {
                        volume,
                        monetary_value,
                        volume_rank,
                        monetary_rank,
                    } => (Some(*volume), Some(*monetary_value), *volume_rank, *monetary_rank),
                    SegmentDetail::Inactive => (None, None, None, None),
                };
                stmt.execute(params![
                    row.run_id.to_string(),
                    timestamp_text(&row.timestamp),
                    &row.item_id,
                    volume,
                    monetary_value,
                    volume_rank,
                    monetary_rank,
                    row.score,
                    &row.label,
                    &row.group_tag,
                    &row.source_name,
                ])?;
            }
        }
        tx.commit()?;
        Ok(rows.len())
    }

    /// Append quantile rows in one transaction.
    pub fn insert_quantile_rows(&self, rows: &[QuantileRow]) -> SegResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO item_segmentation_quantiles (
                    execution_id, timestamp, type, quantile, quantity, monetary_value
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for row in rows {
                stmt.execute(params![
                    row.run_id.to_string(),
                    timestamp_text(&row.timestamp),
                    &row.group_tag,
                    row.percentile,
                    row.volume,
                    row.monetary_value,
                ])?;
            }
        }
        tx.commit()?;
        Ok(rows.len())
    }

    /// All segmentation rows written by one run, in insertion order.
    pub fn segmentation_rows(&self, run_id: &RunId) -> SegResult<Vec<SegmentationRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT execution_id, timestamp, item_no, quantity, monetary_value,
                    quantity_quartile, monetary_quartile, score, segment, type, script
             FROM item_segmentation WHERE execution_id = ?1
             ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![run_id.to_string()], |row| {
            let volume: Option<f64> = row.get(3)?;
            let detail = match volume {
                Some(volume) => SegmentDetail::Active {
                    volume,
                    monetary_value: row.get(4)?,
                    volume_rank: row.get(5)?,
                    monetary_rank: row.get(6)?,
                },
                None => SegmentDetail::Inactive,
            };
            Ok(SegmentationRow {
                run_id: parse_run_id(0, &row.get::<_, String>(0)?)?,
                timestamp: parse_timestamp(1, &row.get::<_, String>(1)?)?,
                item_id: row.get(2)?,
                detail,
                score: row.get(7)?,
                label: row.get(8)?,
                group_tag: row.get(9)?,
                source_name: row.get(10)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// All quantile rows written by one run, in insertion order.
    pub fn quantile_rows(&self, run_id: &RunId) -> SegResult<Vec<QuantileRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT execution_id, timestamp, type, quantile, quantity, monetary_value
             FROM item_segmentation_quantiles WHERE execution_id = ?1
             ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![run_id.to_string()], |row| {
            Ok(QuantileRow {
                run_id: parse_run_id(0, &row.get::<_, String>(0)?)?,
                timestamp: parse_timestamp(1, &row.get::<_, String>(1)?)?,
                group_tag: row.get(2)?,
                percentile: row.get(3)?,
                volume: row.get(4)?,
                monetary_value: row.get(5)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn segmentation_count(&self, run_id: &RunId) -> SegResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM item_segmentation WHERE execution_id = ?1",
            params![run_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Label counts for one run, most common first.
    pub fn segment_counts(&self, run_id: &RunId) -> SegResult<Vec<(String, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT COALESCE(segment, '(unlabelled)'), COUNT(*)
             FROM item_segmentation WHERE execution_id = ?1
             GROUP BY 1 ORDER BY 2 DESC, 1 ASC",
        )?;
        let rows = stmt.query_map(params![run_id.to_string()], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
