//! Execution log table.

use super::{parse_timestamp, timestamp_text, ReportStore};
use crate::{error::SegResult, output::ExecutionLogEntry};
use rusqlite::params;

impl ReportStore {
    pub fn insert_log_entry(&self, entry: &ExecutionLogEntry) -> SegResult<()> {
        self.conn.execute(
            "INSERT INTO execution_log (date, event, note) VALUES (?1, ?2, ?3)",
            params![timestamp_text(&entry.date), &entry.event, &entry.note],
        )?;
        Ok(())
    }

    /// Every log entry, oldest first.
    pub fn log_entries(&self) -> SegResult<Vec<ExecutionLogEntry>> {
        let mut stmt = self
            .conn
            .prepare("SELECT date, event, note FROM execution_log ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok(ExecutionLogEntry {
                date: parse_timestamp(0, &row.get::<_, String>(0)?)?,
                event: row.get(1)?,
                note: row.get(2)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
