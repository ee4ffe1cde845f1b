//! SQLite reporting store.
//!
//! RULE: Only the store talks to the database.
//! The engine hands rows to the store through ResultSink; it never
//! executes SQL itself.

mod log_entry;
mod segmentation;
mod warehouse;

pub use warehouse::WarehouseSource;

use crate::{
    error::SegResult,
    output::{ExecutionLogEntry, QuantileRow, SegmentationRow},
    pipeline::ResultSink,
    run::RunId,
};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{types::Type, Connection};

pub struct ReportStore {
    conn: Connection,
}

impl ReportStore {
    /// Open (or create) the reporting database at `path`.
    pub fn open(path: &str) -> SegResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only matters for real files; :memory: ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SegResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order. Idempotent.
    pub fn migrate(&self) -> SegResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_reporting.sql"))?;
        Ok(())
    }
}

impl ResultSink for ReportStore {
    fn append_segmentation(&self, rows: &[SegmentationRow]) -> SegResult<usize> {
        self.insert_segmentation_rows(rows)
    }

    fn append_quantiles(&self, rows: &[QuantileRow]) -> SegResult<usize> {
        self.insert_quantile_rows(rows)
    }

    fn append_log(&self, entry: &ExecutionLogEntry) -> SegResult<()> {
        self.insert_log_entry(entry)
    }
}

// ── Column codecs ──────────────────────────────────────────────

fn timestamp_text(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(idx: usize, text: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_run_id(idx: usize, text: &str) -> rusqlite::Result<RunId> {
    text.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
