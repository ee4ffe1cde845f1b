//! Run identity: the identifier and instant shared by every output row.

use chrono::{DateTime, SubsecRound, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Identifier of one pipeline execution.
///
/// Backed by a random v4 UUID: unique across invocations without relying
/// on wall-clock resolution, so two runs started in the same second never
/// collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    pub fn generate() -> Self {
        RunId(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::str::FromStr for RunId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(RunId)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunContext {
    pub run_id:      RunId,
    pub timestamp:   DateTime<Utc>,
    pub source_name: String,
}

impl RunContext {
    /// Start a run now.
    pub fn start(source_name: impl Into<String>) -> Self {
        Self::at(Utc::now(), source_name)
    }

    /// Start a run at a fixed instant (tests and replays). The timestamp is
    /// truncated to milliseconds so it survives a round trip through the
    /// store unchanged.
    pub fn at(timestamp: DateTime<Utc>, source_name: impl Into<String>) -> Self {
        Self {
            run_id: RunId::generate(),
            timestamp: timestamp.trunc_subsecs(3),
            source_name: source_name.into(),
        }
    }
}
