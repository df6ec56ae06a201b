//! Core types for the rail simulation
//!
//! Identifiers, directional section keys, train lifecycle status and the
//! authoritative location of a train.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Schedule padding applied to every section traversal
pub const BUFFER_FACTOR: f64 = 1.2;

/// How far a blocked section entry is pushed back before it is re-checked
pub const RETRY_INTERVAL_S: f64 = 10.0;

/// Dwell used when a station has no (or a zero) mean dwell
pub const DEFAULT_DWELL_S: f64 = 60.0;

/// Simulated seconds per tick at speed multiplier 1
pub const TICK_INCREMENT_S: f64 = 1.0;

/// Bounds of the speed multiplier control
pub const MIN_SPEED: u32 = 1;
pub const MAX_SPEED: u32 = 100;

/// Identifier of a train, as given in the timetable data
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrainId(pub String);

impl TrainId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique station code (e.g. "SBC")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationCode(pub String);

impl StationCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Directional key of a section: travel from `from` towards `to`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SectionKey {
    pub from: StationCode,
    pub to: StationCode,
}

impl SectionKey {
    pub fn new(from: StationCode, to: StationCode) -> Self {
        Self { from, to }
    }

    /// The key of the opposite direction over the same pair of stations
    pub fn reverse(&self) -> SectionKey {
        SectionKey {
            from: self.to.clone(),
            to: self.from.clone(),
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

/// Lifecycle status of a train
///
/// Transitions only go `Waiting -> Running -> Finished`. A train that is
/// contending for a section stays `Running`; see [`Train::held_since`].
///
/// [`Train::held_since`]: super::train::Train::held_since
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainStatus {
    Waiting,
    Running,
    Finished,
}

impl fmt::Display for TrainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TrainStatus::Waiting => "waiting",
            TrainStatus::Running => "running",
            TrainStatus::Finished => "finished",
        };
        f.write_str(label)
    }
}

/// Authoritative location of a train, as of its last state change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Location {
    Station { code: StationCode },
    Section { u: StationCode, v: StationCode, progress: f64 },
}

impl Location {
    pub fn station(code: StationCode) -> Self {
        Location::Station { code }
    }

    /// Human-readable label used in log records and summaries
    pub fn label(&self) -> String {
        match self {
            Location::Station { code } => code.to_string(),
            Location::Section { u, v, progress } => {
                format!("{}-{} ({:.0}%)", u, v, progress * 100.0)
            }
        }
    }
}
