//! Append-only simulation log
//!
//! Log records describe what happened and when. They are never read back
//! by the engine.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::types::TrainId;

/// Train id used for records not tied to a train
pub const SYSTEM_ID: &str = "System";

/// Location label used for records not tied to a place
pub const NO_LOCATION: &str = "n/a";

/// Kind of a log record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventLabel {
    SimReset,
    SimStart,
    SimPause,
    SimEnd,
    DepartJourney,
    EnterSection,
    Held,
    ArriveStation,
    DepartStation,
    ArriveFinal,
    DepartureRescheduled,
    StaleEvent,
}

impl fmt::Display for EventLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EventLabel::SimReset => "SIM_RESET",
            EventLabel::SimStart => "SIM_START",
            EventLabel::SimPause => "SIM_PAUSE",
            EventLabel::SimEnd => "SIM_END",
            EventLabel::DepartJourney => "DEPART_JOURNEY",
            EventLabel::EnterSection => "ENTER_SECTION",
            EventLabel::Held => "HELD",
            EventLabel::ArriveStation => "ARRIVE_STATION",
            EventLabel::DepartStation => "DEPART_STATION",
            EventLabel::ArriveFinal => "ARRIVE_FINAL",
            EventLabel::DepartureRescheduled => "DEPARTURE_RESCHEDULED",
            EventLabel::StaleEvent => "STALE_EVENT",
        };
        f.write_str(label)
    }
}

/// One immutable log record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimEvent {
    pub time: f64,
    pub train_id: String,
    pub event: EventLabel,
    pub location: String,
    pub reason: Option<String>,
}

impl SimEvent {
    pub fn system(time: f64, event: EventLabel, reason: Option<String>) -> Self {
        Self {
            time,
            train_id: SYSTEM_ID.to_string(),
            event,
            location: NO_LOCATION.to_string(),
            reason,
        }
    }

    pub fn train(time: f64, train_id: &TrainId, event: EventLabel, location: impl Into<String>) -> Self {
        Self {
            time,
            train_id: train_id.to_string(),
            event,
            location: location.into(),
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn is_system(&self) -> bool {
        self.train_id == SYSTEM_ID
    }
}

impl fmt::Display for SimEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:>8.1}s] {:<8} {:<22} {}",
            self.time, self.train_id, self.event, self.location
        )?;
        if let Some(reason) = &self.reason {
            write!(f, " ({})", reason)?;
        }
        Ok(())
    }
}
