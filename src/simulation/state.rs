//! Read-only snapshot of the engine handed to collaborators

use serde::Serialize;

use super::events::SimEvent;
use super::projection::TrainPosition;
use super::train::Train;
use super::types::{SectionKey, StationCode, TrainId};

/// Coarse run state of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineStatus {
    /// Loaded and never started
    Ready,
    Running,
    Paused,
    /// Queue drained and every train finished
    Finished,
    /// Queue drained but some trains never finished; no further progress is possible
    Stalled,
}

impl EngineStatus {
    /// Whether further ticks can change anything
    pub fn is_terminal(&self) -> bool {
        matches!(self, EngineStatus::Finished | EngineStatus::Stalled)
    }
}

/// One held section, keyed by the direction of travel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionOccupancy {
    pub section: SectionKey,
    pub train_id: TrainId,
}

/// One taken platform
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformOccupancy {
    pub station: StationCode,
    pub platform: u32,
    pub train_id: TrainId,
}

/// Copy of the engine state after a tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationState {
    pub time: f64,
    pub trains: Vec<Train>,
    pub events: Vec<SimEvent>,
    pub is_running: bool,
    pub speed: u32,
    pub selected_train: Option<TrainId>,
    pub status: EngineStatus,
    pub occupied_sections: Vec<SectionOccupancy>,
    pub occupied_platforms: Vec<PlatformOccupancy>,
    /// Interpolated positions at `time`
    pub positions: Vec<TrainPosition>,
}

impl SimulationState {
    pub fn train(&self, train_id: &TrainId) -> Option<&Train> {
        self.trains.iter().find(|train| train.id() == train_id)
    }

    pub fn position(&self, train_id: &TrainId) -> Option<&TrainPosition> {
        self.positions
            .iter()
            .find(|position| &position.train_id == train_id)
    }

    pub fn finished_trains(&self) -> impl Iterator<Item = &Train> {
        self.trains.iter().filter(|train| train.is_finished())
    }

    pub fn selected(&self) -> Option<&Train> {
        self.selected_train.as_ref().and_then(|id| self.train(id))
    }
}
