//! Aggregate metrics over a snapshot

use serde::Serialize;

use super::state::SimulationState;
use super::types::{TrainId, TrainStatus};

/// Run-level metrics for finished trains and the fleet as a whole
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NetworkStats {
    pub total_trains: usize,
    pub waiting: usize,
    pub running: usize,
    /// Running trains currently held for an occupied section
    pub held: usize,
    pub finished: usize,
    /// Mean delay over finished trains, 0 when none have finished
    pub average_delay_s: f64,
    /// Finished trains per simulated hour, 0 at time 0
    pub throughput_per_hour: f64,
    /// `(train, delay)` for finished trains, largest delay first
    pub delays: Vec<(TrainId, f64)>,
}

impl NetworkStats {
    pub fn from_state(state: &SimulationState) -> Self {
        let count = |status: TrainStatus| state.trains.iter().filter(|t| t.status == status).count();

        let mut delays: Vec<(TrainId, f64)> = state
            .finished_trains()
            .map(|train| (train.id().clone(), train.delay_s))
            .collect();
        delays.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let finished = delays.len();
        let average_delay_s = if finished == 0 {
            0.0
        } else {
            delays.iter().map(|(_, delay)| delay).sum::<f64>() / finished as f64
        };
        let throughput_per_hour = if state.time > 0.0 {
            finished as f64 * 3600.0 / state.time
        } else {
            0.0
        };

        Self {
            total_trains: state.trains.len(),
            waiting: count(TrainStatus::Waiting),
            running: count(TrainStatus::Running),
            held: state.trains.iter().filter(|t| t.is_held()).count(),
            finished,
            average_delay_s,
            throughput_per_hour,
            delays,
        }
    }
}
