//! Projection of authoritative train state onto a continuous position
//!
//! Pure functions: nothing here mutates the engine. Progress along a
//! section is recomputed from the entry time and the same traversal time
//! the state machine used when it scheduled the arrival.

use serde::Serialize;

use super::network::RailNetwork;
use super::train::Train;
use super::types::{Location, TrainId};

/// A train's renderable position at a point in simulated time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainPosition {
    pub train_id: TrainId,
    pub position: Location,
}

/// Where `train` should be drawn at `now`
pub fn project(train: &Train, network: &RailNetwork, now: f64, buffer_factor: f64) -> Location {
    match &train.location {
        Location::Station { .. } => train.location.clone(),
        Location::Section { u, v, .. } => {
            let Some((_, section)) = network.resolve_section(u, v) else {
                return train.location.clone();
            };

            let travel_time = train.travel_time(section, buffer_factor);
            let progress = if travel_time > 0.0 {
                ((now - train.last_event_time) / travel_time).clamp(0.0, 1.0)
            } else {
                1.0
            };

            Location::Section {
                u: u.clone(),
                v: v.clone(),
                progress,
            }
        }
    }
}

/// Projects every train, in train order
pub fn project_all(
    trains: &[Train],
    network: &RailNetwork,
    now: f64,
    buffer_factor: f64,
) -> Vec<TrainPosition> {
    trains
        .iter()
        .map(|train| TrainPosition {
            train_id: train.id().clone(),
            position: project(train, network, now, buffer_factor),
        })
        .collect()
}
