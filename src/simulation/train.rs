//! Trains and their lifecycle fields

use serde::{Deserialize, Serialize};

use super::event_queue::EventId;
use super::section::Section;
use super::types::{Location, StationCode, TrainId, TrainStatus};

/// Static description of a train as found in the timetable data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainRecord {
    pub train_id: TrainId,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub priority: u32,
    pub vmax_kmph: f64,
    #[serde(default)]
    pub acceleration_ms2: f64,
    #[serde(default)]
    pub base_deceleration_ms2: f64,
    #[serde(default)]
    pub length_m: f64,
    pub route: Vec<StationCode>,
    pub depart_time_s: f64,
}

impl TrainRecord {
    pub fn new(train_id: &str, vmax_kmph: f64, route: &[&str], depart_time_s: f64) -> Self {
        Self {
            train_id: TrainId::new(train_id),
            category: String::new(),
            priority: 0,
            vmax_kmph,
            acceleration_ms2: 0.0,
            base_deceleration_ms2: 0.0,
            length_m: 0.0,
            route: route.iter().map(|code| StationCode::new(*code)).collect(),
            depart_time_s,
        }
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }
}

/// A train in the simulation
///
/// Status, route index and location are only changed by the train state
/// machine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Train {
    #[serde(flatten)]
    pub record: TrainRecord,
    pub status: TrainStatus,
    /// Cumulative delay caused by waiting for occupied sections
    pub delay_s: f64,
    /// Index into the route of the station last departed from or arrived at
    pub route_index: usize,
    pub location: Location,
    /// Time of the last authoritative state change
    pub last_event_time: f64,
    /// Set while the train is being held for an occupied section
    pub held_since: Option<f64>,
    /// Pending departure event, while the train is still waiting
    #[serde(skip)]
    pub pending_depart: Option<EventId>,
}

impl Train {
    /// A train waiting at its origin, as after a reset
    pub fn from_record(record: TrainRecord) -> Self {
        let origin = record.route.first().cloned().unwrap_or_else(|| StationCode::new(""));
        Self {
            status: TrainStatus::Waiting,
            delay_s: 0.0,
            route_index: 0,
            location: Location::station(origin),
            last_event_time: 0.0,
            held_since: None,
            pending_depart: None,
            record,
        }
    }

    pub fn id(&self) -> &TrainId {
        &self.record.train_id
    }

    pub fn route(&self) -> &[StationCode] {
        &self.record.route
    }

    pub fn origin(&self) -> Option<&StationCode> {
        self.record.route.first()
    }

    pub fn destination(&self) -> Option<&StationCode> {
        self.record.route.last()
    }

    pub fn is_finished(&self) -> bool {
        self.status == TrainStatus::Finished
    }

    pub fn is_held(&self) -> bool {
        self.held_since.is_some()
    }

    /// Whether `route_index` points at the final station of the route
    pub fn at_last_route_index(&self) -> bool {
        self.route_index + 1 >= self.record.route.len()
    }

    /// The hop `(u, v)` leaving the station at `route_index`
    pub fn next_hop(&self) -> Option<(StationCode, StationCode)> {
        let route = &self.record.route;
        let u = route.get(self.route_index)?;
        let v = route.get(self.route_index + 1)?;
        Some((u.clone(), v.clone()))
    }

    /// Seconds needed to traverse `section`, padded by `buffer_factor`
    ///
    /// Only the train's own maximum speed is taken into account.
    pub fn travel_time(&self, section: &Section, buffer_factor: f64) -> f64 {
        (section.length_km / self.record.vmax_kmph) * 3600.0 * buffer_factor
    }
}
