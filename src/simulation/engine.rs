//! Main simulation engine that ties everything together
//!
//! Owns the network, occupancy, event queue, trains and log. Time only
//! moves in [`SimEngine::tick`], which drains every event due by the new
//! time before advancing the clock.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};

use super::clock::Clock;
use super::config::EngineConfig;
use super::error::{CommandError, ConfigError, LoadError};
use super::event_queue::{EventKind, EventQueue, ScheduledEvent};
use super::events::{EventLabel, SimEvent};
use super::loader::NetworkData;
use super::network::RailNetwork;
use super::occupancy::OccupancyArbiter;
use super::projection::project_all;
use super::section::{Disruption, Section};
use super::state::{EngineStatus, PlatformOccupancy, SectionOccupancy, SimulationState};
use super::station::Station;
use super::train::{Train, TrainRecord};
use super::train_manager::{self, TransitionContext};
use super::types::{SectionKey, TrainId, TrainStatus};

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Clock after the tick
    pub time: f64,
    pub events_applied: usize,
    pub status: EngineStatus,
}

/// The discrete-event rail simulation engine
pub struct SimEngine {
    config: EngineConfig,

    /// Data the current run was loaded from, kept for restarts
    data: NetworkData,

    network: RailNetwork,

    occupancy: OccupancyArbiter,

    queue: EventQueue,

    clock: Clock,

    /// Trains in load order
    trains: Vec<Train>,

    train_index: HashMap<TrainId, usize>,

    /// Append-only simulation log
    events: Vec<SimEvent>,

    is_running: bool,

    started: bool,

    /// Set once the queue has drained and SIM_END was logged
    ended: bool,

    selected_train: Option<TrainId>,
}

impl Default for SimEngine {
    fn default() -> Self {
        Self::build(EngineConfig::default())
    }
}

impl SimEngine {
    /// An empty engine; load data with [`SimEngine::reset`] or [`SimEngine::load`]
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        Self {
            clock: Clock::new(config.tick_increment_s),
            config,
            data: NetworkData::default(),
            network: RailNetwork::new(),
            occupancy: OccupancyArbiter::new(),
            queue: EventQueue::new(),
            trains: Vec::new(),
            train_index: HashMap::new(),
            events: Vec::new(),
            is_running: false,
            started: false,
            ended: false,
            selected_train: None,
        }
    }

    /// Builds an engine and loads `data` into it
    pub fn with_data(config: EngineConfig, data: NetworkData) -> Result<Self, LoadError> {
        let mut engine = Self::new(config)?;
        engine.load(data)?;
        Ok(engine)
    }

    pub fn load(&mut self, data: NetworkData) -> Result<(), LoadError> {
        self.reset(data.stations, data.sections, data.trains)
    }

    /// Replaces the whole simulation with new data
    ///
    /// Everything is validated before anything is replaced; on error the
    /// engine keeps its previous state.
    pub fn reset(
        &mut self,
        stations: Vec<Station>,
        sections: Vec<Section>,
        trains: Vec<TrainRecord>,
    ) -> Result<(), LoadError> {
        let data = NetworkData {
            stations,
            sections,
            trains,
        };
        let network = RailNetwork::from_parts(data.stations.clone(), data.sections.clone())?;
        validate_trains(&network, &data.trains)?;

        let mut queue = EventQueue::new();
        let mut train_index = HashMap::new();
        let mut trains = Vec::with_capacity(data.trains.len());
        for record in &data.trains {
            let mut train = Train::from_record(record.clone());
            let depart = queue.schedule(record.depart_time_s, EventKind::Depart, train.id().clone());
            train.pending_depart = Some(depart);
            train_index.insert(train.id().clone(), trains.len());
            trains.push(train);
        }

        info!(
            "Simulation reset: {} stations, {} sections, {} trains",
            network.station_count(),
            network.section_count(),
            trains.len()
        );

        self.data = data;
        self.network = network;
        self.occupancy.clear();
        self.queue = queue;
        self.clock = Clock::new(self.config.tick_increment_s);
        self.trains = trains;
        self.train_index = train_index;
        self.is_running = false;
        self.started = false;
        self.ended = false;
        self.selected_train = None;
        self.events = vec![SimEvent::system(
            0.0,
            EventLabel::SimReset,
            Some("Simulation reset to initial state.".to_string()),
        )];
        Ok(())
    }

    /// Resets to the data the current run was loaded from
    pub fn restart(&mut self) -> Result<(), LoadError> {
        let data = self.data.clone();
        self.load(data)
    }

    /// Starts or resumes ticking; no-op if already running or ended
    pub fn start(&mut self) {
        if self.is_running {
            return;
        }
        if self.ended {
            info!("Simulation already ended at {:.1}s", self.clock.now());
            return;
        }
        self.is_running = true;
        self.started = true;
        self.events
            .push(SimEvent::system(self.clock.now(), EventLabel::SimStart, None));
        info!("Simulation started at {:.1}s", self.clock.now());
    }

    /// Stops ticking; queue and state stay intact
    pub fn pause(&mut self) {
        if !self.is_running {
            return;
        }
        self.is_running = false;
        self.events
            .push(SimEvent::system(self.clock.now(), EventLabel::SimPause, None));
        info!("Simulation paused at {:.1}s", self.clock.now());
    }

    pub fn toggle_play_pause(&mut self) {
        if self.is_running {
            self.pause();
        } else {
            self.start();
        }
    }

    pub fn set_speed(&mut self, speed: u32) -> Result<(), CommandError> {
        self.clock
            .set_speed(speed, self.config.min_speed, self.config.max_speed)
            .inspect_err(|err| warn!("Rejected speed change: {}", err))
    }

    pub fn select_train(&mut self, train_id: Option<TrainId>) -> Result<(), CommandError> {
        if let Some(id) = &train_id {
            if !self.train_index.contains_key(id) {
                return Err(CommandError::UnknownTrain(id.to_string()));
            }
        }
        self.selected_train = train_id;
        Ok(())
    }

    /// Moves a waiting train's departure, rescheduling its pending event
    ///
    /// Rejected once the train has departed or if `depart_time_s` is
    /// already in the past.
    pub fn set_departure_time(
        &mut self,
        train_id: &TrainId,
        depart_time_s: f64,
    ) -> Result<(), CommandError> {
        let index = *self
            .train_index
            .get(train_id)
            .ok_or_else(|| CommandError::UnknownTrain(train_id.to_string()))?;
        let now = self.clock.now();
        let train = &mut self.trains[index];

        let pending = match (train.status, train.pending_depart) {
            (TrainStatus::Waiting, Some(pending)) => pending,
            _ => return Err(CommandError::DepartureAlreadyTaken(train_id.to_string())),
        };
        if !depart_time_s.is_finite() || depart_time_s < now {
            return Err(CommandError::DepartureInPast {
                requested: depart_time_s,
                now,
            });
        }
        if !self.queue.cancel(pending) {
            return Err(CommandError::DepartureAlreadyTaken(train_id.to_string()));
        }

        let previous = train.record.depart_time_s;
        train.record.depart_time_s = depart_time_s;
        train.pending_depart =
            Some(
                self.queue
                    .schedule(depart_time_s, EventKind::Depart, train_id.clone()),
            );

        let origin = train.origin().map(ToString::to_string).unwrap_or_default();
        self.events.push(
            SimEvent::train(now, train_id, EventLabel::DepartureRescheduled, origin)
                .with_reason(format!(
                    "Departure moved from {}s to {}s",
                    previous, depart_time_s
                )),
        );
        info!(
            "Departure of {} moved from {}s to {}s",
            train_id, previous, depart_time_s
        );
        Ok(())
    }

    /// Attaches a disruption record to an existing section
    pub fn add_disruption(&mut self, disruption: Disruption) -> Result<(), CommandError> {
        let key = self
            .network
            .resolve_section(&disruption.section_u, &disruption.section_v)
            .map(|(_, section)| section.key())
            .ok_or_else(|| {
                CommandError::UnknownSection(format!(
                    "{}-{}",
                    disruption.section_u, disruption.section_v
                ))
            })?;

        if !(disruption.start_time_s < disruption.end_time_s) {
            return Err(CommandError::InvalidDisruption(format!(
                "start {}s is not before end {}s",
                disruption.start_time_s, disruption.end_time_s
            )));
        }
        if !(0.0..=1.0).contains(&disruption.speed_factor) {
            return Err(CommandError::InvalidDisruption(format!(
                "speed factor {} outside 0..=1",
                disruption.speed_factor
            )));
        }

        self.network.add_disruption(&key, disruption);
        Ok(())
    }

    /// Advances one tick if running
    pub fn tick(&mut self) -> Result<TickReport> {
        if !self.is_running {
            return Ok(TickReport {
                time: self.clock.now(),
                events_applied: 0,
                status: self.status(),
            });
        }

        let new_time = self.clock.next_time();
        let events_applied = self.drain_until(new_time)?;
        self.clock.advance();

        if self.queue.is_empty() && !self.ended {
            self.finish_run();
        }

        Ok(TickReport {
            time: self.clock.now(),
            events_applied,
            status: self.status(),
        })
    }

    /// Starts the run and ticks until it ends or `max_ticks` have elapsed
    ///
    /// Returns the number of ticks taken.
    pub fn run_to_end(&mut self, max_ticks: u64) -> Result<u64> {
        self.start();
        let mut ticks = 0;
        while ticks < max_ticks && self.is_running {
            self.tick()?;
            ticks += 1;
        }
        Ok(ticks)
    }

    /// Applies every event scheduled at or before `limit`
    fn drain_until(&mut self, limit: f64) -> Result<usize> {
        let mut applied = 0;
        while let Some(next_time) = self.queue.peek_time() {
            if next_time > limit {
                break;
            }
            let event = self.queue.pop().context("Event queue empty after peek")?;
            self.process_event(event)?;
            applied += 1;
        }
        Ok(applied)
    }

    fn process_event(&mut self, event: ScheduledEvent) -> Result<()> {
        let Some(&index) = self.train_index.get(&event.train_id) else {
            self.discard_stale(&event, "unknown train");
            return Ok(());
        };
        if self.trains[index].is_finished() {
            self.discard_stale(&event, "train already finished");
            return Ok(());
        }

        debug!(
            "Processing {:?} for {} at {:.1}s",
            event.kind, event.train_id, event.time
        );

        let mut ctx = TransitionContext {
            network: &self.network,
            occupancy: &mut self.occupancy,
            queue: &mut self.queue,
            log: &mut self.events,
            config: &self.config,
        };
        let train = &mut self.trains[index];

        match event.kind.clone() {
            EventKind::Depart => train_manager::depart(&mut ctx, train, event.time),
            EventKind::EnterSection { u, v } => {
                train_manager::enter_section(&mut ctx, train, event, u, v)
            }
            EventKind::ArriveStation { u, v } => {
                train_manager::arrive_station(&mut ctx, train, event.time, u, v)
            }
        }
    }

    fn discard_stale(&mut self, event: &ScheduledEvent, why: &str) {
        warn!(
            "Discarding {:?} for {} at {:.1}s: {}",
            event.kind, event.train_id, event.time, why
        );
        self.events.push(
            SimEvent::system(event.time, EventLabel::StaleEvent, Some(why.to_string())),
        );
    }

    fn finish_run(&mut self) {
        self.ended = true;
        self.is_running = false;

        let unfinished = self.trains.iter().filter(|t| !t.is_finished()).count();
        let reason = if unfinished == 0 {
            "Event queue is empty.".to_string()
        } else {
            format!("Event queue is empty; {} trains cannot progress.", unfinished)
        };
        self.events.push(SimEvent::system(
            self.clock.now(),
            EventLabel::SimEnd,
            Some(reason),
        ));
        info!(
            "Simulation ended at {:.1}s ({} unfinished trains)",
            self.clock.now(),
            unfinished
        );
    }

    pub fn status(&self) -> EngineStatus {
        if self.ended {
            if self.trains.iter().all(Train::is_finished) {
                EngineStatus::Finished
            } else {
                EngineStatus::Stalled
            }
        } else if self.is_running {
            EngineStatus::Running
        } else if self.started {
            EngineStatus::Paused
        } else {
            EngineStatus::Ready
        }
    }

    /// Copies the current state for collaborators
    pub fn snapshot(&self) -> SimulationState {
        let occupied_sections = self
            .occupancy
            .occupied_sections()
            .map(|(key, train_id)| SectionOccupancy {
                section: key.clone(),
                train_id: train_id.clone(),
            })
            .collect();

        let occupied_platforms = self
            .network
            .stations()
            .flat_map(|station| {
                self.occupancy
                    .occupied_platforms(&station.code)
                    .into_iter()
                    .map(|(platform, train_id)| PlatformOccupancy {
                        station: station.code.clone(),
                        platform,
                        train_id,
                    })
            })
            .collect();

        SimulationState {
            time: self.clock.now(),
            trains: self.trains.clone(),
            events: self.events.clone(),
            is_running: self.is_running,
            speed: self.clock.speed(),
            selected_train: self.selected_train.clone(),
            status: self.status(),
            occupied_sections,
            occupied_platforms,
            positions: project_all(
                &self.trains,
                &self.network,
                self.clock.now(),
                self.config.buffer_factor,
            ),
        }
    }

    pub fn time(&self) -> f64 {
        self.clock.now()
    }

    pub fn speed(&self) -> u32 {
        self.clock.speed()
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn network(&self) -> &RailNetwork {
        &self.network
    }

    pub fn occupancy(&self) -> &OccupancyArbiter {
        &self.occupancy
    }

    pub fn trains(&self) -> &[Train] {
        &self.trains
    }

    pub fn train(&self, train_id: &TrainId) -> Option<&Train> {
        self.train_index.get(train_id).map(|&index| &self.trains[index])
    }

    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Occupant of the traversal key `key`, if any
    pub fn section_occupant(&self, key: &SectionKey) -> Option<&TrainId> {
        self.occupancy.occupant(key)
    }
}

/// Checks every train against the network before a reset commits
fn validate_trains(network: &RailNetwork, trains: &[TrainRecord]) -> Result<(), LoadError> {
    let mut seen = HashSet::new();
    for record in trains {
        let train = record.train_id.to_string();
        if !seen.insert(&record.train_id) {
            return Err(LoadError::DuplicateTrain(train));
        }
        if record.route.len() < 2 {
            return Err(LoadError::RouteTooShort {
                train,
                len: record.route.len(),
            });
        }
        if !(record.vmax_kmph.is_finite() && record.vmax_kmph > 0.0) {
            return Err(LoadError::InvalidTrainSpeed {
                train,
                vmax_kmph: record.vmax_kmph,
            });
        }
        if !(record.depart_time_s.is_finite() && record.depart_time_s >= 0.0) {
            return Err(LoadError::InvalidDepartureTime {
                train,
                depart_time_s: record.depart_time_s,
            });
        }
        if let Some(code) = record.route.iter().find(|code| !network.contains_station(code)) {
            return Err(LoadError::UnknownRouteStation {
                train,
                code: code.to_string(),
            });
        }
        if let Some(pair) = record
            .route
            .windows(2)
            .find(|pair| network.resolve_section(&pair[0], &pair[1]).is_none())
        {
            return Err(LoadError::MissingSection {
                train,
                from: pair[0].to_string(),
                to: pair[1].to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::section::LineType;
    use crate::simulation::types::StationCode;

    fn single_train_engine() -> SimEngine {
        let data = NetworkData::new(
            vec![Station::new("SBC", "SBC"), Station::new("YPR", "YPR")],
            vec![Section::new("SBC", "YPR", LineType::Single, 10.0)],
            vec![TrainRecord::new("T1", 50.0, &["SBC", "YPR"], 0.0)],
        );
        SimEngine::with_data(EngineConfig::default(), data).expect("valid data")
    }

    fn stale_records(engine: &SimEngine) -> Vec<&SimEvent> {
        engine
            .events()
            .iter()
            .filter(|e| e.event == EventLabel::StaleEvent)
            .collect()
    }

    #[test]
    fn test_event_for_unknown_train_is_discarded() {
        let mut engine = single_train_engine();
        engine
            .queue
            .schedule(0.0, EventKind::Depart, TrainId::new("GHOST"));

        engine.start();
        let report = engine.tick().expect("tick");
        assert_eq!(report.events_applied, 3);

        let stale = stale_records(&engine);
        assert_eq!(stale.len(), 1);
        assert_eq!(stale[0].reason.as_deref(), Some("unknown train"));
        assert!(engine.train(&TrainId::new("GHOST")).is_none());
        assert_eq!(engine.trains().len(), 1);
        assert_eq!(engine.trains()[0].status, TrainStatus::Running);
    }

    #[test]
    fn test_event_for_finished_train_is_discarded() {
        let mut engine = single_train_engine();
        engine.trains[0].status = TrainStatus::Finished;
        let before = engine.trains[0].clone();
        engine.queue.schedule(
            0.0,
            EventKind::ArriveStation {
                u: StationCode::new("SBC"),
                v: StationCode::new("YPR"),
            },
            TrainId::new("T1"),
        );

        engine.start();
        engine.tick().expect("tick");

        // Both the original departure and the arrival are dropped
        let stale = stale_records(&engine);
        assert_eq!(stale.len(), 2);
        assert!(stale
            .iter()
            .all(|e| e.reason.as_deref() == Some("train already finished")));
        assert_eq!(engine.trains[0], before);
        assert_eq!(engine.occupancy().occupied_sections().count(), 0);
        assert!(!engine
            .events()
            .iter()
            .any(|e| e.train_id == "T1" && !e.is_system()));
        assert_eq!(engine.status(), EngineStatus::Finished);
    }
}
