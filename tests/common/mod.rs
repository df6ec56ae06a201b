//! Shared builders for the integration tests
#![allow(dead_code)]

use rail_sim::simulation::{
    EngineConfig, LineType, NetworkData, Section, SimEngine, SimEvent, Station, StationCode,
    TrainId, TrainRecord,
};

pub const EPS: f64 = 1e-6;

pub fn station(code: &str) -> Station {
    Station::new(code, code)
}

pub fn section(u: &str, v: &str, line_type: LineType, length_km: f64) -> Section {
    Section::new(u, v, line_type, length_km)
}

pub fn train(id: &str, vmax_kmph: f64, route: &[&str], depart_time_s: f64) -> TrainRecord {
    TrainRecord::new(id, vmax_kmph, route, depart_time_s)
}

pub fn id(train_id: &str) -> TrainId {
    TrainId::new(train_id)
}

pub fn code(station: &str) -> StationCode {
    StationCode::new(station)
}

/// SBC - YPR - TK corridor; SBC-YPR is `first_line`, YPR-TK is single
pub fn corridor(first_line: LineType, trains: Vec<TrainRecord>) -> NetworkData {
    NetworkData::new(
        vec![
            station("SBC"),
            station("YPR").with_dwell(120.0),
            station("TK"),
        ],
        vec![
            section("SBC", "YPR", first_line, 10.0),
            section("YPR", "TK", LineType::Single, 20.0),
        ],
        trains,
    )
}

pub fn engine(data: NetworkData) -> SimEngine {
    SimEngine::with_data(EngineConfig::default(), data).expect("valid test data")
}

/// Runs until the engine stops on its own
pub fn run_to_end(engine: &mut SimEngine) {
    engine.run_to_end(1_000_000).expect("simulation error");
    assert!(engine.status().is_terminal(), "run did not end: {:?}", engine.status());
}

/// Log records for one train
pub fn train_events<'a>(events: &'a [SimEvent], train_id: &str) -> Vec<&'a SimEvent> {
    events.iter().filter(|e| e.train_id == train_id).collect()
}

/// Log records tied to trains, without the System bookkeeping
pub fn non_system(events: &[SimEvent]) -> Vec<SimEvent> {
    events.iter().filter(|e| !e.is_system()).cloned().collect()
}
