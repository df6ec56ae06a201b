//! Error types for configuration, loading data and issuing commands

use thiserror::Error;

/// Engine constants that would stall or corrupt a run
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be a positive finite number, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("Speed bounds {min}..={max} are invalid; need 1 <= min <= max")]
    SpeedBounds { min: u32, max: u32 },
}

/// Malformed or inconsistent station, section or train data
///
/// A failed load leaves the engine in its previous state.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LoadError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Duplicate station code: {0}")]
    DuplicateStation(String),

    #[error("Duplicate section: {0}")]
    DuplicateSection(String),

    #[error("Duplicate train id: {0}")]
    DuplicateTrain(String),

    #[error("Section {section} references unknown station {code}")]
    UnknownSectionEndpoint { section: String, code: String },

    #[error("Station {station} has negative mean dwell {dwell_mean_s}s")]
    InvalidDwell { station: String, dwell_mean_s: f64 },

    #[error("Section {section} has invalid length {length_km} km")]
    InvalidSectionLength { section: String, length_km: f64 },

    #[error("Train {train} route must list at least two stations, got {len}")]
    RouteTooShort { train: String, len: usize },

    #[error("Train {train} route references unknown station {code}")]
    UnknownRouteStation { train: String, code: String },

    #[error("Train {train} route has no section from {from} to {to}")]
    MissingSection { train: String, from: String, to: String },

    #[error("Train {train} has invalid maximum speed {vmax_kmph} km/h")]
    InvalidTrainSpeed { train: String, vmax_kmph: f64 },

    #[error("Train {train} has invalid departure time {depart_time_s}")]
    InvalidDepartureTime { train: String, depart_time_s: f64 },
}

/// A rejected external command
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CommandError {
    #[error("Unknown train: {0}")]
    UnknownTrain(String),

    #[error("Train {0} has already departed")]
    DepartureAlreadyTaken(String),

    #[error("Departure time {requested} is before the current simulation time {now}")]
    DepartureInPast { requested: f64, now: f64 },

    #[error("Speed multiplier {requested} outside of {min}..={max}")]
    InvalidSpeed { requested: u32, min: u32, max: u32 },

    #[error("Unknown section: {0}")]
    UnknownSection(String),

    #[error("Invalid disruption: {0}")]
    InvalidDisruption(String),
}
