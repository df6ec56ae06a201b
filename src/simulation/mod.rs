//! Discrete-event rail network simulation
//!
//! Trains move station to station over directional sections. A single
//! clock, advanced only by the stepper, drains a time-ordered event queue;
//! the occupancy arbiter keeps at most one train on each section (and on
//! both directions of a single-line link).

mod analytics;
mod clock;
mod config;
mod engine;
mod error;
mod event_queue;
mod events;
mod loader;
mod network;
mod occupancy;
mod projection;
mod section;
mod state;
mod station;
mod summary;
mod train;
mod train_manager;
mod types;

pub use analytics::NetworkStats;
pub use clock::Clock;
pub use config::EngineConfig;
pub use engine::{SimEngine, TickReport};
pub use error::{CommandError, ConfigError, LoadError};
pub use event_queue::{EventId, EventKind, EventQueue, ScheduledEvent};
pub use events::{EventLabel, SimEvent, NO_LOCATION, SYSTEM_ID};
pub use loader::{expand_sections, NetworkData, SECTIONS_FILE, STATIONS_FILE, TRAINS_FILE};
pub use network::RailNetwork;
pub use occupancy::{Admission, OccupancyArbiter};
pub use projection::{project, project_all, TrainPosition};
pub use section::{Disruption, LineType, Section};
pub use state::{EngineStatus, PlatformOccupancy, SectionOccupancy, SimulationState};
pub use station::Station;
pub use summary::{disruption_summary, state_summary, train_summary};
pub use train::{Train, TrainRecord};
pub use types::{
    Location, SectionKey, StationCode, TrainId, TrainStatus, BUFFER_FACTOR, DEFAULT_DWELL_S,
    MAX_SPEED, MIN_SPEED, RETRY_INTERVAL_S, TICK_INCREMENT_S,
};
