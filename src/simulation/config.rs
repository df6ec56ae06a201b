//! Engine tuning parameters

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::types::{
    BUFFER_FACTOR, DEFAULT_DWELL_S, MAX_SPEED, MIN_SPEED, RETRY_INTERVAL_S, TICK_INCREMENT_S,
};

/// Constants the engine runs with
///
/// Every field has a default, so a partial JSON object is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Simulated seconds per tick at speed 1
    pub tick_increment_s: f64,
    /// Delay applied to a blocked section entry before it is re-checked
    pub retry_interval_s: f64,
    /// Padding multiplied into every traversal time
    pub buffer_factor: f64,
    /// Dwell for stations without a usable mean dwell
    pub default_dwell_s: f64,
    pub min_speed: u32,
    pub max_speed: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_increment_s: TICK_INCREMENT_S,
            retry_interval_s: RETRY_INTERVAL_S,
            buffer_factor: BUFFER_FACTOR,
            default_dwell_s: DEFAULT_DWELL_S,
            min_speed: MIN_SPEED,
            max_speed: MAX_SPEED,
        }
    }
}

impl EngineConfig {
    /// Rejects values that would stall the stepper or make times meaningless
    ///
    /// A zero retry interval re-queues a blocked entry at the same instant
    /// forever, so every interval must be strictly positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("tick_increment_s", self.tick_increment_s),
            ("retry_interval_s", self.retry_interval_s),
            ("buffer_factor", self.buffer_factor),
            ("default_dwell_s", self.default_dwell_s),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if self.min_speed < 1 || self.min_speed > self.max_speed {
            return Err(ConfigError::SpeedBounds {
                min: self.min_speed,
                max: self.max_speed,
            });
        }
        Ok(())
    }
}
