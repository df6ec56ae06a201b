//! Stations of the rail network
//!
//! Static station data as loaded from the stations data set. Platform
//! occupancy is not stored here; it is owned by the occupancy arbiter.

use serde::{Deserialize, Serialize};

use super::types::StationCode;

/// A station in the rail network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub code: StationCode,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub has_loop: bool,
    #[serde(default)]
    pub num_loops: u32,
    #[serde(default = "default_platforms")]
    pub num_platforms: u32,
    #[serde(default)]
    pub max_train_len_m: f64,
    #[serde(default)]
    pub is_junction: bool,
    /// Mean dwell in seconds; `None` or zero falls back to the default
    ///
    /// Negative values are rejected when the network is built.
    #[serde(default)]
    pub dwell_mean_s: Option<f64>,
    /// Reserved. Dwell is always the mean; this value is carried but unused.
    #[serde(default)]
    pub dwell_std_dev_s: f64,
}

fn default_platforms() -> u32 {
    1
}

impl Station {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: StationCode::new(code),
            name: name.into(),
            has_loop: false,
            num_loops: 0,
            num_platforms: default_platforms(),
            max_train_len_m: 0.0,
            is_junction: false,
            dwell_mean_s: None,
            dwell_std_dev_s: 0.0,
        }
    }

    pub fn with_dwell(mut self, dwell_mean_s: f64) -> Self {
        self.dwell_mean_s = Some(dwell_mean_s);
        self
    }

    pub fn with_platforms(mut self, num_platforms: u32) -> Self {
        self.num_platforms = num_platforms;
        self
    }

    /// Dwell applied to a train halting here
    pub fn dwell_time(&self, default_dwell_s: f64) -> f64 {
        match self.dwell_mean_s {
            Some(dwell) if dwell > 0.0 => dwell,
            _ => default_dwell_s,
        }
    }
}
