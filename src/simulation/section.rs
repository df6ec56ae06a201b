//! Sections of track between two stations

use serde::{Deserialize, Serialize};

use super::types::{SectionKey, StationCode};

/// Physical layout of a link between two stations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineType {
    /// One track shared by both directions
    #[default]
    Single,
    /// One track per direction
    Double,
}

/// A time-windowed speed restriction attached to a section
///
/// Reported to collaborators only; traversal times ignore it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disruption {
    pub section_u: StationCode,
    pub section_v: StationCode,
    pub start_time_s: f64,
    pub end_time_s: f64,
    pub speed_factor: f64,
}

impl Disruption {
    pub fn is_active_at(&self, time: f64) -> bool {
        self.start_time_s <= time && time < self.end_time_s
    }
}

/// A directional section `u -> v`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub u: StationCode,
    pub v: StationCode,
    #[serde(default)]
    pub line_type: LineType,
    pub length_km: f64,
    /// Posted speed limit, informational
    #[serde(default)]
    pub vmax_kmph: f64,
    #[serde(default)]
    pub signalling: String,
    #[serde(default)]
    pub gradient: f64,
    #[serde(default)]
    pub active_disruptions: Vec<Disruption>,
}

impl Section {
    pub fn new(u: impl Into<String>, v: impl Into<String>, line_type: LineType, length_km: f64) -> Self {
        Self {
            u: StationCode::new(u),
            v: StationCode::new(v),
            line_type,
            length_km,
            vmax_kmph: 0.0,
            signalling: String::new(),
            gradient: 0.0,
            active_disruptions: Vec::new(),
        }
    }

    pub fn key(&self) -> SectionKey {
        SectionKey::new(self.u.clone(), self.v.clone())
    }

    pub fn is_single_line(&self) -> bool {
        self.line_type == LineType::Single
    }

    /// The same physical link seen from the other direction
    pub fn reversed(&self) -> Section {
        Section {
            u: self.v.clone(),
            v: self.u.clone(),
            active_disruptions: Vec::new(),
            ..self.clone()
        }
    }
}
