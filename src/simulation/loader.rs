//! Loading stations, sections and trains from JSON
//!
//! The loader owns line-type expansion: a double-line record becomes two
//! directional sections before the engine ever sees it.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use super::section::{LineType, Section};
use super::station::Station;
use super::train::TrainRecord;

pub const STATIONS_FILE: &str = "stations.json";
pub const SECTIONS_FILE: &str = "sections.json";
pub const TRAINS_FILE: &str = "trains.json";

/// The three data sets a run is loaded from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkData {
    pub stations: Vec<Station>,
    pub sections: Vec<Section>,
    pub trains: Vec<TrainRecord>,
}

impl NetworkData {
    /// Assembles data from raw records, expanding double-line sections
    pub fn new(stations: Vec<Station>, sections: Vec<Section>, trains: Vec<TrainRecord>) -> Self {
        Self {
            stations,
            sections: expand_sections(sections),
            trains,
        }
    }

    /// Parses the three data sets from JSON arrays
    pub fn from_json(stations: &str, sections: &str, trains: &str) -> Result<Self> {
        let stations: Vec<Station> = parse(stations, STATIONS_FILE)?;
        let sections: Vec<Section> = parse(sections, SECTIONS_FILE)?;
        let trains: Vec<TrainRecord> = parse(trains, TRAINS_FILE)?;
        Ok(Self::new(stations, sections, trains))
    }

    /// Reads `stations.json`, `sections.json` and `trains.json` from `dir`
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let read = |name: &str| {
            let path = dir.join(name);
            fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
        };

        Self::from_json(
            &read(STATIONS_FILE)?,
            &read(SECTIONS_FILE)?,
            &read(TRAINS_FILE)?,
        )
    }
}

fn parse<T: DeserializeOwned>(json: &str, what: &str) -> Result<Vec<T>> {
    serde_json::from_str(json).with_context(|| format!("Failed to parse {}", what))
}

/// Adds the reverse direction of every double-line section
///
/// A reverse entry the data already lists explicitly is kept as given and
/// not generated a second time.
pub fn expand_sections(sections: Vec<Section>) -> Vec<Section> {
    let explicit: BTreeSet<_> = sections.iter().map(Section::key).collect();

    let mut expanded = Vec::with_capacity(sections.len() * 2);
    for section in sections {
        let reverse = (section.line_type == LineType::Double
            && !explicit.contains(&section.key().reverse()))
        .then(|| section.reversed());

        expanded.push(section);
        expanded.extend(reverse);
    }
    expanded
}
