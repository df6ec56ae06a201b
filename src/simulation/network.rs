//! Rail network graph
//!
//! Stations are nodes and directional sections are edges of a petgraph
//! directed graph. The network is static for the duration of a run; the
//! only mutable data it carries are disruption records.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{BTreeMap, HashMap};

use super::error::LoadError;
use super::section::{Disruption, Section};
use super::station::Station;
use super::types::{SectionKey, StationCode};

/// Static rail network: stations, directional sections and their adjacency
#[derive(Debug, Clone, Default)]
pub struct RailNetwork {
    /// Directed graph, one edge per directional section entry
    graph: DiGraph<StationCode, SectionKey>,

    /// Maps station codes to their node indices in the graph
    station_to_node: HashMap<StationCode, NodeIndex>,

    stations: BTreeMap<StationCode, Station>,

    sections: BTreeMap<SectionKey, Section>,
}

impl RailNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a network, rejecting duplicates and dangling section endpoints
    pub fn from_parts(stations: Vec<Station>, sections: Vec<Section>) -> Result<Self, LoadError> {
        let mut network = Self::new();
        for station in stations {
            network.add_station(station)?;
        }
        for section in sections {
            network.add_section(section)?;
        }
        Ok(network)
    }

    pub fn add_station(&mut self, station: Station) -> Result<(), LoadError> {
        if self.station_to_node.contains_key(&station.code) {
            return Err(LoadError::DuplicateStation(station.code.to_string()));
        }
        if let Some(dwell_mean_s) = station.dwell_mean_s.filter(|dwell| !(*dwell >= 0.0)) {
            return Err(LoadError::InvalidDwell {
                station: station.code.to_string(),
                dwell_mean_s,
            });
        }

        let node_index = self.graph.add_node(station.code.clone());
        self.station_to_node.insert(station.code.clone(), node_index);
        self.stations.insert(station.code.clone(), station);
        Ok(())
    }

    pub fn add_section(&mut self, section: Section) -> Result<(), LoadError> {
        let key = section.key();

        let start_node = *self
            .station_to_node
            .get(&section.u)
            .ok_or_else(|| LoadError::UnknownSectionEndpoint {
                section: key.to_string(),
                code: section.u.to_string(),
            })?;
        let end_node = *self
            .station_to_node
            .get(&section.v)
            .ok_or_else(|| LoadError::UnknownSectionEndpoint {
                section: key.to_string(),
                code: section.v.to_string(),
            })?;

        if self.sections.contains_key(&key) {
            return Err(LoadError::DuplicateSection(key.to_string()));
        }
        if !(section.length_km.is_finite() && section.length_km >= 0.0) {
            return Err(LoadError::InvalidSectionLength {
                section: key.to_string(),
                length_km: section.length_km,
            });
        }

        self.graph.add_edge(start_node, end_node, key.clone());
        self.sections.insert(key, section);
        Ok(())
    }

    pub fn station(&self, code: &StationCode) -> Option<&Station> {
        self.stations.get(code)
    }

    pub fn contains_station(&self, code: &StationCode) -> bool {
        self.stations.contains_key(code)
    }

    /// Gets a section by its stored directional key
    pub fn section(&self, key: &SectionKey) -> Option<&Section> {
        self.sections.get(key)
    }

    /// Finds the section a train uses to travel `from -> to`
    ///
    /// A stored `from -> to` entry always wins. Otherwise a single-line
    /// section stored as `to -> from` is the same physical track and is
    /// returned. The key returned is the traversal key, which is the key
    /// occupancy is recorded under.
    pub fn resolve_section(&self, from: &StationCode, to: &StationCode) -> Option<(SectionKey, &Section)> {
        let from_node = self.station_to_node.get(from)?;
        let to_node = self.station_to_node.get(to)?;

        let direct = self
            .graph
            .edges(*from_node)
            .find(|edge| edge.target() == *to_node)
            .and_then(|edge| self.sections.get(edge.weight()));
        if let Some(section) = direct {
            return Some((section.key(), section));
        }

        self.graph
            .edges(*to_node)
            .find(|edge| edge.target() == *from_node)
            .and_then(|edge| self.sections.get(edge.weight()))
            .filter(|section| section.is_single_line())
            .map(|section| (SectionKey::new(from.clone(), to.clone()), section))
    }

    /// Whether traversal under `key` must also exclude the reverse direction
    pub fn is_single_line(&self, key: &SectionKey) -> bool {
        self.resolve_section(&key.from, &key.to)
            .map(|(_, section)| section.is_single_line())
            .unwrap_or(false)
    }

    /// Attaches a disruption record to the stored section `key`
    pub fn add_disruption(&mut self, key: &SectionKey, disruption: Disruption) -> bool {
        match self.sections.get_mut(key) {
            Some(section) => {
                section.active_disruptions.push(disruption);
                true
            }
            None => false,
        }
    }

    pub fn stations(&self) -> impl Iterator<Item = &Station> {
        self.stations.values()
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }
}
