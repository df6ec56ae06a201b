//! Occupancy arbiter
//!
//! Sole owner of section and platform occupancy. Every section entry goes
//! through [`OccupancyArbiter::try_enter`], which checks and marks in one
//! step so no other entry can slip in between.

use log::warn;
use std::collections::BTreeMap;

use super::station::Station;
use super::types::{SectionKey, StationCode, TrainId};

/// Outcome of a section entry request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// The section is now held by the requesting train
    Granted,
    /// Another train holds `key` (the requested key or its single-line reverse)
    Blocked { key: SectionKey, occupant: TrainId },
}

/// Mutual-exclusion bookkeeping for sections and station platforms
#[derive(Debug, Clone, Default)]
pub struct OccupancyArbiter {
    /// Traversal key -> train currently on it
    sections: BTreeMap<SectionKey, TrainId>,
    /// Station -> platform number -> train dwelling there
    platforms: BTreeMap<StationCode, BTreeMap<u32, TrainId>>,
}

impl OccupancyArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every claim
    pub fn clear(&mut self) {
        self.sections.clear();
        self.platforms.clear();
    }

    pub fn occupant(&self, key: &SectionKey) -> Option<&TrainId> {
        self.sections.get(key)
    }

    /// Requests exclusive use of `key` for `train_id`
    ///
    /// On a single-line link the reverse key must be free as well.
    pub fn try_enter(&mut self, key: &SectionKey, single_line: bool, train_id: &TrainId) -> Admission {
        if let Some(occupant) = self.sections.get(key) {
            return Admission::Blocked {
                key: key.clone(),
                occupant: occupant.clone(),
            };
        }

        if single_line {
            let reverse = key.reverse();
            if let Some(occupant) = self.sections.get(&reverse) {
                return Admission::Blocked {
                    key: reverse,
                    occupant: occupant.clone(),
                };
            }
        }

        self.sections.insert(key.clone(), train_id.clone());
        Admission::Granted
    }

    /// Releases `key` if it is held by `train_id`
    pub fn release(&mut self, key: &SectionKey, train_id: &TrainId) -> bool {
        match self.sections.get(key) {
            Some(current) if current == train_id => {
                self.sections.remove(key);
                true
            }
            _ => false,
        }
    }

    /// Assigns the lowest free platform at `station` to `train_id`
    ///
    /// Platforms never gate movement; when all are taken the train dwells
    /// without one and `None` is returned.
    pub fn claim_platform(&mut self, station: &Station, train_id: &TrainId) -> Option<u32> {
        let taken = self.platforms.entry(station.code.clone()).or_default();
        let free = (1..=station.num_platforms).find(|number| !taken.contains_key(number));
        match free {
            Some(number) => {
                taken.insert(number, train_id.clone());
                Some(number)
            }
            None => {
                warn!(
                    "All {} platforms at {} are occupied; {} dwells without a platform",
                    station.num_platforms, station.code, train_id
                );
                None
            }
        }
    }

    /// Frees whichever platform `train_id` holds at `code`
    pub fn release_platform(&mut self, code: &StationCode, train_id: &TrainId) {
        if let Some(taken) = self.platforms.get_mut(code) {
            taken.retain(|_, occupant| occupant != train_id);
            if taken.is_empty() {
                self.platforms.remove(code);
            }
        }
    }

    pub fn occupied_sections(&self) -> impl Iterator<Item = (&SectionKey, &TrainId)> {
        self.sections.iter()
    }

    /// Platforms in use at `code`, as `(platform, train)`
    pub fn occupied_platforms(&self, code: &StationCode) -> Vec<(u32, TrainId)> {
        self.platforms
            .get(code)
            .map(|taken| taken.iter().map(|(n, t)| (*n, t.clone())).collect())
            .unwrap_or_default()
    }
}
