//! Plain-text summaries for advisory tools and the console
//!
//! Built from snapshots and read-only views only.

use super::analytics::NetworkStats;
use super::network::RailNetwork;
use super::state::SimulationState;
use super::types::{StationCode, TrainId};

/// Location, route and schedule of one train
pub fn train_summary(state: &SimulationState, train_id: &TrainId) -> Option<String> {
    let train = state.train(train_id)?;
    let location = state
        .position(train_id)
        .map(|position| position.position.label())
        .unwrap_or_else(|| train.location.label());
    let route = train
        .route()
        .iter()
        .map(StationCode::as_str)
        .collect::<Vec<_>>()
        .join(" -> ");

    let mut lines = vec![
        format!(
            "Train {} ({}, priority {})",
            train_id, train.record.category, train.record.priority
        ),
        format!("Status: {}", train.status),
        format!("Current location: {}", location),
        format!("Route: {}", route),
        format!(
            "Progress: station {} of {}",
            train.route_index + 1,
            train.route().len()
        ),
        format!("Scheduled departure: {}s", train.record.depart_time_s),
        format!("Maximum speed: {} km/h", train.record.vmax_kmph),
        format!("Accumulated delay: {}s", train.delay_s),
    ];
    if let Some(since) = train.held_since {
        lines.push(format!("Held since: {}s", since));
    }
    lines.push(format!("Simulation time: {:.1}s", state.time));
    Some(lines.join("\n"))
}

/// Disruption records on the link between `u` and `v`, in either stored direction
pub fn disruption_summary(network: &RailNetwork, u: &StationCode, v: &StationCode, now: f64) -> Option<String> {
    let (_, section) = network.resolve_section(u, v)?;

    let mut lines = vec![format!(
        "Section {}-{}: {:?} line, {} km, limit {} km/h",
        section.u, section.v, section.line_type, section.length_km, section.vmax_kmph
    )];
    if section.active_disruptions.is_empty() {
        lines.push("No disruptions recorded.".to_string());
    }
    lines.extend(section.active_disruptions.iter().map(|disruption| {
        format!(
            "- {}s to {}s at {:.0}% speed{}",
            disruption.start_time_s,
            disruption.end_time_s,
            disruption.speed_factor * 100.0,
            if disruption.is_active_at(now) { " (active now)" } else { "" }
        )
    }));
    Some(lines.join("\n"))
}

/// Console summary of the whole run
pub fn state_summary(state: &SimulationState, network: &RailNetwork) -> String {
    let stats = NetworkStats::from_state(state);

    let mut lines = vec![
        "=== Rail Simulation Summary ===".to_string(),
        format!(
            "Time: {:.1}s ({:?}, speed x{})",
            state.time, state.status, state.speed
        ),
        format!(
            "Stations: {}, Sections: {}",
            network.station_count(),
            network.section_count()
        ),
        format!(
            "Trains: {} total, {} waiting, {} running ({} held), {} finished",
            stats.total_trains, stats.waiting, stats.running, stats.held, stats.finished
        ),
        format!("Average delay: {:.1}s", stats.average_delay_s),
        format!("Throughput: {:.1} trains/hour", stats.throughput_per_hour),
    ];

    if !state.occupied_sections.is_empty() {
        lines.push("--- Occupied Sections ---".to_string());
        lines.extend(
            state
                .occupied_sections
                .iter()
                .map(|occupancy| format!("  {}: {}", occupancy.section, occupancy.train_id)),
        );
    }

    lines.push("--- Trains ---".to_string());
    lines.extend(
        state
            .positions
            .iter()
            .map(|position| format!("  {}: {}", position.train_id, position.position.label())),
    );
    lines.join("\n")
}
