//! Train state machine
//!
//! Transition handlers for the three event kinds. Each handler runs to
//! completion against the engine's parts and schedules the follow-on
//! events; none of them touches the clock.

use anyhow::{ensure, Context, Result};
use log::debug;

use super::config::EngineConfig;
use super::event_queue::{EventKind, EventQueue, ScheduledEvent};
use super::events::{EventLabel, SimEvent};
use super::network::RailNetwork;
use super::occupancy::{Admission, OccupancyArbiter};
use super::train::Train;
use super::types::{Location, SectionKey, StationCode, TrainStatus};

/// Mutable view of the engine handed to a transition
pub struct TransitionContext<'a> {
    pub network: &'a RailNetwork,
    pub occupancy: &'a mut OccupancyArbiter,
    pub queue: &'a mut EventQueue,
    pub log: &'a mut Vec<SimEvent>,
    pub config: &'a EngineConfig,
}

/// Starts the journey: WAITING -> RUNNING and request the first section
pub fn depart(ctx: &mut TransitionContext<'_>, train: &mut Train, now: f64) -> Result<()> {
    ensure!(
        train.status == TrainStatus::Waiting,
        "Train {} departed while {}",
        train.id(),
        train.status
    );

    train.status = TrainStatus::Running;
    train.route_index = 0;
    train.pending_depart = None;
    train.last_event_time = now;

    let (u, v) = train
        .next_hop()
        .with_context(|| format!("Train {} has no first hop", train.id()))?;
    train.location = Location::station(u.clone());

    ctx.log
        .push(SimEvent::train(now, train.id(), EventLabel::DepartJourney, u.as_str()));
    ctx.queue
        .schedule(now, EventKind::EnterSection { u, v }, train.id().clone());

    debug!("{} departed at {:.1}s", train.id(), now);
    Ok(())
}

/// Tries to move onto `u -> v`
///
/// If the arbiter refuses, the event is put back `retry_interval_s` later
/// and the train accrues that much delay.
pub fn enter_section(
    ctx: &mut TransitionContext<'_>,
    train: &mut Train,
    event: ScheduledEvent,
    u: StationCode,
    v: StationCode,
) -> Result<()> {
    let now = event.time;
    let network = ctx.network;
    let (key, section) = network
        .resolve_section(&u, &v)
        .with_context(|| format!("No section {}-{} for train {}", u, v, train.id()))?;

    match ctx
        .occupancy
        .try_enter(&key, section.is_single_line(), train.id())
    {
        Admission::Blocked {
            key: blocking_key,
            occupant,
        } => {
            let retry_at = now + ctx.config.retry_interval_s;
            train.delay_s += ctx.config.retry_interval_s;

            if train.held_since.is_none() {
                train.held_since = Some(now);
                ctx.log.push(
                    SimEvent::train(now, train.id(), EventLabel::Held, u.as_str()).with_reason(
                        format!(
                            "Section {} occupied by {}; retry in {}s",
                            blocking_key, occupant, ctx.config.retry_interval_s
                        ),
                    ),
                );
            }

            debug!(
                "{} blocked on {} by {} at {:.1}s, retry at {:.1}s",
                train.id(),
                key,
                occupant,
                now,
                retry_at
            );
            ctx.queue.defer(event, retry_at);
        }
        Admission::Granted => {
            ctx.occupancy.release_platform(&u, train.id());

            let travel_time = train.travel_time(section, ctx.config.buffer_factor);
            train.held_since = None;
            train.last_event_time = now;
            train.location = Location::Section {
                u: u.clone(),
                v: v.clone(),
                progress: 0.0,
            };

            ctx.log.push(SimEvent::train(
                now,
                train.id(),
                EventLabel::EnterSection,
                key.to_string(),
            ));
            ctx.queue.schedule(
                now + travel_time,
                EventKind::ArriveStation { u, v },
                train.id().clone(),
            );

            debug!(
                "{} entered {} at {:.1}s, arriving in {:.1}s",
                train.id(),
                key,
                now,
                travel_time
            );
        }
    }

    Ok(())
}

/// Completes `u -> v`: release the section and halt or finish at `v`
pub fn arrive_station(
    ctx: &mut TransitionContext<'_>,
    train: &mut Train,
    now: f64,
    u: StationCode,
    v: StationCode,
) -> Result<()> {
    let hop = train.next_hop();
    ensure!(
        hop.as_ref() == Some(&(u.clone(), v.clone())),
        "Train {} arrived over {}-{} but its next hop is {:?}",
        train.id(),
        u,
        v,
        hop
    );

    let key = SectionKey::new(u, v.clone());
    ensure!(
        ctx.occupancy.release(&key, train.id()),
        "Train {} arrived over {} without holding it",
        train.id(),
        key
    );

    train.route_index += 1;
    train.location = Location::station(v.clone());
    train.last_event_time = now;

    if train.at_last_route_index() {
        train.status = TrainStatus::Finished;
        ctx.log
            .push(SimEvent::train(now, train.id(), EventLabel::ArriveFinal, v.as_str()));
        debug!("{} finished at {} at {:.1}s", train.id(), v, now);
        return Ok(());
    }

    let network = ctx.network;
    let station = network
        .station(&v)
        .with_context(|| format!("Station {} not found", v))?;
    let dwell = station.dwell_time(ctx.config.default_dwell_s);
    ctx.occupancy.claim_platform(station, train.id());

    let (next_u, next_v) = train
        .next_hop()
        .with_context(|| format!("Train {} has no hop after {}", train.id(), v))?;

    ctx.log
        .push(SimEvent::train(now, train.id(), EventLabel::ArriveStation, v.as_str()));
    ctx.log.push(
        SimEvent::train(now, train.id(), EventLabel::DepartStation, next_u.as_str())
            .with_reason(format!("Dwell for {}s", dwell)),
    );
    ctx.queue.schedule(
        now + dwell,
        EventKind::EnterSection {
            u: next_u,
            v: next_v,
        },
        train.id().clone(),
    );

    Ok(())
}
