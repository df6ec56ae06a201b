//! Time-ordered event queue
//!
//! Events are ordered by scheduled time, then by insertion sequence, so
//! two events at the same time are always served first-scheduled-first.

use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::types::{StationCode, TrainId};

/// Handle of a scheduled event; also its insertion sequence number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(pub u64);

/// What a scheduled event does when it fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// Start the journey from the first route station
    Depart,
    /// Request entry onto the section `u -> v`
    EnterSection { u: StationCode, v: StationCode },
    /// Finish traversing `u -> v` and halt at `v`
    ArriveStation { u: StationCode, v: StationCode },
}

/// An event waiting in the queue
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledEvent {
    pub id: EventId,
    pub time: f64,
    pub kind: EventKind,
    pub train_id: TrainId,
}

impl ScheduledEvent {
    fn sort_key(&self) -> (OrderedFloat<f64>, EventId) {
        (OrderedFloat(self.time), self.id)
    }
}

impl Eq for ScheduledEvent {}

impl Ord for ScheduledEvent {
    // Reversed so the max-heap yields the earliest (time, seq) first
    fn cmp(&self, other: &Self) -> Ordering {
        other.sort_key().cmp(&self.sort_key())
    }
}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority queue of scheduled events with deterministic tie-breaking
#[derive(Debug, Default)]
pub struct EventQueue {
    next_seq: u64,
    queue: BinaryHeap<ScheduledEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules an event and returns its handle
    pub fn schedule(&mut self, time: f64, kind: EventKind, train_id: TrainId) -> EventId {
        let id = EventId(self.next_seq);
        self.next_seq += 1;
        self.queue.push(ScheduledEvent {
            id,
            time,
            kind,
            train_id,
        });
        id
    }

    /// Puts a popped event back at `time` behind everything already queued for that time
    pub fn defer(&mut self, event: ScheduledEvent, time: f64) -> EventId {
        self.schedule(time, event.kind, event.train_id)
    }

    pub fn peek(&self) -> Option<&ScheduledEvent> {
        self.queue.peek()
    }

    pub fn peek_time(&self) -> Option<f64> {
        self.queue.peek().map(|event| event.time)
    }

    pub fn pop(&mut self) -> Option<ScheduledEvent> {
        self.queue.pop()
    }

    /// Removes a pending event; returns false if it already fired or never existed
    pub fn cancel(&mut self, id: EventId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|event| event.id != id);
        self.queue.len() != before
    }

    pub fn contains(&self, id: EventId) -> bool {
        self.queue.iter().any(|event| event.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Drops every pending event and restarts the sequence
    pub fn clear(&mut self) {
        self.queue.clear();
        self.next_seq = 0;
    }
}
