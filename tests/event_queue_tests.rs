//! Ordering and cancellation behaviour of the event queue

use rail_sim::simulation::{EventKind, EventQueue, StationCode, TrainId};

fn enter(u: &str, v: &str) -> EventKind {
    EventKind::EnterSection {
        u: StationCode::new(u),
        v: StationCode::new(v),
    }
}

#[test]
fn test_pops_in_time_order() {
    let mut queue = EventQueue::new();
    queue.schedule(30.0, EventKind::Depart, TrainId::new("C"));
    queue.schedule(10.0, EventKind::Depart, TrainId::new("A"));
    queue.schedule(20.0, EventKind::Depart, TrainId::new("B"));

    let order: Vec<_> = std::iter::from_fn(|| queue.pop())
        .map(|event| event.train_id.to_string())
        .collect();
    assert_eq!(order, vec!["A", "B", "C"]);
    assert!(queue.is_empty());
}

#[test]
fn test_equal_times_keep_insertion_order() {
    let mut queue = EventQueue::new();
    for name in ["first", "second", "third", "fourth"] {
        queue.schedule(5.0, EventKind::Depart, TrainId::new(name));
    }

    let order: Vec<_> = std::iter::from_fn(|| queue.pop())
        .map(|event| event.train_id.to_string())
        .collect();
    assert_eq!(order, vec!["first", "second", "third", "fourth"]);
}

#[test]
fn test_deferred_event_goes_behind_existing_ties() {
    let mut queue = EventQueue::new();
    queue.schedule(0.0, enter("SBC", "YPR"), TrainId::new("T1"));
    queue.schedule(10.0, enter("SBC", "YPR"), TrainId::new("T2"));

    let blocked = queue.pop().expect("event");
    assert_eq!(blocked.train_id, TrainId::new("T1"));
    let deferred_id = queue.defer(blocked, 10.0);

    let next = queue.pop().expect("event");
    assert_eq!(next.train_id, TrainId::new("T2"));
    let retried = queue.pop().expect("event");
    assert_eq!(retried.id, deferred_id);
    assert_eq!(retried.time, 10.0);
    assert_eq!(retried.kind, enter("SBC", "YPR"));
}

#[test]
fn test_peek_does_not_consume() {
    let mut queue = EventQueue::new();
    assert!(queue.peek().is_none());
    assert!(queue.pop().is_none());

    queue.schedule(42.0, EventKind::Depart, TrainId::new("A"));
    assert_eq!(queue.peek_time(), Some(42.0));
    assert_eq!(queue.peek().map(|e| e.train_id.clone()), Some(TrainId::new("A")));
    assert_eq!(queue.len(), 1);
}

#[test]
fn test_cancel_removes_only_that_event() {
    let mut queue = EventQueue::new();
    let a = queue.schedule(1.0, EventKind::Depart, TrainId::new("A"));
    let b = queue.schedule(2.0, EventKind::Depart, TrainId::new("B"));

    assert!(queue.cancel(a));
    assert!(!queue.cancel(a));
    assert!(!queue.contains(a));
    assert!(queue.contains(b));
    assert_eq!(queue.pop().map(|e| e.id), Some(b));
}

#[test]
fn test_clear_restarts_sequence() {
    let mut queue = EventQueue::new();
    queue.schedule(1.0, EventKind::Depart, TrainId::new("A"));
    queue.schedule(2.0, EventKind::Depart, TrainId::new("B"));
    queue.clear();

    assert!(queue.is_empty());
    let first = queue.schedule(3.0, EventKind::Depart, TrainId::new("C"));
    assert_eq!(first.0, 0);
}
