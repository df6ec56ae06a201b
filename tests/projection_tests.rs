mod common;

use common::*;
use rail_sim::simulation::{project, LineType, Location, BUFFER_FACTOR};

fn progress_of(location: &Location) -> f64 {
    match location {
        Location::Section { progress, .. } => *progress,
        other => panic!("expected a section location, got {other:?}"),
    }
}

#[test]
fn test_progress_is_linear_in_time() {
    let mut engine = engine(corridor(
        LineType::Single,
        vec![train("T1", 50.0, &["SBC", "YPR"], 0.0)],
    ));
    engine.set_speed(8).expect("speed");
    engine.start();
    for _ in 0..54 {
        engine.tick().expect("tick");
    }
    assert_eq!(engine.time(), 432.0);

    let state = engine.snapshot();
    let position = state.position(&id("T1")).expect("position");
    assert!((progress_of(&position.position) - 0.5).abs() < EPS);

    // The authoritative location still says progress 0
    let train = state.train(&id("T1")).expect("train");
    assert_eq!(progress_of(&train.location), 0.0);
}

#[test]
fn test_progress_is_clamped() {
    let mut engine = engine(corridor(
        LineType::Single,
        vec![train("T1", 50.0, &["SBC", "YPR"], 0.0)],
    ));
    engine.start();
    engine.tick().expect("tick");

    let train = engine.train(&id("T1")).expect("train");
    let late = project(train, engine.network(), 5000.0, BUFFER_FACTOR);
    let early = project(train, engine.network(), -10.0, BUFFER_FACTOR);
    assert_eq!(progress_of(&late), 1.0);
    assert_eq!(progress_of(&early), 0.0);
}

#[test]
fn test_station_locations_project_unchanged() {
    let mut engine = engine(corridor(
        LineType::Single,
        vec![
            train("T1", 50.0, &["SBC", "YPR"], 0.0),
            train("T2", 50.0, &["SBC", "YPR"], 0.0),
            train("T3", 50.0, &["YPR", "TK"], 100.0),
        ],
    ));
    engine.start();
    for _ in 0..20 {
        engine.tick().expect("tick");
    }

    let state = engine.snapshot();
    // Held at its origin
    assert_eq!(
        state.position(&id("T2")).expect("position").position,
        Location::station(code("SBC"))
    );
    // Not yet departed
    assert_eq!(
        state.position(&id("T3")).expect("position").position,
        Location::station(code("YPR"))
    );
    assert_eq!(state.positions.len(), 3);
}

#[test]
fn test_reverse_single_line_projection() {
    let mut engine = engine(corridor(
        LineType::Single,
        vec![train("T1", 100.0, &["TK", "YPR"], 0.0)],
    ));
    engine.set_speed(10).expect("speed");
    engine.start();
    // 20 km at 100 km/h padded: 864 s
    for _ in 0..43 {
        engine.tick().expect("tick");
    }

    let state = engine.snapshot();
    match &state.position(&id("T1")).expect("position").position {
        Location::Section { u, v, progress } => {
            assert_eq!(u, &code("TK"));
            assert_eq!(v, &code("YPR"));
            assert!((progress - 430.0 / 864.0).abs() < EPS);
        }
        other => panic!("expected a section location, got {other:?}"),
    }
}
