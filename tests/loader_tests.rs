mod common;

use common::*;
use rail_sim::simulation::{
    expand_sections, ConfigError, EngineConfig, LineType, LoadError, NetworkData, RailNetwork,
    SectionKey, SimEngine, TrainStatus,
};
use std::path::Path;

#[test]
fn test_double_line_expands_to_both_directions() {
    let expanded = expand_sections(vec![
        section("A", "B", LineType::Double, 2.0),
        section("B", "C", LineType::Single, 3.0),
    ]);

    let keys: Vec<String> = expanded.iter().map(|s| s.key().to_string()).collect();
    assert_eq!(keys, vec!["A-B", "B-A", "B-C"]);
    assert_eq!(expanded[1].length_km, 2.0);
    assert_eq!(expanded[1].line_type, LineType::Double);
}

#[test]
fn test_explicit_reverse_is_not_duplicated() {
    let mut explicit_reverse = section("B", "A", LineType::Double, 2.5);
    explicit_reverse.vmax_kmph = 40.0;

    let expanded = expand_sections(vec![
        section("A", "B", LineType::Double, 2.0),
        explicit_reverse.clone(),
    ]);

    assert_eq!(expanded.len(), 2);
    assert_eq!(expanded[1], explicit_reverse);
}

#[test]
fn test_parse_json_with_defaults() {
    let stations = r#"[
        { "code": "A", "name": "Alpha", "dwell_mean_s": 45 },
        { "code": "B" }
    ]"#;
    let sections = r#"[ { "u": "A", "v": "B", "line_type": "double", "length_km": 1.5 } ]"#;
    let trains = r#"[
        { "train_id": "T1", "vmax_kmph": 90, "route": ["A", "B"], "depart_time_s": 12 }
    ]"#;

    let data = NetworkData::from_json(stations, sections, trains).expect("valid json");

    assert_eq!(data.stations.len(), 2);
    assert_eq!(data.stations[0].dwell_mean_s, Some(45.0));
    assert_eq!(data.stations[1].num_platforms, 1);
    assert_eq!(data.stations[1].dwell_mean_s, None);
    assert_eq!(data.sections.len(), 2);
    assert_eq!(data.trains[0].train_id, id("T1"));
    assert_eq!(data.trains[0].priority, 0);
    assert_eq!(data.trains[0].route, vec![code("A"), code("B")]);
}

#[test]
fn test_parse_error_names_the_data_set() {
    let err = NetworkData::from_json("[]", "not json", "[]").unwrap_err();
    assert!(format!("{err:#}").contains("sections.json"));
}

#[test]
fn test_missing_directory_is_an_error() {
    let err = NetworkData::load_dir(Path::new("/definitely/not/here")).unwrap_err();
    assert!(format!("{err:#}").contains("stations.json"));
}

#[test]
fn test_bundled_data_loads_and_runs() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
    let data = NetworkData::load_dir(&dir).expect("bundled data");
    assert_eq!(data.stations.len(), 7);
    assert_eq!(data.sections.len(), 9);
    assert_eq!(data.trains.len(), 8);

    let mut engine = SimEngine::with_data(EngineConfig::default(), data).expect("valid data");
    engine.set_speed(100).expect("speed");
    run_to_end(&mut engine);
    assert!(engine
        .trains()
        .iter()
        .all(|train| train.status == TrainStatus::Finished));
}

#[test]
fn test_network_resolves_single_line_in_both_directions() {
    let data = corridor(LineType::Single, vec![]);
    let network = RailNetwork::from_parts(data.stations, data.sections).expect("network");

    let (key, section) = network
        .resolve_section(&code("TK"), &code("YPR"))
        .expect("reverse traversal");
    assert_eq!(key, SectionKey::new(code("TK"), code("YPR")));
    assert_eq!(section.key(), SectionKey::new(code("YPR"), code("TK")));
    assert!(network.is_single_line(&key));
    assert!(network.resolve_section(&code("SBC"), &code("TK")).is_none());
}

#[test]
fn test_network_keeps_double_line_directions_apart() {
    let data = corridor(LineType::Double, vec![]);
    let network = RailNetwork::from_parts(data.stations, data.sections).expect("network");

    assert_eq!(network.section_count(), 3);
    let (key, section) = network
        .resolve_section(&code("YPR"), &code("SBC"))
        .expect("generated reverse");
    assert_eq!(key, section.key());
    assert!(!network.is_single_line(&key));
}

#[test]
fn test_network_rejects_bad_sections() {
    let mut network = RailNetwork::new();
    network.add_station(station("A")).expect("station");
    network.add_station(station("B")).expect("station");

    assert_eq!(
        network.add_station(station("A")),
        Err(LoadError::DuplicateStation("A".to_string()))
    );
    network
        .add_section(section("A", "B", LineType::Single, 1.0))
        .expect("section");
    assert_eq!(
        network.add_section(section("A", "B", LineType::Single, 2.0)),
        Err(LoadError::DuplicateSection("A-B".to_string()))
    );
    assert!(matches!(
        network.add_section(section("B", "A", LineType::Single, -1.0)),
        Err(LoadError::InvalidSectionLength { .. })
    ));
    assert!(matches!(
        network.add_section(section("A", "Z", LineType::Single, 1.0)),
        Err(LoadError::UnknownSectionEndpoint { code, .. }) if code == "Z"
    ));
}

#[test]
fn test_negative_departure_is_rejected() {
    let mut engine = SimEngine::default();
    let data = corridor(LineType::Single, vec![train("T1", 50.0, &["SBC", "YPR"], -5.0)]);
    assert!(matches!(
        engine.load(data),
        Err(LoadError::InvalidDepartureTime { .. })
    ));
}

#[test]
fn test_partial_config_keeps_defaults() {
    let config: EngineConfig =
        serde_json::from_str(r#"{ "retry_interval_s": 5.0 }"#).expect("config");
    assert_eq!(config.retry_interval_s, 5.0);
    assert_eq!(config.buffer_factor, 1.2);
    assert_eq!(config.max_speed, 100);
    assert_eq!(config, EngineConfig { retry_interval_s: 5.0, ..EngineConfig::default() });
}

#[test]
fn test_zero_retry_interval_is_rejected() {
    let config: EngineConfig =
        serde_json::from_str(r#"{ "retry_interval_s": 0 }"#).expect("config");
    let expected = ConfigError::NotPositive {
        field: "retry_interval_s",
        value: 0.0,
    };
    assert_eq!(config.validate(), Err(expected.clone()));
    assert!(SimEngine::new(config.clone()).is_err());

    let data = corridor(
        LineType::Single,
        vec![
            train("T1", 50.0, &["SBC", "YPR"], 0.0),
            train("T2", 50.0, &["SBC", "YPR"], 0.0),
        ],
    );
    assert_eq!(
        SimEngine::with_data(config, data).err(),
        Some(LoadError::Config(expected))
    );
}

#[test]
fn test_config_bounds() {
    let base = EngineConfig::default();
    assert_eq!(base.validate(), Ok(()));

    let bad = [
        EngineConfig { tick_increment_s: -1.0, ..base.clone() },
        EngineConfig { tick_increment_s: f64::NAN, ..base.clone() },
        EngineConfig { buffer_factor: 0.0, ..base.clone() },
        EngineConfig { retry_interval_s: f64::INFINITY, ..base.clone() },
        EngineConfig { default_dwell_s: -60.0, ..base.clone() },
    ];
    for config in bad {
        assert!(matches!(config.validate(), Err(ConfigError::NotPositive { .. })), "{config:?}");
    }

    let inverted = EngineConfig { min_speed: 10, max_speed: 5, ..base.clone() };
    assert_eq!(
        inverted.validate(),
        Err(ConfigError::SpeedBounds { min: 10, max: 5 })
    );
    let zero_min = EngineConfig { min_speed: 0, ..base };
    assert!(matches!(zero_min.validate(), Err(ConfigError::SpeedBounds { .. })));
}

#[test]
fn test_negative_dwell_is_rejected() {
    let mut network = RailNetwork::new();
    assert_eq!(
        network.add_station(station("A").with_dwell(-30.0)),
        Err(LoadError::InvalidDwell {
            station: "A".to_string(),
            dwell_mean_s: -30.0
        })
    );
    assert!(!network.contains_station(&code("A")));

    // Zero is allowed and means "use the default"
    network.add_station(station("B").with_dwell(0.0)).expect("station");
    let dwell = network.station(&code("B")).expect("station").dwell_time(60.0);
    assert_eq!(dwell, 60.0);
}
