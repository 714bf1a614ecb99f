//! Loading game configs from data files

use rf_slot_engine::{
    ConfigError, ConfigLimits, ConfigParser, DrawMode, MeterRules, SlotEngine, SpinMode, WinMode,
    presets, rng,
};

const JEWEL_CASCADE: &str = include_str!("fixtures/jewel_cascade.yaml");
const LUCKY_LINES: &str = include_str!("fixtures/lucky_lines.json");

#[test]
fn test_yaml_fixture_loads() {
    let config = ConfigParser::new().parse_yaml(JEWEL_CASCADE).unwrap();

    assert_eq!(config.id, "jewel_cascade");
    assert_eq!(config.win_mode, WinMode::Adjacency);
    assert_eq!(config.draw_mode, DrawMode::Weighted);
    assert_eq!(config.max_cascades, 15);
    assert_eq!(config.wild_meter_multipliers, vec![2.0, 3.0, 5.0]);
    assert_eq!(MeterRules::from_config(&config).free_spins_for(4), 12);
    assert_eq!(config.symbols[4].free_spin_weight, Some(8.0));
    assert!(config.giant_symbols.is_some());
    assert!(config.reel_strips.base_game.is_empty());
}

#[test]
fn test_json_fixture_loads() {
    let config = ConfigParser::new().parse_json(LUCKY_LINES).unwrap();

    assert_eq!(config.draw_mode, DrawMode::Stop);
    assert!(!config.cascades_enabled);
    assert_eq!(config.resolved_paylines().len(), 20);
    assert_eq!(config.bet_divisor(), 20.0);
    assert_eq!(config.reel_strips.free_spins.len(), 5);
    assert_eq!(config.free_spin_multiplier, 3.0);
}

#[test]
fn test_engines_from_fixtures_spin() {
    let engines = [
        SlotEngine::from_yaml(JEWEL_CASCADE).unwrap(),
        SlotEngine::from_json(LUCKY_LINES).unwrap(),
    ];
    for engine in &engines {
        let mut rng = rng::seeded(3);
        let mut meter = engine.new_meter();
        for _ in 0..100 {
            let result = engine.spin(1.0, meter.next_mode(), meter, &mut rng).unwrap();
            assert!(result.grid.is_full());
            meter = result.meter;
        }
    }
}

#[test]
fn test_presets_survive_serialization() {
    for preset in presets::all_presets() {
        let yaml = serde_yml::to_string(&preset).unwrap();
        assert_eq!(ConfigParser::new().parse_yaml(&yaml).unwrap(), preset);

        let json = serde_json::to_string_pretty(&preset).unwrap();
        let parsed = ConfigParser::new().parse_json(&json).unwrap();
        assert_eq!(parsed.id, preset.id);
        assert_eq!(parsed.reel_strips, preset.reel_strips);
        assert_eq!(parsed.resolved_paylines(), preset.resolved_paylines());
    }
}

#[test]
fn test_yaml_parse_error() {
    let result = ConfigParser::new().parse_yaml("reels: [unterminated");
    assert!(matches!(result, Err(ConfigError::Yaml(_))));
}

#[test]
fn test_missing_required_field() {
    let result = ConfigParser::new().parse_json(r#"{ "id": "x", "name": "x", "reels": 5 }"#);
    assert!(matches!(result, Err(ConfigError::Json(_))));
}

#[test]
fn test_limits_applied_before_validation() {
    let parser = ConfigParser::with_limits(ConfigLimits {
        max_strip_length: 10,
        ..ConfigLimits::default()
    });
    assert!(matches!(parser.parse_json(LUCKY_LINES), Err(ConfigError::Limit(_))));

    let parser = ConfigParser::with_limits(ConfigLimits {
        max_pay_value: 500.0,
        ..ConfigLimits::default()
    });
    assert!(matches!(parser.parse_json(LUCKY_LINES), Err(ConfigError::Limit(_))));
}

#[test]
fn test_zero_weight_table_rejected() {
    let yaml = JEWEL_CASCADE
        .replace("weight: 30", "weight: 0")
        .replace("weight: 26", "weight: 0")
        .replace("weight: 18", "weight: 0")
        .replace("weight: 10", "weight: 0")
        .replace("weight: 4,", "weight: 0,")
        .replace("weight: 2 }", "weight: 0 }");
    let result = ConfigParser::new().parse_yaml(&yaml);
    assert!(matches!(result, Err(ConfigError::ZeroWeightSum(_))));
}

#[test]
fn test_giant_wider_than_match_rejected() {
    let yaml = JEWEL_CASCADE.replace("  width: 2", "  width: 3");
    let result = ConfigParser::new().parse_yaml(&yaml);
    assert!(matches!(result, Err(ConfigError::GiantWiderThanMatch { width: 3, min: 3 })));
}

#[test]
fn test_free_spin_strips_used_in_free_spins() {
    let engine = SlotEngine::from_json(LUCKY_LINES).unwrap();
    let free_strips = &engine.config().reel_strips.free_spins;
    let mut meter = engine.new_meter();
    meter.free_spins_remaining = 50;
    let mut rng = rng::seeded(8);

    for _ in 0..50 {
        let result = engine.spin(1.0, SpinMode::FreeSpin, meter, &mut rng).unwrap();
        for reel in 0..5u8 {
            for row in 0..3u8 {
                let id = result.initial_grid.get(reel, row).unwrap();
                assert!(free_strips[reel as usize].symbols.contains(&id));
            }
        }
        meter = result.meter;
        if meter.free_spins_remaining == 0 {
            break;
        }
    }
}
