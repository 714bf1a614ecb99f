//! Simulator integration tests

use approx::assert_relative_eq;
use rf_slot_engine::{SlotEngine, presets};
use rf_slot_sim::{SimError, SimulationConfig, SimulationStats, Simulator};

fn config(seed: u64) -> SimulationConfig {
    SimulationConfig {
        spins_per_session: 500,
        sessions: 4,
        seed,
        stake: 1.0,
    }
}

fn engine(id: &str) -> SlotEngine {
    SlotEngine::new(presets::by_id(id).unwrap()).unwrap()
}

#[test]
fn test_fixed_seed_is_reproducible() {
    for preset in presets::all_presets() {
        let engine = SlotEngine::new(preset).unwrap();
        let simulator = Simulator::new(config(11)).unwrap();

        let first = simulator.run(&engine).unwrap();
        let second = simulator.run(&engine).unwrap();

        assert_eq!(first.stats, second.stats);
        assert_eq!(first.session_rtp, second.session_rtp);
    }
}

#[test]
fn test_sessions_are_isolated() {
    let engine = engine("classic_lines");
    let simulator = Simulator::new(config(20)).unwrap();

    let report = simulator.run(&engine).unwrap();
    let mut merged = SimulationStats::default();
    for index in 0..4 {
        merged.merge(&simulator.run_session(&engine, index).unwrap());
    }

    assert_eq!(report.stats, merged);

    // Session 1 of seed 20 is session 0 of seed 21
    let shifted = Simulator::new(config(21)).unwrap();
    assert_eq!(
        simulator.run_session(&engine, 1).unwrap(),
        shifted.run_session(&engine, 0).unwrap()
    );
}

#[test]
fn test_spin_accounting_is_consistent() {
    for preset in presets::all_presets() {
        let engine = SlotEngine::new(preset).unwrap();
        let report = Simulator::new(config(3)).unwrap().run(&engine).unwrap();
        let stats = &report.stats;

        assert_eq!(stats.total_spins, 2000);
        assert_eq!(stats.paid_spins + stats.free_spins + stats.respins, stats.total_spins);
        assert_relative_eq!(stats.total_staked, stats.paid_spins as f64);
        assert!(stats.winning_spins <= stats.total_spins);
        assert!(stats.bonus_wheel_returned <= stats.total_returned);
        assert_eq!(report.session_rtp.len(), 4);
        assert_eq!(report.target_rtp, engine.config().target_rtp);
    }
}

#[test]
fn test_multiplier_reel_game_reaches_its_features() {
    let engine = engine("triple_multiplier");
    let simulator = Simulator::new(SimulationConfig {
        spins_per_session: 5_000,
        sessions: 2,
        seed: 5,
        stake: 1.0,
    })
    .unwrap();
    let stats = simulator.run(&engine).unwrap().stats;

    assert!(stats.respins > 0);
    assert!(stats.respins <= stats.respins_awarded);
    assert!(stats.bonus_wheels > 0);
}

#[test]
fn test_invalid_parameters_rejected() {
    let zero_sessions = SimulationConfig { sessions: 0, ..config(0) };
    assert!(matches!(Simulator::new(zero_sessions), Err(SimError::InvalidConfig(_))));

    let zero_spins = SimulationConfig { spins_per_session: 0, ..config(0) };
    assert!(matches!(Simulator::new(zero_spins), Err(SimError::InvalidConfig(_))));

    let engine = engine("gem_cascade");
    let huge_stake = Simulator::new(SimulationConfig { stake: 1.0e9, ..config(0) }).unwrap();
    assert!(matches!(huge_stake.run(&engine), Err(SimError::Spin { .. })));
}

#[test]
fn test_report_serializes_to_json() {
    let engine = engine("gem_cascade");
    let report = Simulator::new(config(9)).unwrap().run(&engine).unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["game_id"], "gem_cascade");
    assert_eq!(json["stats"]["total_spins"], 2000);
    assert!(report.rtp_deviation().is_some());
}
