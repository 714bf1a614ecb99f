//! Built-in game presets, one per supported game family

use std::collections::BTreeMap;

use crate::config::{
    BonusWheelConfig, DrawMode, GameConfig, GiantConfig, MultiplierReelConfig, MultiplierReelEntry,
    ReelStripSet, StakeLimits, WheelSegment, WinMode,
};
use crate::symbols::SymbolCategory::{Low, Premium};
use crate::symbols::{ReelStrip, Symbol, SymbolId};

/// Get all built-in presets
pub fn all_presets() -> Vec<GameConfig> {
    vec![cascade_grid(), line_slot(), multiplier_reel()]
}

/// Look up a preset by id
pub fn by_id(id: &str) -> Option<GameConfig> {
    all_presets().into_iter().find(|p| p.id == id)
}

fn strip(pattern: &[SymbolId]) -> ReelStrip {
    ReelStrip::new(pattern.to_vec())
}

/// Rotate a pattern so neighbouring reels do not line up
fn rotated(pattern: &[SymbolId], by: usize) -> ReelStrip {
    let mut symbols = pattern.to_vec();
    symbols.rotate_left(by % pattern.len());
    ReelStrip::new(symbols)
}

/// Gem cascade: 6×5 adjacency grid with giant symbols and a wild meter
pub fn cascade_grid() -> GameConfig {
    const RUBY: SymbolId = 1;
    const TOPAZ: SymbolId = 2;
    const JADE: SymbolId = 3;
    const SAPPHIRE: SymbolId = 4;
    const DIAMOND: SymbolId = 5;
    const WILD: SymbolId = 8;
    const SCATTER: SymbolId = 9;

    let symbols = vec![
        Symbol::paying(RUBY, "RUBY", Low, &[(3, 0.2), (4, 0.5), (5, 1.0), (6, 2.5)])
            .with_weight(24.0),
        Symbol::paying(TOPAZ, "TOPAZ", Low, &[(3, 0.25), (4, 0.6), (5, 1.2), (6, 3.0)])
            .with_weight(22.0),
        Symbol::paying(JADE, "JADE", Low, &[(3, 0.3), (4, 0.8), (5, 1.5), (6, 4.0)])
            .with_weight(20.0),
        Symbol::paying(SAPPHIRE, "SAPPHIRE", Premium, &[(3, 0.5), (4, 1.5), (5, 3.0), (6, 8.0)])
            .with_weight(14.0)
            .with_giant(),
        Symbol::paying(DIAMOND, "DIAMOND", Premium, &[(3, 1.0), (4, 2.5), (5, 6.0), (6, 15.0)])
            .with_weight(10.0)
            .with_giant(),
        Symbol::wild(WILD, "WILD", &[(3, 2.0), (4, 5.0), (5, 10.0), (6, 25.0)])
            .with_weight(4.0)
            .with_free_spin_weight(6.0),
        Symbol::scatter(SCATTER, "SCATTER").with_weight(2.0),
    ];

    let base = [
        RUBY, TOPAZ, JADE, RUBY, SAPPHIRE, TOPAZ, RUBY, JADE, DIAMOND, TOPAZ, RUBY, WILD, JADE,
        TOPAZ, RUBY, SAPPHIRE, JADE, SCATTER, TOPAZ, RUBY, DIAMOND, JADE, TOPAZ, SAPPHIRE,
    ];
    let free = [
        RUBY, WILD, TOPAZ, JADE, SAPPHIRE, RUBY, DIAMOND, TOPAZ, WILD, JADE, SAPPHIRE, RUBY,
        SCATTER, TOPAZ, DIAMOND, JADE, WILD, RUBY, SAPPHIRE, TOPAZ,
    ];

    GameConfig {
        id: "gem_cascade".to_string(),
        name: "Gem Cascade".to_string(),
        target_rtp: Some(0.96),
        reels: 6,
        rows: 5,
        min_match_length: 3,
        win_mode: WinMode::Adjacency,
        draw_mode: DrawMode::Strip,
        symbols,
        reel_strips: ReelStripSet {
            base_game: (0..6).map(|reel| rotated(&base, reel * 5)).collect(),
            free_spins: (0..6).map(|reel| rotated(&free, reel * 3)).collect(),
        },
        paylines: None,
        wild_meter_threshold: Some(12),
        wild_meter_multipliers: vec![2.0, 3.0, 5.0],
        max_meter_multiplier: Some(100.0),
        scatter_free_spin_table: BTreeMap::from([(3, 8), (4, 12), (5, 15)]),
        free_spin_multiplier: 1.0,
        max_cascades: 20,
        cascades_enabled: true,
        giant_symbols: Some(GiantConfig {
            width: 2,
            height: 2,
            base_probability: 0.04,
            free_spin_probability: 0.12,
        }),
        multiplier_reel: None,
        bonus_wheel: None,
        respin_symbol: None,
        max_consecutive_respins: 0,
        stake: StakeLimits { min: 0.2, max: 100.0 },
        bet_divisor: Some(1.0),
    }
}

/// Classic lines: 5×3, standard 20 paylines, physical reel stops, no cascades
pub fn line_slot() -> GameConfig {
    const TEN: SymbolId = 1;
    const JACK: SymbolId = 2;
    const QUEEN: SymbolId = 3;
    const KING: SymbolId = 4;
    const BELL: SymbolId = 5;
    const STAR: SymbolId = 6;
    const SEVEN: SymbolId = 7;
    const WILD: SymbolId = 10;
    const SCATTER: SymbolId = 11;

    let symbols = vec![
        Symbol::paying(TEN, "10", Low, &[(3, 5.0), (4, 15.0), (5, 50.0)]),
        Symbol::paying(JACK, "J", Low, &[(3, 5.0), (4, 20.0), (5, 60.0)]),
        Symbol::paying(QUEEN, "Q", Low, &[(3, 8.0), (4, 25.0), (5, 75.0)]),
        Symbol::paying(KING, "K", Low, &[(3, 10.0), (4, 30.0), (5, 100.0)]),
        Symbol::paying(BELL, "BELL", Premium, &[(3, 15.0), (4, 50.0), (5, 150.0)]),
        Symbol::paying(STAR, "STAR", Premium, &[(3, 20.0), (4, 75.0), (5, 250.0)]),
        Symbol::paying(SEVEN, "SEVEN", Premium, &[(3, 30.0), (4, 125.0), (5, 500.0)]),
        Symbol::wild(WILD, "WILD", &[(3, 50.0), (4, 200.0), (5, 1000.0)]),
        Symbol::scatter(SCATTER, "SCATTER"),
    ];

    let base = [
        TEN, JACK, QUEEN, KING, TEN, BELL, JACK, QUEEN, STAR, TEN, KING, JACK, SCATTER, QUEEN,
        TEN, SEVEN, KING, JACK, BELL, QUEEN, TEN, WILD, KING, JACK, STAR, QUEEN, TEN, KING, BELL,
        JACK,
    ];
    let free = [
        TEN, WILD, JACK, QUEEN, BELL, KING, STAR, TEN, WILD, QUEEN, SEVEN, JACK, SCATTER, KING,
        BELL, TEN, QUEEN, STAR, WILD, JACK,
    ];

    GameConfig {
        id: "classic_lines".to_string(),
        name: "Classic Lines".to_string(),
        target_rtp: Some(0.95),
        reels: 5,
        rows: 3,
        min_match_length: 3,
        win_mode: WinMode::Paylines,
        draw_mode: DrawMode::Stop,
        symbols,
        reel_strips: ReelStripSet {
            base_game: (0..5).map(|reel| rotated(&base, reel * 7)).collect(),
            free_spins: (0..5).map(|reel| rotated(&free, reel * 4)).collect(),
        },
        paylines: None,
        wild_meter_threshold: None,
        wild_meter_multipliers: Vec::new(),
        max_meter_multiplier: None,
        scatter_free_spin_table: BTreeMap::from([(3, 10), (4, 15), (5, 20)]),
        free_spin_multiplier: 2.0,
        max_cascades: 1,
        cascades_enabled: false,
        giant_symbols: None,
        multiplier_reel: None,
        bonus_wheel: None,
        respin_symbol: None,
        max_consecutive_respins: 0,
        stake: StakeLimits { min: 0.2, max: 200.0 },
        bet_divisor: None,
    }
}

/// Triple multiplier: 3×3 reel game with a multiplier reel, respins and a bonus wheel
pub fn multiplier_reel() -> GameConfig {
    const BLANK: SymbolId = 0;
    const CHERRY: SymbolId = 1;
    const BAR: SymbolId = 2;
    const DOUBLE_BAR: SymbolId = 3;
    const SEVEN: SymbolId = 4;
    const WILD: SymbolId = 5;
    const X1: SymbolId = 20;
    const X2: SymbolId = 21;
    const X3: SymbolId = 22;
    const X5: SymbolId = 23;
    const RESPIN: SymbolId = 30;
    const WHEEL: SymbolId = 31;

    // Reel-only symbols never land on the grid in weighted draws
    let reel_symbol = |id, name: &str| Symbol::bonus(id, name).with_weight(0.0);

    let symbols = vec![
        Symbol::blank(BLANK).with_weight(6.0),
        Symbol::paying(CHERRY, "CHERRY", Low, &[(3, 5.0)]).with_weight(5.0),
        Symbol::paying(BAR, "BAR", Low, &[(3, 10.0)]).with_weight(4.0),
        Symbol::paying(DOUBLE_BAR, "BAR2", Premium, &[(3, 25.0)]).with_weight(3.0),
        Symbol::paying(SEVEN, "SEVEN", Premium, &[(3, 100.0)]).with_weight(1.5),
        Symbol::wild(WILD, "WILD", &[(3, 250.0)]).with_weight(0.5),
        reel_symbol(X1, "X1"),
        reel_symbol(X2, "X2"),
        reel_symbol(X3, "X3"),
        reel_symbol(X5, "X5"),
        reel_symbol(RESPIN, "RESPIN"),
        reel_symbol(WHEEL, "WHEEL"),
    ];

    let reel = [
        BLANK, CHERRY, BLANK, BAR, BLANK, CHERRY, DOUBLE_BAR, BLANK, CHERRY, BAR, BLANK, SEVEN,
        BLANK, CHERRY, BAR, BLANK, DOUBLE_BAR, WILD, BLANK, CHERRY,
    ];

    let entry = |symbol, weight, multiplier| MultiplierReelEntry {
        symbol,
        weight,
        multiplier,
    };
    let segment = |label: &str, weight, multiplier| WheelSegment {
        label: label.to_string(),
        weight,
        multiplier,
    };

    GameConfig {
        id: "triple_multiplier".to_string(),
        name: "Triple Multiplier".to_string(),
        target_rtp: Some(0.94),
        reels: 3,
        rows: 3,
        min_match_length: 3,
        win_mode: WinMode::Paylines,
        draw_mode: DrawMode::Strip,
        symbols,
        reel_strips: ReelStripSet {
            base_game: (0..3).map(|r| rotated(&reel, r * 6)).collect(),
            free_spins: Vec::new(),
        },
        paylines: Some(vec![
            vec![1, 1, 1],
            vec![0, 0, 0],
            vec![2, 2, 2],
            vec![0, 1, 2],
            vec![2, 1, 0],
        ]),
        wild_meter_threshold: None,
        wild_meter_multipliers: Vec::new(),
        max_meter_multiplier: None,
        scatter_free_spin_table: BTreeMap::new(),
        free_spin_multiplier: 1.0,
        max_cascades: 1,
        cascades_enabled: false,
        giant_symbols: None,
        multiplier_reel: Some(MultiplierReelConfig {
            entries: vec![
                entry(X1, 50.0, Some(1.0)),
                entry(X2, 25.0, Some(2.0)),
                entry(X3, 10.0, Some(3.0)),
                entry(X5, 4.0, Some(5.0)),
                entry(RESPIN, 8.0, None),
                entry(WHEEL, 3.0, None),
            ],
        }),
        bonus_wheel: Some(BonusWheelConfig {
            trigger_symbol: Some(WHEEL),
            segments: vec![
                segment("x2", 30.0, 2.0),
                segment("x3", 25.0, 3.0),
                segment("x5", 20.0, 5.0),
                segment("x10", 15.0, 10.0),
                segment("x25", 7.0, 25.0),
                segment("x50", 3.0, 50.0),
            ],
        }),
        respin_symbol: Some(RESPIN),
        max_consecutive_respins: 3,
        stake: StakeLimits { min: 0.1, max: 50.0 },
        bet_divisor: None,
    }
}

/// One-symbol strips for every reel
pub fn uniform_strips(reels: u8, symbol: SymbolId) -> Vec<ReelStrip> {
    (0..reels).map(|_| strip(&[symbol])).collect()
}
