//! Cascade Processor
//!
//! Explicit state machine over
//! `Evaluate → RemoveWins → ApplyGravity → Refill → Evaluate … → Settle`.
//! Each evaluation that finds wins becomes one [`CascadeRecord`]; the loop
//! stops after `max_cascades` records.

use std::collections::BTreeSet;

use log::{trace, warn};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::builder::GridBuilder;
use crate::grid::{GiantSymbolPlacement, Grid, Position};
use crate::meter::MeterController;
use crate::paytable::PayTable;
use crate::spin::SpinMode;
use crate::win::{WinDetector, WinGroup};

/// One evaluated grid state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeRecord {
    pub index: u32,
    /// Grid as evaluated, before removal
    pub grid: Grid,
    pub win_groups: Vec<WinGroup>,
    /// Cells cleared after this evaluation
    pub removed: Vec<Position>,
    /// Sum of group pay multipliers
    pub pays: f64,
}

/// Cascade phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadePhase {
    Evaluate,
    RemoveWins,
    ApplyGravity,
    Refill,
    Settle,
}

/// Settled outcome of the cascade loop
#[derive(Debug, Clone)]
pub struct CascadeOutcome {
    pub grid: Grid,
    pub cascades: Vec<CascadeRecord>,
    pub max_cascades_reached: bool,
}

/// Drives the cascade loop for one spin
#[derive(Debug)]
pub struct CascadeProcessor<'a> {
    pub detector: &'a dyn WinDetector,
    pub paytable: &'a PayTable,
    pub builder: &'a GridBuilder,
    pub max_cascades: u32,
    pub enabled: bool,
}

impl CascadeProcessor<'_> {
    /// Resolve a freshly built grid. Meters observe the initial grid and
    /// every refill.
    pub fn run<R: Rng + ?Sized>(
        &self,
        mut grid: Grid,
        giants: &[GiantSymbolPlacement],
        mode: SpinMode,
        meter: &mut MeterController<'_>,
        rng: &mut R,
    ) -> CascadeOutcome {
        let locked: Vec<Position> = giants
            .iter()
            .filter(|g| g.sticky && mode == SpinMode::FreeSpin)
            .flat_map(GiantSymbolPlacement::cells)
            .collect();

        let initial: Vec<Position> = grid.positions().collect();
        meter.observe(&grid, &initial, 0, self.paytable, rng);

        let mut cascades: Vec<CascadeRecord> = Vec::new();
        let mut max_cascades_reached = false;
        let mut phase = CascadePhase::Evaluate;

        loop {
            trace!("Cascade {} phase {:?}", cascades.len(), phase);
            phase = match phase {
                CascadePhase::Evaluate => {
                    let win_groups = self.detector.evaluate(&grid, self.paytable);
                    if win_groups.is_empty() {
                        CascadePhase::Settle
                    } else {
                        cascades.push(CascadeRecord {
                            index: cascades.len() as u32,
                            grid: grid.clone(),
                            pays: win_groups.iter().map(|g| g.pay).sum(),
                            win_groups,
                            removed: Vec::new(),
                        });
                        if self.enabled {
                            CascadePhase::RemoveWins
                        } else {
                            CascadePhase::Settle
                        }
                    }
                }
                CascadePhase::RemoveWins => {
                    let Some(record) = cascades.last_mut() else {
                        break;
                    };
                    let removed: BTreeSet<Position> = record
                        .win_groups
                        .iter()
                        .flat_map(|g| g.cells.iter().copied())
                        .filter(|cell| !locked.contains(cell))
                        .collect();
                    for &(reel, row) in &removed {
                        grid.clear(reel, row);
                    }
                    record.removed = removed.into_iter().collect();
                    if record.removed.is_empty() {
                        CascadePhase::Settle
                    } else {
                        CascadePhase::ApplyGravity
                    }
                }
                CascadePhase::ApplyGravity => {
                    grid.apply_gravity(&locked);
                    CascadePhase::Refill
                }
                CascadePhase::Refill => {
                    let landed = self.builder.refill(&mut grid, giants, mode, rng);
                    meter.observe(&grid, &landed, cascades.len() as u32, self.paytable, rng);
                    if cascades.len() as u32 >= self.max_cascades {
                        max_cascades_reached = true;
                        warn!("Cascade limit {} reached, settling", self.max_cascades);
                        CascadePhase::Settle
                    } else {
                        CascadePhase::Evaluate
                    }
                }
                CascadePhase::Settle => break,
            };
        }

        CascadeOutcome {
            grid,
            cascades,
            max_cascades_reached,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::meter::{MeterRules, MeterState};
    use crate::presets;
    use crate::rng::seeded;
    use crate::symbols::{SymbolId, SymbolSet};
    use crate::win::detector_for;

    const RUBY: SymbolId = 1;
    const TOPAZ: SymbolId = 2;
    const JADE: SymbolId = 3;
    const DIAMOND: SymbolId = 5;

    struct Fixture {
        config: GameConfig,
        paytable: PayTable,
        builder: GridBuilder,
        detector: Box<dyn WinDetector>,
        rules: MeterRules,
    }

    impl Fixture {
        /// Gem cascade preset refilling with one symbol per mode
        fn new(base: SymbolId, free: SymbolId, enabled: bool) -> Self {
            let mut config = presets::cascade_grid();
            config.reel_strips.base_game = presets::uniform_strips(config.reels, base);
            config.reel_strips.free_spins = presets::uniform_strips(config.reels, free);
            config.giant_symbols = None;
            config.cascades_enabled = enabled;
            let symbols = SymbolSet::new(config.symbols.clone()).unwrap();
            Self {
                paytable: PayTable::new(symbols.clone(), config.min_match_length),
                builder: GridBuilder::from_config(&config, &symbols).unwrap(),
                detector: detector_for(&config),
                rules: MeterRules::from_config(&config),
                config,
            }
        }

        fn run(
            &self,
            grid: Grid,
            giants: &[GiantSymbolPlacement],
            mode: SpinMode,
        ) -> CascadeOutcome {
            let processor = CascadeProcessor {
                detector: self.detector.as_ref(),
                paytable: &self.paytable,
                builder: &self.builder,
                max_cascades: self.config.max_cascades,
                enabled: self.config.cascades_enabled,
            };
            let mut meter = MeterController::new(&self.rules, MeterState::default());
            processor.run(grid, giants, mode, &mut meter, &mut seeded(1))
        }
    }

    fn uniform(config: &GameConfig, symbol: SymbolId) -> Grid {
        Grid::from_rows(vec![vec![symbol; config.reels as usize]; config.rows as usize])
    }

    #[test]
    fn test_all_one_symbol_terminates_at_bound() {
        let fixture = Fixture::new(RUBY, RUBY, true);
        let outcome = fixture.run(uniform(&fixture.config, RUBY), &[], SpinMode::Base);

        assert_eq!(outcome.cascades.len(), fixture.config.max_cascades as usize);
        assert!(outcome.max_cascades_reached);
        assert!(outcome.grid.is_full());
        for (i, record) in outcome.cascades.iter().enumerate() {
            assert_eq!(record.index as usize, i);
            assert_eq!(record.removed.len(), 30);
        }
    }

    #[test]
    fn test_no_wins_settles_without_cascades() {
        let fixture = Fixture::new(RUBY, RUBY, true);
        let rows = (0..5)
            .map(|row| {
                (0..6)
                    .map(|reel| if (row + reel) % 2 == 0 { RUBY } else { TOPAZ })
                    .collect()
            })
            .collect();
        let grid = Grid::from_rows(rows);
        let outcome = fixture.run(grid.clone(), &[], SpinMode::Base);

        assert!(outcome.cascades.is_empty());
        assert!(!outcome.max_cascades_reached);
        assert_eq!(outcome.grid, grid);
    }

    #[test]
    fn test_disabled_cascades_evaluate_once() {
        let fixture = Fixture::new(RUBY, RUBY, false);
        let outcome = fixture.run(uniform(&fixture.config, RUBY), &[], SpinMode::Base);

        assert_eq!(outcome.cascades.len(), 1);
        assert!(outcome.cascades[0].removed.is_empty());
        assert_eq!(outcome.cascades[0].win_groups.len(), 5);
        assert!(!outcome.max_cascades_reached);
    }

    #[test]
    fn test_removed_cells_refilled_from_strips() {
        let fixture = Fixture::new(TOPAZ, TOPAZ, true);
        let mut grid = uniform(&fixture.config, JADE);
        // One paying run of rubies on the bottom row
        for reel in 0..3 {
            grid.set(reel, 4, RUBY);
        }
        let outcome = fixture.run(grid, &[], SpinMode::Base);

        let first = &outcome.cascades[0];
        assert!(first.removed.contains(&(0, 4)));
        assert!(outcome.grid.is_full());
        assert_eq!(outcome.grid.count(|id| id == RUBY), 0);
    }

    #[test]
    fn test_sticky_giant_holds_anchor() {
        let fixture = Fixture::new(RUBY, TOPAZ, true);
        let giant = GiantSymbolPlacement {
            symbol: DIAMOND,
            anchor: (1, 1),
            width: 2,
            height: 2,
            sticky: true,
        };
        let mut grid = uniform(&fixture.config, RUBY);
        giant.stamp(&mut grid);
        grid.set(3, 1, DIAMOND);
        grid.set(3, 2, DIAMOND);

        let outcome = fixture.run(grid, &[giant.clone()], SpinMode::FreeSpin);

        let first = &outcome.cascades[0];
        assert!(first.win_groups.iter().any(|g| g.symbol == DIAMOND && g.cells.contains(&(1, 1))));
        assert!(first.removed.contains(&(3, 1)));
        for cell in giant.cells() {
            assert!(!first.removed.contains(&cell));
            assert_eq!(outcome.grid.get(cell.0, cell.1), Some(DIAMOND));
        }
        for record in &outcome.cascades {
            for cell in giant.cells() {
                assert_eq!(record.grid.get(cell.0, cell.1), Some(DIAMOND));
            }
        }
    }
}
