//! Grid Builder
//!
//! Assembles a full grid for one spin from the configured draw mode and
//! overlays giant symbols. Holds only immutable draw tables; every call takes
//! the random source.

use std::collections::HashSet;

use log::trace;
use rand::prelude::*;

use crate::config::{DrawMode, GameConfig, GiantConfig, ReelStripSet};
use crate::error::ConfigResult;
use crate::grid::{GiantSymbolPlacement, Grid, Position};
use crate::rng::{WeightTable, draw_from_strip};
use crate::spin::SpinMode;
use crate::symbols::{SymbolCategory, SymbolId, SymbolSet};

#[derive(Debug, Clone)]
struct GiantRules {
    config: GiantConfig,
    symbols: WeightTable<SymbolId>,
    /// Symbols a giant may not cover
    blocked: HashSet<SymbolId>,
}

/// Grid builder for one game
#[derive(Debug, Clone)]
pub struct GridBuilder {
    reels: u8,
    rows: u8,
    draw_mode: DrawMode,
    strips: ReelStripSet,
    base_weights: Option<WeightTable<SymbolId>>,
    free_spin_weights: Option<WeightTable<SymbolId>>,
    giants: Option<GiantRules>,
}

impl GridBuilder {
    /// Build draw tables from a validated config
    pub fn from_config(config: &GameConfig, symbols: &SymbolSet) -> ConfigResult<Self> {
        let (base_weights, free_spin_weights) = match config.draw_mode {
            DrawMode::Weighted => (
                Some(WeightTable::new(
                    "base game symbol weights",
                    symbols.iter().map(|s| (s.id, s.weight_for(false))),
                )?),
                Some(WeightTable::new(
                    "free spin symbol weights",
                    symbols.iter().map(|s| (s.id, s.weight_for(true))),
                )?),
            ),
            DrawMode::Strip | DrawMode::Stop => (None, None),
        };

        let giants = match &config.giant_symbols {
            Some(giant) => Some(GiantRules {
                config: giant.clone(),
                symbols: WeightTable::new(
                    "giant symbols",
                    symbols.iter().filter(|s| s.giant).map(|s| (s.id, s.weight)),
                )?,
                blocked: symbols
                    .iter()
                    .filter(|s| {
                        matches!(s.category, SymbolCategory::Scatter | SymbolCategory::Bonus)
                    })
                    .map(|s| s.id)
                    .collect(),
            }),
            None => None,
        };

        Ok(Self {
            reels: config.reels,
            rows: config.rows,
            draw_mode: config.draw_mode,
            strips: config.reel_strips.clone(),
            base_weights,
            free_spin_weights,
            giants,
        })
    }

    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }

    /// Draw one cell on a reel. `Stop` mode draws strip-indexed cells here.
    pub fn draw_cell<R: Rng + ?Sized>(&self, mode: SpinMode, reel: u8, rng: &mut R) -> SymbolId {
        let table = match mode {
            SpinMode::Base => self.base_weights.as_ref(),
            SpinMode::FreeSpin => self.free_spin_weights.as_ref(),
        };
        match table {
            Some(table) => *table.draw(rng),
            None => draw_from_strip(&self.strips.for_mode(mode)[reel as usize], rng),
        }
    }

    /// Draw a fresh grid and place giant symbols.
    ///
    /// Giants are sticky during free spins.
    pub fn build<R: Rng + ?Sized>(
        &self,
        mode: SpinMode,
        rng: &mut R,
    ) -> (Grid, Vec<GiantSymbolPlacement>) {
        let mut grid = Grid::empty(self.reels, self.rows);

        for reel in 0..self.reels {
            if self.draw_mode == DrawMode::Stop {
                let strip = &self.strips.for_mode(mode)[reel as usize];
                let stop = rng.random_range(0..strip.len());
                for row in 0..self.rows {
                    grid.set(reel, row, strip.symbol_at(stop + row as usize));
                }
            } else {
                for row in 0..self.rows {
                    grid.set(reel, row, self.draw_cell(mode, reel, rng));
                }
            }
        }

        let giants = self.place_giants(&mut grid, mode, rng);
        (grid, giants)
    }

    /// Scan windows left to right, stamping giants over eligible blocks
    fn place_giants<R: Rng + ?Sized>(
        &self,
        grid: &mut Grid,
        mode: SpinMode,
        rng: &mut R,
    ) -> Vec<GiantSymbolPlacement> {
        let Some(rules) = &self.giants else {
            return Vec::new();
        };
        let probability = rules.config.probability(mode);
        if probability <= 0.0 {
            return Vec::new();
        }

        let (width, height) = (rules.config.width, rules.config.height);
        let mut placements = Vec::new();
        let mut reel = 0u8;

        while reel as u16 + width as u16 <= self.reels as u16 {
            if !rng.random_bool(probability) {
                reel += 1;
                continue;
            }

            let anchor_row = rng.random_range(0..=self.rows - height);
            let mut placement = GiantSymbolPlacement {
                symbol: 0,
                anchor: (reel, anchor_row),
                width,
                height,
                sticky: mode == SpinMode::FreeSpin,
            };
            let eligible = placement
                .cells()
                .iter()
                .all(|&(r, w)| grid.get(r, w).is_some_and(|id| !rules.blocked.contains(&id)));

            if eligible {
                placement.symbol = *rules.symbols.draw(rng);
                placement.stamp(grid);
                trace!("Giant symbol {} at {:?}", placement.symbol, placement.anchor);
                placements.push(placement);
                reel += width;
            } else {
                reel += 1;
            }
        }

        placements
    }

    /// Fill every empty cell, re-stamping sticky giants. Returns the filled positions.
    pub fn refill<R: Rng + ?Sized>(
        &self,
        grid: &mut Grid,
        giants: &[GiantSymbolPlacement],
        mode: SpinMode,
        rng: &mut R,
    ) -> Vec<Position> {
        let empty = grid.empty_positions();
        for &(reel, row) in &empty {
            grid.set(reel, row, self.draw_cell(mode, reel, rng));
        }
        for giant in giants.iter().filter(|g| g.sticky) {
            giant.stamp(grid);
        }
        debug_assert!(grid.is_full());
        empty
    }
}
