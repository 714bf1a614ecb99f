//! Fixed payline evaluation

use crate::config::WinMode;
use crate::grid::Grid;
use crate::paytable::{PayTable, Payline};
use crate::symbols::SymbolId;

use super::{WinDetector, WinGroup, run_symbol};

/// Left-to-right evaluation along configured paylines
#[derive(Debug, Clone)]
pub struct PaylineDetector {
    paylines: Vec<Payline>,
}

impl PaylineDetector {
    pub fn new(paylines: Vec<Payline>) -> Self {
        Self { paylines }
    }

    pub fn paylines(&self) -> &[Payline] {
        &self.paylines
    }

    fn evaluate_line(&self, line: &Payline, grid: &Grid, paytable: &PayTable) -> Option<WinGroup> {
        let mut run: Vec<SymbolId> = Vec::with_capacity(line.positions.len());
        let mut target: Option<SymbolId> = None;

        for reel in 0..grid.reels() {
            let Some(id) = grid.get(reel, line.row_at(reel)) else {
                break;
            };
            if paytable.breaks_run(id) {
                break;
            }
            if paytable.is_wild(id) {
                run.push(id);
                continue;
            }
            match target {
                None if paytable.is_substitutable(id) => {
                    target = Some(id);
                    run.push(id);
                }
                Some(t) if t == id => run.push(id),
                _ => break,
            }
        }

        let symbol = run_symbol(&run, paytable)?;
        let count = run.len() as u8;
        let pay = paytable.payout(symbol, count);
        (pay > 0.0).then(|| WinGroup {
            symbol,
            cells: (0..count).map(|reel| (reel, line.row_at(reel))).collect(),
            count,
            pay,
            payline: Some(line.index),
        })
    }
}

impl WinDetector for PaylineDetector {
    fn mode(&self) -> WinMode {
        WinMode::Paylines
    }

    fn evaluate(&self, grid: &Grid, paytable: &PayTable) -> Vec<WinGroup> {
        self.paylines
            .iter()
            .filter_map(|line| self.evaluate_line(line, grid, paytable))
            .collect()
    }
}
