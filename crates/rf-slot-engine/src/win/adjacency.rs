//! Free-form adjacency evaluation

use crate::config::WinMode;
use crate::grid::Grid;
use crate::paytable::PayTable;
use crate::symbols::SymbolId;

use super::{WinDetector, WinGroup, run_symbol};

/// Runs of adjacent matching symbols on any row, starting at any reel.
///
/// Blanks and scatters end a run; wilds join it. When a run ends against a
/// different symbol, its trailing wilds also start the next run.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdjacencyDetector;

impl AdjacencyDetector {
    fn evaluate_row(
        row: u8,
        cells: &[Option<SymbolId>],
        paytable: &PayTable,
        wins: &mut Vec<WinGroup>,
    ) {
        let len = cells.len();
        let mut start = 0;

        while start < len {
            match cells[start] {
                Some(id) if !paytable.breaks_run(id) => {}
                _ => {
                    start += 1;
                    continue;
                }
            }

            let mut target = None;
            let mut last_non_wild = None;
            let mut end = start;
            while let Some(id) = cells.get(end).copied().flatten() {
                if paytable.breaks_run(id) {
                    break;
                }
                if !paytable.is_wild(id) {
                    match target {
                        None => target = Some(id),
                        Some(t) if t != id => break,
                        Some(_) => {}
                    }
                    last_non_wild = Some(end);
                }
                end += 1;
            }

            let run: Vec<SymbolId> = cells[start..end].iter().flatten().copied().collect();
            if let Some(symbol) = run_symbol(&run, paytable) {
                let count = run.len() as u8;
                let pay = paytable.payout(symbol, count);
                if pay > 0.0 {
                    wins.push(WinGroup {
                        symbol,
                        cells: (start..end).map(|reel| (reel as u8, row)).collect(),
                        count,
                        pay,
                        payline: None,
                    });
                }
            }

            // Broken by a different symbol: trailing wilds are shared
            let broken_by_symbol = cells
                .get(end)
                .copied()
                .flatten()
                .is_some_and(|id| !paytable.breaks_run(id));
            start = match last_non_wild {
                Some(i) if broken_by_symbol && i + 1 < end => i + 1,
                _ => end,
            };
        }
    }
}

impl WinDetector for AdjacencyDetector {
    fn mode(&self) -> WinMode {
        WinMode::Adjacency
    }

    fn evaluate(&self, grid: &Grid, paytable: &PayTable) -> Vec<WinGroup> {
        let mut wins = Vec::new();
        for row in 0..grid.rows() {
            Self::evaluate_row(row, &grid.row(row), paytable, &mut wins);
        }
        wins
    }
}
