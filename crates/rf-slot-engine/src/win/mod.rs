//! Win detection strategies
//!
//! A [`WinDetector`] scans a grid read-only and returns the paying groups.
//! The game config picks the strategy once at engine construction.

mod adjacency;
mod payline;

pub use adjacency::AdjacencyDetector;
pub use payline::PaylineDetector;

use serde::{Deserialize, Serialize};

use crate::config::{GameConfig, WinMode};
use crate::grid::{Grid, Position};
use crate::paytable::PayTable;
use crate::symbols::SymbolId;

/// One paying run of symbols
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinGroup {
    /// Paying symbol (a wild only when the whole run is wild)
    pub symbol: SymbolId,
    /// Contributing cells, left to right
    pub cells: Vec<Position>,
    /// Match length
    pub count: u8,
    /// Pay multiplier from the paytable
    pub pay: f64,
    /// Payline index in payline mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payline: Option<u8>,
}

/// Win detection strategy
pub trait WinDetector: Send + Sync + std::fmt::Debug {
    fn mode(&self) -> WinMode;

    /// All paying groups on the grid. Empty cells never match.
    fn evaluate(&self, grid: &Grid, paytable: &PayTable) -> Vec<WinGroup>;
}

/// Build the detector a config asks for
pub fn detector_for(config: &GameConfig) -> Box<dyn WinDetector> {
    match config.win_mode {
        WinMode::Paylines => Box::new(PaylineDetector::new(config.resolved_paylines())),
        WinMode::Adjacency => Box::new(AdjacencyDetector),
    }
}

/// Resolve the paying symbol of a run: first non-wild, else the leading wild
pub(crate) fn run_symbol(cells: &[SymbolId], paytable: &PayTable) -> Option<SymbolId> {
    cells
        .iter()
        .copied()
        .find(|&id| !paytable.is_wild(id))
        .or_else(|| cells.first().copied())
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::paytable::PayTable;
    use crate::symbols::{Symbol, SymbolCategory, SymbolSet};

    pub const BLANK: u32 = 0;
    pub const A: u32 = 1;
    pub const B: u32 = 2;
    pub const WILD: u32 = 9;
    pub const SCATTER: u32 = 10;

    pub fn paytable(min_match: u8) -> PayTable {
        let symbols = SymbolSet::new(vec![
            Symbol::blank(BLANK),
            Symbol::paying(A, "A", SymbolCategory::Low, &[(3, 5.0), (4, 10.0), (5, 25.0)]),
            Symbol::paying(B, "B", SymbolCategory::Premium, &[(3, 8.0), (4, 20.0), (5, 50.0)]),
            Symbol::wild(WILD, "W", &[(3, 30.0), (4, 60.0), (5, 100.0)]),
            Symbol::scatter(SCATTER, "S"),
        ])
        .unwrap();
        PayTable::new(symbols, min_match)
    }
}
