//! Paytable and payline definitions

use serde::{Deserialize, Serialize};

use crate::symbols::{Symbol, SymbolCategory, SymbolId, SymbolSet};

/// A payline definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payline {
    /// Payline index (0-based)
    pub index: u8,
    /// Row positions for each reel (e.g., [1, 0, 0, 0, 1] for a "V" shape)
    pub positions: Vec<u8>,
}

impl Payline {
    /// Create a straight line (same row across all reels)
    pub fn straight(index: u8, row: u8, reel_count: u8) -> Self {
        Self {
            index,
            positions: vec![row; reel_count as usize],
        }
    }

    /// Row on a given reel
    pub fn row_at(&self, reel: u8) -> u8 {
        self.positions[reel as usize]
    }
}

/// Standard payline patterns for a 5×3 grid
pub fn standard_20_paylines() -> Vec<Payline> {
    let patterns: [[u8; 5]; 17] = [
        // V shapes
        [0, 1, 2, 1, 0],
        [2, 1, 0, 1, 2],
        // Zigzag
        [0, 0, 1, 2, 2],
        [2, 2, 1, 0, 0],
        [1, 0, 0, 0, 1],
        [1, 2, 2, 2, 1],
        // W shapes
        [0, 1, 0, 1, 0],
        [2, 1, 2, 1, 2],
        // Diagonal
        [0, 1, 1, 1, 0],
        [2, 1, 1, 1, 2],
        // Steps
        [1, 1, 0, 1, 1],
        [1, 1, 2, 1, 1],
        // Complex
        [0, 2, 0, 2, 0],
        [2, 0, 2, 0, 2],
        [1, 0, 1, 0, 1],
        [1, 2, 1, 2, 1],
        [0, 0, 2, 0, 0],
    ];

    [1u8, 0, 2]
        .iter()
        .enumerate()
        .map(|(i, &row)| Payline::straight(i as u8, row, 5))
        .chain(patterns.iter().enumerate().map(|(i, rows)| Payline {
            index: (i + 3) as u8,
            positions: rows.to_vec(),
        }))
        .collect()
}

/// Symbol payouts keyed by (symbol, match length)
#[derive(Debug, Clone)]
pub struct PayTable {
    symbols: SymbolSet,
    min_match: u8,
}

impl PayTable {
    pub fn new(symbols: SymbolSet, min_match: u8) -> Self {
        Self { symbols, min_match }
    }

    /// Minimum run length that can pay
    pub fn min_match(&self) -> u8 {
        self.min_match
    }

    pub fn symbols(&self) -> &SymbolSet {
        &self.symbols
    }

    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id)
    }

    /// Pay multiplier for an exact match count; 0 for unknown symbols or lengths
    pub fn payout(&self, symbol: SymbolId, count: u8) -> f64 {
        if count < self.min_match {
            return 0.0;
        }
        self.symbols.get(symbol).map(|s| s.get_pay(count)).unwrap_or(0.0)
    }

    pub fn category(&self, id: SymbolId) -> SymbolCategory {
        self.symbols.category(id)
    }

    pub fn is_wild(&self, id: SymbolId) -> bool {
        self.symbols.is_wild(id)
    }

    pub fn is_scatter(&self, id: SymbolId) -> bool {
        self.symbols.is_scatter(id)
    }

    /// Can a wild stand in for this symbol?
    pub fn is_substitutable(&self, id: SymbolId) -> bool {
        self.category(id).is_substitutable()
    }

    /// Does this symbol end every run?
    pub fn breaks_run(&self, id: SymbolId) -> bool {
        matches!(self.category(id), SymbolCategory::Blank | SymbolCategory::Scatter)
    }

    pub fn counts_for_meter(&self, id: SymbolId) -> bool {
        self.symbols.get(id).is_some_and(Symbol::counts_for_meter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_paylines() {
        let lines = standard_20_paylines();
        assert_eq!(lines.len(), 20);
        assert_eq!(lines[0].positions, vec![1; 5]);
        assert_eq!(lines[1].positions, vec![0; 5]);
        assert_eq!(lines[3].positions, vec![0, 1, 2, 1, 0]);
        for (i, line) in lines.iter().enumerate() {
            assert_eq!(line.index as usize, i);
            assert!(line.positions.iter().all(|&row| row < 3));
        }
    }

    #[test]
    fn test_payout_lookup() {
        let symbols = SymbolSet::new(vec![
            Symbol::paying(1, "A", SymbolCategory::Low, &[(3, 5.0), (5, 50.0)]),
            Symbol::blank(0),
        ])
        .unwrap();
        let table = PayTable::new(symbols, 3);

        assert_eq!(table.payout(1, 3), 5.0);
        assert_eq!(table.payout(1, 4), 0.0);
        assert_eq!(table.payout(1, 5), 50.0);
        assert_eq!(table.payout(1, 2), 0.0);
        assert_eq!(table.payout(42, 3), 0.0);
        assert!(table.breaks_run(0));
        assert!(table.breaks_run(42));
    }
}
