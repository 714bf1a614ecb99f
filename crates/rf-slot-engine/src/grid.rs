//! Spin grid and giant symbol placements

use serde::{Deserialize, Serialize};

use crate::symbols::SymbolId;

/// Grid position as (reel, row); row 0 is the top row
pub type Position = (u8, u8);

/// Reels × rows grid of symbol ids.
///
/// Cells are `None` only between removing wins and refilling during a
/// cascade; every grid handed out of the engine is full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    reels: u8,
    rows: u8,
    /// Column-major cells: `cells[reel][row]`
    cells: Vec<Vec<Option<SymbolId>>>,
}

impl Grid {
    /// Create an empty grid
    pub fn empty(reels: u8, rows: u8) -> Self {
        Self {
            reels,
            rows,
            cells: vec![vec![None; rows as usize]; reels as usize],
        }
    }

    /// Create a full grid from columns (`columns[reel][row]`)
    pub fn from_columns(columns: Vec<Vec<SymbolId>>) -> Self {
        let reels = columns.len() as u8;
        let rows = columns.first().map(|c| c.len()).unwrap_or(0) as u8;
        Self {
            reels,
            rows,
            cells: columns
                .into_iter()
                .map(|col| col.into_iter().map(Some).collect())
                .collect(),
        }
    }

    /// Create a full grid from rows (`rows[row][reel]`), the way grids read on paper
    pub fn from_rows(rows: Vec<Vec<SymbolId>>) -> Self {
        let reel_count = rows.first().map(|r| r.len()).unwrap_or(0);
        let columns = (0..reel_count)
            .map(|reel| rows.iter().map(|row| row[reel]).collect())
            .collect();
        Self::from_columns(columns)
    }

    pub fn reels(&self) -> u8 {
        self.reels
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    /// Symbol at a position (`None` if empty or out of bounds)
    pub fn get(&self, reel: u8, row: u8) -> Option<SymbolId> {
        self.cells
            .get(reel as usize)
            .and_then(|col| col.get(row as usize))
            .copied()
            .flatten()
    }

    pub fn set(&mut self, reel: u8, row: u8, symbol: SymbolId) {
        self.cells[reel as usize][row as usize] = Some(symbol);
    }

    pub fn clear(&mut self, reel: u8, row: u8) {
        self.cells[reel as usize][row as usize] = None;
    }

    pub fn contains(&self, (reel, row): Position) -> bool {
        reel < self.reels && row < self.rows
    }

    /// Iterate all positions, reel by reel
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let rows = self.rows;
        (0..self.reels).flat_map(move |reel| (0..rows).map(move |row| (reel, row)))
    }

    /// Positions currently empty
    pub fn empty_positions(&self) -> Vec<Position> {
        self.positions()
            .filter(|&(reel, row)| self.get(reel, row).is_none())
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|col| col.iter().all(Option::is_some))
    }

    /// Count cells matching a predicate
    pub fn count(&self, pred: impl Fn(SymbolId) -> bool) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| cell.is_some_and(&pred))
            .count()
    }

    /// Symbols of one row, left to right
    pub fn row(&self, row: u8) -> Vec<Option<SymbolId>> {
        (0..self.reels).map(|reel| self.get(reel, row)).collect()
    }

    /// Column-major cells
    pub fn columns(&self) -> &[Vec<Option<SymbolId>>] {
        &self.cells
    }

    /// Compact each column downward, leaving empty cells at the top.
    ///
    /// Cells in `locked` keep their position and symbol; the remaining
    /// symbols fall through them into the free slots below.
    pub fn apply_gravity(&mut self, locked: &[Position]) {
        for reel in 0..self.reels {
            let free_rows: Vec<u8> = (0..self.rows)
                .rev()
                .filter(|&row| !locked.contains(&(reel, row)))
                .collect();

            let falling: Vec<SymbolId> = free_rows
                .iter()
                .filter_map(|&row| self.get(reel, row))
                .collect();

            for (i, &row) in free_rows.iter().enumerate() {
                match falling.get(i) {
                    Some(&symbol) => self.set(reel, row, symbol),
                    None => self.clear(reel, row),
                }
            }
        }
    }
}

/// A symbol covering a rectangular block of cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiantSymbolPlacement {
    pub symbol: SymbolId,
    /// Top-left cell
    pub anchor: Position,
    pub width: u8,
    pub height: u8,
    /// Held in place across cascades (free spins)
    pub sticky: bool,
}

impl GiantSymbolPlacement {
    /// All covered cells
    pub fn cells(&self) -> Vec<Position> {
        let (reel, row) = self.anchor;
        (reel..reel + self.width)
            .flat_map(|r| (row..row + self.height).map(move |w| (r, w)))
            .collect()
    }

    pub fn covers(&self, (reel, row): Position) -> bool {
        let (ar, aw) = self.anchor;
        reel >= ar && reel < ar + self.width && row >= aw && row < aw + self.height
    }

    /// Whether the footprint lies inside a grid of the given size
    pub fn fits(&self, reels: u8, rows: u8) -> bool {
        let (reel, row) = self.anchor;
        reel as u16 + self.width as u16 <= reels as u16
            && row as u16 + self.height as u16 <= rows as u16
    }

    /// Write the symbol over every covered cell
    pub fn stamp(&self, grid: &mut Grid) {
        for (reel, row) in self.cells() {
            grid.set(reel, row, self.symbol);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_transposes() {
        let grid = Grid::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]);
        assert_eq!(grid.reels(), 3);
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.get(0, 1), Some(4));
        assert_eq!(grid.get(2, 0), Some(3));
        assert_eq!(grid.get(3, 0), None);
    }

    #[test]
    fn test_gravity_compacts_down() {
        // Single column, top to bottom: 1, _, 2, _
        let mut grid = Grid::from_columns(vec![vec![1, 9, 2, 9]]);
        grid.clear(0, 1);
        grid.clear(0, 3);
        grid.apply_gravity(&[]);

        assert_eq!(grid.get(0, 0), None);
        assert_eq!(grid.get(0, 1), None);
        assert_eq!(grid.get(0, 2), Some(1));
        assert_eq!(grid.get(0, 3), Some(2));
        assert_eq!(grid.empty_positions(), vec![(0, 0), (0, 1)]);
    }

    #[test]
    fn test_gravity_skips_locked_cells() {
        // Top to bottom: 1, 7(locked), _, 3
        let mut grid = Grid::from_columns(vec![vec![1, 7, 9, 3]]);
        grid.clear(0, 2);
        grid.apply_gravity(&[(0, 1)]);

        assert_eq!(grid.get(0, 0), None);
        assert_eq!(grid.get(0, 1), Some(7));
        assert_eq!(grid.get(0, 2), Some(1));
        assert_eq!(grid.get(0, 3), Some(3));
    }

    #[test]
    fn test_giant_cells_and_bounds() {
        let giant = GiantSymbolPlacement {
            symbol: 4,
            anchor: (1, 1),
            width: 2,
            height: 2,
            sticky: false,
        };
        assert_eq!(giant.cells(), vec![(1, 1), (1, 2), (2, 1), (2, 2)]);
        assert!(giant.covers((2, 2)));
        assert!(!giant.covers((3, 1)));
        assert!(giant.fits(3, 3));
        assert!(!giant.fits(2, 3));

        let mut grid = Grid::from_rows(vec![vec![0; 3]; 3]);
        giant.stamp(&mut grid);
        assert_eq!(grid.count(|s| s == 4), 4);
    }
}
