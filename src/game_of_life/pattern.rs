//! Finite sets of live cells on the unbounded plane

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Cell coordinates `(x, y)`, with `y` growing downwards.
pub type Cell = (i64, i64);

/// The live cells of one generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pattern {
    cells: BTreeSet<Cell>,
}

impl Pattern {
    /// Create an empty pattern
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, cell: Cell) -> bool {
        self.cells.insert(cell)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Number of live cells
    pub fn population(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Live cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        let mut cells: Vec<Cell> = self.cells.iter().copied().collect();
        cells.sort_by_key(|&(x, y)| (y, x));
        cells.into_iter()
    }

    /// Smallest `(min, max)` corners enclosing every live cell.
    pub fn bounding_box(&self) -> Option<(Cell, Cell)> {
        let first = *self.cells.iter().next()?;
        Some(self.cells.iter().fold((first, first), |((x0, y0), (x1, y1)), &(x, y)| {
            ((x0.min(x), y0.min(y)), (x1.max(x), y1.max(y)))
        }))
    }

    /// The same cells shifted by `(dx, dy)`.
    #[cfg(test)]
    pub(crate) fn translated(&self, dx: i64, dy: i64) -> Self {
        self.cells.iter().map(|&(x, y)| (x + dx, y + dy)).collect()
    }

    pub(crate) fn cells(&self) -> &BTreeSet<Cell> {
        &self.cells
    }
}

impl FromIterator<Cell> for Pattern {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(((x0, y0), (x1, y1))) = self.bounding_box() else {
            return writeln!(f, "(empty)");
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let symbol = if self.contains((x, y)) { "⬛" } else { "⬜" };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
