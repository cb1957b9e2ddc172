use std::collections::HashSet;

use crate::utils::coords::Cell;

// ----------------------------------------------
// ForbiddenSet
// ----------------------------------------------

// Cells excluded from traversal for a single search, e.g. the cells
// currently held by other agents. Layered on top of the grid's own
// walkability and never written back into the grid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ForbiddenSet {
    cells: HashSet<Cell>,
}

impl ForbiddenSet {
    #[inline]
    pub fn new() -> Self {
        Self { cells: HashSet::new() }
    }

    #[inline]
    pub fn insert(&mut self, cell: Cell) -> bool {
        self.cells.insert(cell)
    }

    #[inline]
    pub fn remove(&mut self, cell: Cell) -> bool {
        self.cells.remove(&cell)
    }

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        // Skip hashing for the common "no agents around" case.
        !self.cells.is_empty() && self.cells.contains(&cell)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }
}

impl FromIterator<Cell> for ForbiddenSet {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        Self { cells: iter.into_iter().collect() }
    }
}

impl Extend<Cell> for ForbiddenSet {
    fn extend<I: IntoIterator<Item = Cell>>(&mut self, iter: I) {
        self.cells.extend(iter);
    }
}

impl<const N: usize> From<[Cell; N]> for ForbiddenSet {
    fn from(cells: [Cell; N]) -> Self {
        cells.into_iter().collect()
    }
}
