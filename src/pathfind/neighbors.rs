use arrayvec::ArrayVec;

use super::{
    context::ClosedSet,
    cost::{CostModel, NodeCost},
    forbidden::ForbiddenSet,
    grid::GridProvider,
};
use crate::utils::coords::{Cell, Direction};

// ----------------------------------------------
// CellFilter
// ----------------------------------------------

// Grid walkability merged with the per-request ForbiddenSet.
// Shared by neighbor expansion and line-of-sight tests so that both
// agree on which cells and diagonal moves are traversable.
pub struct CellFilter<'a, G: GridProvider + ?Sized> {
    grid: &'a G,
    forbidden: &'a ForbiddenSet,
}

impl<'a, G: GridProvider + ?Sized> CellFilter<'a, G> {
    #[inline]
    pub fn new(grid: &'a G, forbidden: &'a ForbiddenSet) -> Self {
        Self { grid, forbidden }
    }

    #[inline]
    pub fn is_passable(&self, cell: Cell) -> bool {
        self.grid.cell_exists(cell) && self.grid.is_walkable(cell) && !self.forbidden.contains(cell)
    }

    // Corner rule for a diagonal step out of `from`. The two flanks are the
    // orthogonal cells sharing an edge with both `from` and the destination.
    //  strict:  both flanks must be passable.
    //  lenient: rejected only when both flanks are blocked.
    #[inline]
    pub fn can_move_diagonally(&self, from: Cell, step: Direction, prevent_corner_cutting: bool) -> bool {
        debug_assert!(step.is_diagonal());

        let (horizontal, vertical) = step.flanks();
        let horizontal_open = self.is_passable(from.offset(horizontal));
        let vertical_open = self.is_passable(from.offset(vertical));

        if prevent_corner_cutting {
            horizontal_open && vertical_open
        } else {
            horizontal_open || vertical_open
        }
    }

    // Whether a single step `from` -> `from + step` is allowed, ignoring
    // whether the destination itself is passable.
    #[inline]
    pub fn can_step(&self, from: Cell, step: Direction, prevent_corner_cutting: bool) -> bool {
        !step.is_diagonal() || self.can_move_diagonally(from, step, prevent_corner_cutting)
    }
}

// ----------------------------------------------
// Neighbor
// ----------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Neighbor {
    pub cell: Cell,
    pub step: Direction,
    // Edge cost, including any turn penalty.
    pub cost: NodeCost,
}

pub type Neighbors = ArrayVec<Neighbor, 8>;

// ----------------------------------------------
// NeighborExpander
// ----------------------------------------------

pub struct NeighborExpander<'a, G: GridProvider + ?Sized> {
    filter: CellFilter<'a, G>,
    costs: &'a CostModel,
    allow_diagonal: bool,
    prevent_corner_cutting: bool,
}

impl<'a, G: GridProvider + ?Sized> NeighborExpander<'a, G> {
    pub fn new(filter: CellFilter<'a, G>,
               costs: &'a CostModel,
               allow_diagonal: bool,
               prevent_corner_cutting: bool) -> Self {
        Self { filter, costs, allow_diagonal, prevent_corner_cutting }
    }

    // Candidate successors of `current`, entered from `incoming`.
    // Only cells that exist, are walkable, not forbidden, not yet closed
    // and reachable under the corner rule are returned.
    pub fn expand(&self, current: Cell, incoming: Direction, closed: &ClosedSet) -> Neighbors {
        let mut neighbors = Neighbors::new();

        let diagonals: &[Direction] = if self.allow_diagonal { &Direction::DIAGONAL } else { &[] };

        for &step in Direction::ORTHOGONAL.iter().chain(diagonals) {
            let cell = current.offset(step);

            if closed.contains(cell) || !self.filter.is_passable(cell) {
                continue;
            }

            if !self.filter.can_step(current, step, self.prevent_corner_cutting) {
                continue;
            }

            neighbors.push(Neighbor {
                cell,
                step,
                cost: self.costs.edge_cost(incoming, step),
            });
        }

        neighbors
    }
}
