use bitvec::vec::BitVec;

use super::{
    cost::{NodeCost, NODE_COST_INFINITE, NODE_COST_ZERO},
    error::PathError,
    grid::Grid,
};
use crate::utils::coords::{Cell, CellRange, Direction};

// ----------------------------------------------
// SearchNode
// ----------------------------------------------

// Search state of one cell for the duration of one search.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SearchNode {
    pub cell: Cell,

    // Best known cost from the start. Infinite until first reached.
    pub g_cost: NodeCost,

    // Estimated cost to the goal, computed when the node is reached.
    pub h_cost: NodeCost,

    // Predecessor on the best known path. None for the start node.
    pub parent: Option<Cell>,

    // Direction of the move into this node, for turn penalties.
    pub incoming: Direction,
}

impl SearchNode {
    #[inline]
    pub const fn unvisited(cell: Cell) -> Self {
        Self {
            cell,
            g_cost: NODE_COST_INFINITE,
            h_cost: NODE_COST_ZERO,
            parent: None,
            incoming: Direction::NONE,
        }
    }

    #[inline]
    pub fn f_cost(&self) -> NodeCost {
        self.g_cost + self.h_cost
    }

    #[inline]
    pub fn is_visited(&self) -> bool {
        self.g_cost != NODE_COST_INFINITE
    }
}

// ----------------------------------------------
// NodeContext
// ----------------------------------------------

// Arena of SearchNodes covering the whole grid, owned by a Search and
// reused across calls. Only nodes touched by the previous search are
// reset, so preparing a new search costs O(touched), not O(grid).
pub struct NodeContext {
    nodes: Grid<SearchNode>,
    touched: Vec<usize>,
}

impl NodeContext {
    pub fn new() -> Self {
        Self {
            nodes: Grid::new(CellRange::new(Cell::zero(), Cell::new(-1, -1)), Vec::new()),
            touched: Vec::new(),
        }
    }

    // Must be called before every search. Restores every node to its
    // unvisited state, re-covering the grid if its bounds changed.
    pub fn prepare(&mut self, bounds: CellRange) {
        if self.nodes.bounds() != bounds {
            self.nodes = Grid::new(bounds, bounds.iter().map(SearchNode::unvisited).collect());
            self.touched.clear();
            return;
        }

        for &index in &self.touched {
            let node = self.nodes.at_index_mut(index);
            *node = SearchNode::unvisited(node.cell);
        }
        self.touched.clear();
    }

    #[inline]
    pub fn bounds(&self) -> CellRange {
        self.nodes.bounds()
    }

    #[inline]
    pub fn node(&self, cell: Cell) -> Option<&SearchNode> {
        self.nodes.get(cell)
    }

    #[inline]
    pub fn g_cost(&self, cell: Cell) -> NodeCost {
        self.nodes.get(cell).map_or(NODE_COST_INFINITE, |node| node.g_cost)
    }

    // Number of nodes reached by the current search.
    #[inline]
    pub fn touched_count(&self) -> usize {
        self.touched.len()
    }

    // Records a new best path into `cell`.
    pub fn update(&mut self, cell: Cell, g_cost: NodeCost, h_cost: NodeCost, parent: Option<Cell>, incoming: Direction) {
        let Some(index) = self.nodes.index_of(cell) else {
            debug_assert!(false, "Updating node outside of the search grid: {cell}");
            return;
        };

        let node = self.nodes.at_index_mut(index);
        debug_assert!(g_cost < node.g_cost, "Node {cell} updated without cost improvement!");

        if !node.is_visited() {
            self.touched.push(index);
        }

        node.g_cost = g_cost;
        node.h_cost = h_cost;
        node.parent = parent;
        node.incoming = incoming;
    }

    // Follows parent links from `goal` back to the parentless start node,
    // filling `cells` and `costs` in start -> goal order.
    pub fn reconstruct_path(&self, goal: Cell, cells: &mut Vec<Cell>, costs: &mut Vec<NodeCost>) -> Result<(), PathError> {
        cells.clear();
        costs.clear();

        let max_steps = self.nodes.len();
        let mut current = goal;

        loop {
            let node = match self.nodes.get(current) {
                Some(node) if node.is_visited() => node,
                _ => {
                    return Err(PathError::InvalidConfiguration(
                        format!("Path reconstruction reached unvisited node {current}")));
                }
            };

            cells.push(current);
            costs.push(node.g_cost);

            match node.parent {
                Some(parent) => current = parent,
                None => break,
            }

            // Parent links form a tree, so a chain longer than the grid
            // can only be corruption.
            if cells.len() > max_steps {
                return Err(PathError::InvalidConfiguration(
                    format!("Parent chain from {goal} exceeds grid cell count ({max_steps})")));
            }
        }

        cells.reverse();
        costs.reverse();
        Ok(())
    }
}

impl Default for NodeContext {
    fn default() -> Self {
        Self::new()
    }
}

// ----------------------------------------------
// ClosedSet
// ----------------------------------------------

// One bit per grid cell, set once the cell's cost is final.
pub struct ClosedSet {
    bounds: CellRange,
    bits: BitVec,
    count: usize,
}

impl ClosedSet {
    pub fn new() -> Self {
        Self {
            bounds: CellRange::new(Cell::zero(), Cell::new(-1, -1)),
            bits: BitVec::new(),
            count: 0,
        }
    }

    pub fn prepare(&mut self, bounds: CellRange) {
        if self.bounds != bounds {
            self.bounds = bounds;
            self.bits.clear();
            self.bits.resize(bounds.count(), false);
        } else if self.count != 0 {
            self.bits.fill(false);
        }
        self.count = 0;
    }

    // Returns false if the cell was already closed or is outside the grid.
    #[inline]
    pub fn insert(&mut self, cell: Cell) -> bool {
        match self.bounds.index_of(cell) {
            Some(index) if !self.bits[index] => {
                self.bits.set(index, true);
                self.count += 1;
                true
            },
            _ => false,
        }
    }

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        self.bounds.index_of(cell).is_some_and(|index| self.bits[index])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl Default for ClosedSet {
    fn default() -> Self {
        Self::new()
    }
}
