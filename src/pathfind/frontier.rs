use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use priority_queue::PriorityQueue;

use super::cost::NodeCost;
use crate::utils::coords::Cell;

// ----------------------------------------------
// FrontierPriority
// ----------------------------------------------

// (f cost, h cost). Lexicographic order, so nodes with equal total cost
// are ordered by their distance estimate to the goal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrontierPriority {
    pub f_cost: OrderedFloat<NodeCost>,
    pub h_cost: OrderedFloat<NodeCost>,
}

impl FrontierPriority {
    #[inline]
    pub fn new(f_cost: NodeCost, h_cost: NodeCost) -> Self {
        Self { f_cost: OrderedFloat(f_cost), h_cost: OrderedFloat(h_cost) }
    }
}

// ----------------------------------------------
// PriorityFrontier
// ----------------------------------------------

// Open set of the search. A binary heap plus a cell -> heap position
// index, so membership tests are O(1) and priority updates O(log n).
pub struct PriorityFrontier {
    // PriorityQueue sorts highest priority first by default,
    // but we want nodes with smallest cost first, so reverse
    // the cost order.
    queue: PriorityQueue<Cell, Reverse<FrontierPriority>>,
}

impl PriorityFrontier {
    #[inline]
    pub fn new() -> Self {
        Self { queue: PriorityQueue::new() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        self.queue.get_priority(&cell).is_some()
    }

    #[inline]
    pub fn priority(&self, cell: Cell) -> Option<FrontierPriority> {
        self.queue.get_priority(&cell).map(|Reverse(priority)| *priority)
    }

    // Inserts `cell`, or moves it to its new position in the heap if it was
    // already queued (sifting up or down as needed).
    #[inline]
    pub fn push(&mut self, cell: Cell, priority: FrontierPriority) {
        self.queue.push(cell, Reverse(priority));
    }

    // Lowers the priority of a queued cell. Returns false if the cell is
    // not queued or the new priority is not lower than the current one.
    pub fn decrease_priority(&mut self, cell: Cell, priority: FrontierPriority) -> bool {
        match self.priority(cell) {
            Some(current) if priority < current => {
                self.queue.change_priority(&cell, Reverse(priority));
                true
            },
            _ => false,
        }
    }

    // Removes and returns the cell with the lowest (f, h).
    #[inline]
    pub fn pop_min(&mut self) -> Option<(Cell, FrontierPriority)> {
        self.queue.pop().map(|(cell, Reverse(priority))| (cell, priority))
    }

    #[inline]
    pub fn peek_min(&self) -> Option<(Cell, FrontierPriority)> {
        self.queue.peek().map(|(cell, Reverse(priority))| (*cell, *priority))
    }
}

impl Default for PriorityFrontier {
    fn default() -> Self {
        Self::new()
    }
}
