use strum::Display;

use super::{
    config::SearchOptions,
    context::{ClosedSet, NodeContext},
    cost::{Heuristic, NodeCost, NODE_COST_INFINITE, NODE_COST_ZERO},
    error::{PathError, PathErrorKind},
    forbidden::ForbiddenSet,
    frontier::{FrontierPriority, PriorityFrontier},
    grid::GridProvider,
    neighbors::{CellFilter, NeighborExpander},
    smoothing::PathSmoother,
};
use crate::{
    log,
    utils::{Vec2, coords::{Cell, Direction}},
};

// ----------------------------------------------
// Path
// ----------------------------------------------

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    // Raw cells visited by the search, start to goal inclusive.
    pub cells: Vec<Cell>,

    // Cost from start of each raw cell. Non-decreasing.
    pub costs: Vec<NodeCost>,

    // Smoothed subsequence of `cells` the agent should steer through.
    pub waypoints: Vec<Cell>,

    // Total cost to reach the goal.
    pub cost: NodeCost,

    // Number of nodes closed by the search.
    pub nodes_expanded: usize,
}

impl Path {
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn start(&self) -> Option<Cell> {
        self.cells.first().copied()
    }

    #[inline]
    pub fn goal(&self) -> Option<Cell> {
        self.cells.last().copied()
    }

    // Waypoints mapped to world space (cell centers).
    pub fn world_waypoints<G>(&self, grid: &G) -> Vec<Vec2>
        where G: GridProvider + ?Sized
    {
        self.waypoints.iter().map(|cell| grid.cell_to_world(*cell)).collect()
    }

    fn clear(&mut self) {
        self.cells.clear();
        self.costs.clear();
        self.waypoints.clear();
        self.cost = NODE_COST_ZERO;
        self.nodes_expanded = 0;
    }
}

// ----------------------------------------------
// SearchState
// ----------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Eq, Display)]
pub enum SearchState {
    Idle,
    Running,
    Succeeded,
    Failed,
}

// ----------------------------------------------
// Search
// ----------------------------------------------

// A* search over a GridProvider. Owns all per-search scratch memory,
// which is reused by subsequent calls. Searches never share mutable
// state, so independent Search instances can run on different threads.
pub struct Search {
    context: NodeContext,
    frontier: PriorityFrontier,
    closed: ClosedSet,
    path: Path,
    state: SearchState,
}

impl Search {
    pub fn new() -> Self {
        Self {
            context: NodeContext::new(),
            frontier: PriorityFrontier::new(),
            closed: ClosedSet::new(),
            path: Path::default(),
            state: SearchState::Idle,
        }
    }

    // Outcome of the last call. Idle until the first search.
    #[inline]
    pub fn state(&self) -> SearchState {
        self.state
    }

    // Path found by the last call, if it succeeded.
    #[inline]
    pub fn last_path(&self) -> Option<&Path> {
        if self.state == SearchState::Succeeded { Some(&self.path) } else { None }
    }

    #[must_use]
    pub fn find_path<G>(&mut self,
                        grid: &G,
                        start: Cell,
                        goal: Cell,
                        options: &SearchOptions,
                        forbidden: &ForbiddenSet) -> Result<&Path, PathError>
        where G: GridProvider + ?Sized
    {
        let heuristic = options.heuristic();
        self.find_path_with(grid, &heuristic, start, goal, options, forbidden)
    }

    // Same as find_path() but with a caller supplied heuristic. Edge costs
    // still come from `options.costs`. The heuristic must be admissible for
    // the returned path to be optimal, and even then optimality only holds
    // without turn penalties: nodes are closed per cell, not per incoming
    // direction, so penalized costs are a close approximation.
    #[must_use]
    pub fn find_path_with<G, H>(&mut self,
                                grid: &G,
                                heuristic: &H,
                                start: Cell,
                                goal: Cell,
                                options: &SearchOptions,
                                forbidden: &ForbiddenSet) -> Result<&Path, PathError>
        where G: GridProvider + ?Sized,
              H: Heuristic + ?Sized
    {
        self.path.clear();

        match self.run(grid, heuristic, start, goal, options, forbidden) {
            Ok(()) => {
                self.state = SearchState::Succeeded;
                log::verbose!(log::channel!("pathfind"),
                              "Path {start} -> {goal}: {} cells, {} waypoints, cost {:.2}, {} nodes expanded.",
                              self.path.cells.len(),
                              self.path.waypoints.len(),
                              self.path.cost,
                              self.path.nodes_expanded);
                Ok(&self.path)
            },
            Err(err) => {
                self.state = SearchState::Failed;
                self.path.clear();
                match err.kind() {
                    PathErrorKind::InvalidConfiguration => log::error!(log::channel!("pathfind"), "{err}"),
                    // Expected outcomes, callers decide whether they matter.
                    _ => log::verbose!(log::channel!("pathfind"), "{err}"),
                }
                Err(err)
            }
        }
    }

    // Total cost of the path find_path() returns, or infinity if there is
    // no path or the request is invalid. Approximate when turn penalties
    // are enabled.
    pub fn path_cost<G>(&mut self,
                        grid: &G,
                        start: Cell,
                        goal: Cell,
                        options: &SearchOptions,
                        forbidden: &ForbiddenSet) -> NodeCost
        where G: GridProvider + ?Sized
    {
        match self.find_path(grid, start, goal, options, forbidden) {
            Ok(path) => path.cost,
            Err(_) => NODE_COST_INFINITE,
        }
    }

    fn run<G, H>(&mut self,
                 grid: &G,
                 heuristic: &H,
                 start: Cell,
                 goal: Cell,
                 options: &SearchOptions,
                 forbidden: &ForbiddenSet) -> Result<(), PathError>
        where G: GridProvider + ?Sized,
              H: Heuristic + ?Sized
    {
        options.validate()?;

        let bounds = grid.bounds();
        if !bounds.is_valid() {
            return Err(PathError::InvalidConfiguration(format!("grid bounds {bounds:?} are empty")));
        }

        for cell in [start, goal] {
            if !grid.cell_exists(cell) {
                return Err(PathError::OutOfBounds { cell });
            }
        }

        let filter = CellFilter::new(grid, forbidden);

        if !filter.is_passable(start) {
            return Err(PathError::StartBlocked { cell: start });
        }

        // Not an error up front, the caller may be pathing towards an
        // occupied cell. The goal never passes the neighbor filter, so
        // the search exhausts the reachable region and fails with NoPath.
        if !filter.is_passable(goal) {
            log::verbose!(log::channel!("pathfind"), "Goal cell {goal} is blocked or forbidden.");
        }

        self.state = SearchState::Running;
        self.context.prepare(bounds);
        self.closed.prepare(bounds);
        self.frontier.clear();

        let expander = NeighborExpander::new(filter,
                                             &options.costs,
                                             options.allow_diagonal,
                                             options.prevent_corner_cutting);

        let start_h = heuristic.estimate_cost_to_goal(start, goal);
        self.context.update(start, NODE_COST_ZERO, start_h, None, Direction::NONE);
        self.frontier.push(start, FrontierPriority::new(start_h, start_h));

        let max_expansions = bounds.count();
        let mut nodes_expanded = 0;

        while let Some((current, _)) = self.frontier.pop_min() {
            // The frontier is indexed, so a cell is never queued twice.
            if !self.closed.insert(current) {
                debug_assert!(false, "Cell {current} popped after being closed!");
                continue;
            }

            nodes_expanded += 1;
            debug_assert!(nodes_expanded <= max_expansions, "Search expanded more nodes than the grid has!");

            if current == goal {
                self.context.reconstruct_path(goal, &mut self.path.cells, &mut self.path.costs)?;
                self.path.cost = self.context.g_cost(goal);
                self.path.nodes_expanded = nodes_expanded;

                if options.smooth_path {
                    PathSmoother::new(grid, forbidden, options.prevent_corner_cutting)
                        .smooth_into(&self.path.cells, &mut self.path.waypoints);
                } else {
                    self.path.waypoints.extend_from_slice(&self.path.cells);
                }

                return Ok(());
            }

            let Some(&node) = self.context.node(current) else {
                return Err(PathError::InvalidConfiguration(format!("Frontier cell {current} has no search node")));
            };

            for neighbor in expander.expand(current, node.incoming, &self.closed) {
                let tentative_g = node.g_cost + neighbor.cost;

                // Strict improvement only. Equal cost paths keep the first parent found.
                if tentative_g < self.context.g_cost(neighbor.cell) {
                    let h = heuristic.estimate_cost_to_goal(neighbor.cell, goal);
                    self.context.update(neighbor.cell, tentative_g, h, Some(current), neighbor.step);
                    self.frontier.push(neighbor.cell, FrontierPriority::new(tentative_g + h, h));
                }
            }
        }

        Err(PathError::NoPath { start, goal })
    }
}

impl Default for Search {
    fn default() -> Self {
        Self::new()
    }
}

// ----------------------------------------------
// Free functions
// ----------------------------------------------

// One-shot search with a fresh Search. Prefer reusing a Search or a
// SearchPool when issuing many requests.
#[must_use]
pub fn find_path<G>(grid: &G,
                    start: Cell,
                    goal: Cell,
                    options: &SearchOptions,
                    forbidden: &ForbiddenSet) -> Result<Path, PathError>
    where G: GridProvider + ?Sized
{
    Search::new().find_path(grid, start, goal, options, forbidden).cloned()
}

pub fn path_cost<G>(grid: &G,
                    start: Cell,
                    goal: Cell,
                    options: &SearchOptions,
                    forbidden: &ForbiddenSet) -> NodeCost
    where G: GridProvider + ?Sized
{
    Search::new().path_cost(grid, start, goal, options, forbidden)
}
