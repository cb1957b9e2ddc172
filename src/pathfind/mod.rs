// A* pathfinding over 2D grids with dynamic obstacles.
//
// Useful references and reading material:
//  https://www.redblobgames.com/pathfinding/a-star/introduction.html
//  https://www.redblobgames.com/pathfinding/a-star/implementation.html
//  https://www.redblobgames.com/pathfinding/grids/algorithms.html
//  https://en.wikipedia.org/wiki/Bresenham%27s_line_algorithm

pub mod config;
pub mod context;
pub mod cost;
pub mod error;
pub mod forbidden;
pub mod frontier;
pub mod grid;
pub mod neighbors;
pub mod pool;
pub mod search;
pub mod smoothing;


pub use config::{Configs, SearchConfigs, SearchOptions};
pub use cost::{CostModel, DijkstraHeuristic, GridHeuristic, Heuristic, NodeCost, TurnPenalty, NODE_COST_INFINITE};
pub use error::{PathError, PathErrorKind};
pub use forbidden::ForbiddenSet;
pub use grid::{CellFlags, Grid, GridProvider, WalkableGrid};
pub use pool::{PooledSearch, SearchPool};
pub use search::{Path, Search, SearchState, find_path, path_cost};
pub use smoothing::PathSmoother;
