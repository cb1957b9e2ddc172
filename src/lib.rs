// Grid pathfinding for agents moving through a tile world whose
// walkability changes at runtime.

pub mod log;
pub mod pathfind;
pub mod utils;

pub use pathfind::{
    ForbiddenSet,
    GridProvider,
    Path,
    PathError,
    Search,
    SearchOptions,
    SearchPool,
    WalkableGrid,
    find_path,
    path_cost,
};
pub use utils::coords::{Cell, CellRange, Direction};
