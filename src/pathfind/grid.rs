use std::ops::{Index, IndexMut};

use super::error::PathError;
use crate::{
    bitflags_with_display,
    utils::{
        Size,
        Vec2,
        coords::{Cell, CellRange},
    },
};

// ----------------------------------------------
// GridProvider
// ----------------------------------------------

// What the search needs to know about the world. The search never owns
// or mutates grid data, it only queries it through this interface.
pub trait GridProvider {
    // Inclusive range of cells making up the grid.
    fn bounds(&self) -> CellRange;

    #[inline]
    fn cell_exists(&self, cell: Cell) -> bool {
        self.bounds().contains(cell)
    }

    // Current walkability, static walls plus any permanently blocking
    // objects. Must be false for cells outside the bounds.
    // Per-agent exclusions are layered on top via ForbiddenSet.
    fn is_walkable(&self, cell: Cell) -> bool;

    // Boundary helpers, not used inside the search loop.
    // Default mapping is one world unit per cell, with cell [x,y]
    // covering [x, x+1) * [y, y+1).
    #[inline]
    fn world_to_cell(&self, pos: Vec2) -> Cell {
        Cell::new(pos.x.floor() as i32, pos.y.floor() as i32)
    }

    // Center of the cell in world space.
    #[inline]
    fn cell_to_world(&self, cell: Cell) -> Vec2 {
        Vec2::new(cell.x as f32 + 0.5, cell.y as f32 + 0.5)
    }
}

// ----------------------------------------------
// Grid
// ----------------------------------------------

// 2D grid of cells covering a CellRange. For each cell stores a generic
// payload. Grid can be indexed with `grid[cell]`.
#[derive(Clone, Debug)]
pub struct Grid<T> {
    bounds: CellRange,
    nodes: Vec<T>, // WxH nodes, row-major.
}

impl<T> Grid<T> {
    #[inline]
    pub fn new(bounds: CellRange, nodes: Vec<T>) -> Self {
        debug_assert!(nodes.len() == bounds.count());
        Self { bounds, nodes }
    }

    #[inline]
    pub fn filled(bounds: CellRange, value: T) -> Self where T: Clone {
        Self { bounds, nodes: vec![value; bounds.count()] }
    }

    #[inline]
    pub fn bounds(&self) -> CellRange {
        self.bounds
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn index_of(&self, cell: Cell) -> Option<usize> {
        self.bounds.index_of(cell)
    }

    #[inline]
    pub fn get(&self, cell: Cell) -> Option<&T> {
        self.index_of(cell).map(|index| &self.nodes[index])
    }

    #[inline]
    pub fn get_mut(&mut self, cell: Cell) -> Option<&mut T> {
        self.index_of(cell).map(|index| &mut self.nodes[index])
    }

    #[inline]
    pub fn at_index(&self, index: usize) -> &T {
        &self.nodes[index]
    }

    #[inline]
    pub fn at_index_mut(&mut self, index: usize) -> &mut T {
        &mut self.nodes[index]
    }

    #[inline]
    pub fn fill(&mut self, value: T) where T: Clone {
        self.nodes.fill(value);
    }
}

// Immutable indexing
impl<T> Index<Cell> for Grid<T> {
    type Output = T;

    #[inline]
    fn index(&self, cell: Cell) -> &Self::Output {
        self.get(cell).unwrap_or_else(|| panic!("Unexpected invalid grid cell: {cell}"))
    }
}

// Mutable indexing
impl<T> IndexMut<Cell> for Grid<T> {
    #[inline]
    fn index_mut(&mut self, cell: Cell) -> &mut Self::Output {
        self.get_mut(cell).unwrap_or_else(|| panic!("Unexpected invalid grid cell: {cell}"))
    }
}

// ----------------------------------------------
// CellFlags
// ----------------------------------------------

bitflags_with_display! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct CellFlags: u8 {
        // Static wall, baked when the map is built.
        const Wall    = 1 << 0;
        // Object placed at runtime that blocks the cell until removed.
        const Blocked = 1 << 1;
    }
}

// ----------------------------------------------
// WalkableGrid
// ----------------------------------------------

// Minimal in-memory GridProvider: static walls, runtime blockers and
// transient occupant counts per cell. A cell is walkable when it has no
// flags set and no occupants.
#[derive(Clone, Debug)]
pub struct WalkableGrid {
    flags: Grid<CellFlags>,
    occupants: Grid<u16>,
    world_origin: Vec2,
    cell_size: f32,
}

impl WalkableGrid {
    pub fn new(bounds: CellRange) -> Self {
        Self {
            flags: Grid::filled(bounds, CellFlags::empty()),
            occupants: Grid::filled(bounds, 0),
            world_origin: Vec2::zero(),
            cell_size: 1.0,
        }
    }

    #[inline]
    pub fn with_size(size: Size) -> Self {
        Self::new(CellRange::from_size(size))
    }

    pub fn with_walls(bounds: CellRange, walls: impl IntoIterator<Item = Cell>) -> Self {
        let mut grid = Self::new(bounds);
        for cell in walls {
            grid.set_wall(cell, true);
        }
        grid
    }

    // Builds a grid from rows of text, top row first:
    //  '.' floor, '#' wall, 'B' blocked.
    // Y grows upwards, so the last row is y=0.
    pub fn from_ascii(rows: &[&str]) -> Result<Self, PathError> {
        let height = rows.len();
        let width = rows.first().map(|row| row.chars().count()).unwrap_or(0);

        if width == 0 || height == 0 {
            return Err(PathError::InvalidConfiguration("ascii grid is empty".into()));
        }

        let mut grid = Self::with_size(Size::new(width as i32, height as i32));

        for (row_index, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(PathError::InvalidConfiguration(
                    format!("ascii grid row {row_index} has {} cells, expected {width}", row.chars().count())));
            }

            let y = (height - 1 - row_index) as i32;
            for (x, ch) in row.chars().enumerate() {
                let cell = Cell::new(x as i32, y);
                match ch {
                    '.' => {},
                    '#' => grid.set_wall(cell, true),
                    'B' => grid.set_blocked(cell, true),
                    _ => {
                        return Err(PathError::InvalidConfiguration(
                            format!("unexpected character '{ch}' at {cell} in ascii grid")));
                    }
                }
            }
        }

        Ok(grid)
    }

    // World position of the bottom-left corner of the bounds start cell
    // and the world size of a cell.
    pub fn with_world_transform(mut self, world_origin: Vec2, cell_size: f32) -> Self {
        debug_assert!(cell_size > 0.0);
        self.world_origin = world_origin;
        self.cell_size = cell_size;
        self
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.flags.bounds().size()
    }

    #[inline]
    pub fn flags(&self, cell: Cell) -> Option<CellFlags> {
        self.flags.get(cell).copied()
    }

    #[inline]
    pub fn occupants(&self, cell: Cell) -> u16 {
        self.occupants.get(cell).copied().unwrap_or(0)
    }

    #[inline]
    pub fn set_wall(&mut self, cell: Cell, wall: bool) {
        if let Some(flags) = self.flags.get_mut(cell) {
            flags.set(CellFlags::Wall, wall);
        }
    }

    #[inline]
    pub fn set_blocked(&mut self, cell: Cell, blocked: bool) {
        if let Some(flags) = self.flags.get_mut(cell) {
            flags.set(CellFlags::Blocked, blocked);
        }
    }

    // Several transient objects can share a cell. The cell is walkable
    // again only once the last one is removed.
    #[inline]
    pub fn add_occupant(&mut self, cell: Cell) {
        if let Some(count) = self.occupants.get_mut(cell) {
            *count = count.saturating_add(1);
        }
    }

    #[inline]
    pub fn remove_occupant(&mut self, cell: Cell) {
        if let Some(count) = self.occupants.get_mut(cell) {
            debug_assert!(*count > 0, "Removing occupant from empty cell {cell}");
            *count = count.saturating_sub(1);
        }
    }

    // Removes all runtime blockers and occupants, keeping static walls.
    pub fn clear_dynamic(&mut self) {
        for index in 0..self.flags.len() {
            self.flags.at_index_mut(index).remove(CellFlags::Blocked);
        }
        self.occupants.fill(0);
    }

    pub fn walkable_count(&self) -> usize {
        self.flags.bounds().iter().filter(|cell| self.is_walkable(*cell)).count()
    }
}

impl GridProvider for WalkableGrid {
    #[inline]
    fn bounds(&self) -> CellRange {
        self.flags.bounds()
    }

    #[inline]
    fn is_walkable(&self, cell: Cell) -> bool {
        match self.flags.index_of(cell) {
            Some(index) => self.flags.at_index(index).is_empty() && *self.occupants.at_index(index) == 0,
            None => false,
        }
    }

    #[inline]
    fn world_to_cell(&self, pos: Vec2) -> Cell {
        let local = (pos - self.world_origin) * (1.0 / self.cell_size);
        let start = self.bounds().start;
        Cell::new(start.x + local.x.floor() as i32, start.y + local.y.floor() as i32)
    }

    #[inline]
    fn cell_to_world(&self, cell: Cell) -> Vec2 {
        let start = self.bounds().start;
        let local = Vec2::new((cell.x - start.x) as f32 + 0.5, (cell.y - start.y) as f32 + 0.5);
        self.world_origin + local * self.cell_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ascii_orientation() {
        let grid = WalkableGrid::from_ascii(&[
            "#..",
            ".B.",
            "..#",
        ]).unwrap();

        assert_eq!(grid.size(), Size::new(3, 3));
        // Top-left character is the highest row.
        assert_eq!(grid.flags(Cell::new(0, 2)), Some(CellFlags::Wall));
        assert_eq!(grid.flags(Cell::new(2, 0)), Some(CellFlags::Wall));
        assert_eq!(grid.flags(Cell::new(1, 1)), Some(CellFlags::Blocked));
        assert!(grid.is_walkable(Cell::new(0, 0)));
        assert!(!grid.is_walkable(Cell::new(1, 1)));
        assert!(!grid.is_walkable(Cell::new(3, 0)));
        assert_eq!(grid.walkable_count(), 6);
    }

    #[test]
    fn test_grid_indexing() {
        let bounds = CellRange::with_origin(Cell::new(-1, 0), Size::new(3, 2));
        let mut grid = Grid::filled(bounds, 0_u32);
        grid[Cell::new(-1, 0)] = 7;
        grid[Cell::new(1, 1)] = 9;

        assert_eq!(grid.len(), 6);
        assert_eq!(grid[Cell::new(-1, 0)], 7);
        assert_eq!(*grid.at_index(5), 9);
        assert!(grid.get(Cell::new(2, 0)).is_none());
    }

    #[test]
    fn test_from_ascii_rejects_malformed() {
        assert!(WalkableGrid::from_ascii(&[]).is_err());
        assert!(WalkableGrid::from_ascii(&["...", ".."]).is_err());
        assert!(WalkableGrid::from_ascii(&["..x"]).is_err());
    }

    #[test]
    fn test_dynamic_blockers() {
        let mut grid = WalkableGrid::with_size(Size::new(4, 4));
        let cell = Cell::new(2, 1);

        grid.add_occupant(cell);
        grid.add_occupant(cell);
        assert!(!grid.is_walkable(cell));
        grid.remove_occupant(cell);
        assert!(!grid.is_walkable(cell));
        grid.remove_occupant(cell);
        assert!(grid.is_walkable(cell));

        grid.set_wall(Cell::new(0, 0), true);
        grid.set_blocked(Cell::new(1, 0), true);
        grid.add_occupant(Cell::new(3, 3));
        grid.clear_dynamic();
        assert!(!grid.is_walkable(Cell::new(0, 0)));
        assert!(grid.is_walkable(Cell::new(1, 0)));
        assert!(grid.is_walkable(Cell::new(3, 3)));
    }

    #[test]
    fn test_world_cell_conversion() {
        let bounds = CellRange::with_origin(Cell::new(-2, -2), Size::new(4, 4));
        let grid = WalkableGrid::new(bounds).with_world_transform(Vec2::new(10.0, 20.0), 0.5);

        assert_eq!(grid.world_to_cell(Vec2::new(10.0, 20.0)), Cell::new(-2, -2));
        assert_eq!(grid.world_to_cell(Vec2::new(10.74, 20.26)), Cell::new(-1, -2));
        assert_eq!(grid.cell_to_world(Cell::new(-2, -2)), Vec2::new(10.25, 20.25));

        for cell in bounds.iter() {
            assert_eq!(grid.world_to_cell(grid.cell_to_world(cell)), cell);
        }
    }

    #[test]
    fn test_default_world_mapping() {
        struct OpenGrid;
        impl GridProvider for OpenGrid {
            fn bounds(&self) -> CellRange { CellRange::from_size(Size::new(2, 2)) }
            fn is_walkable(&self, cell: Cell) -> bool { self.cell_exists(cell) }
        }

        let grid = OpenGrid;
        assert_eq!(grid.world_to_cell(Vec2::new(1.9, 0.1)), Cell::new(1, 0));
        assert_eq!(grid.world_to_cell(Vec2::new(-0.1, 0.0)), Cell::new(-1, 0));
        assert_eq!(grid.cell_to_world(Cell::new(1, 1)), Vec2::new(1.5, 1.5));
        assert!(!grid.cell_exists(Cell::new(2, 0)));
    }
}
