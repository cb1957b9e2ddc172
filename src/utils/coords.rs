use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};

use super::Size;

// ----------------------------------------------
// Cell
// ----------------------------------------------

// X,Y position in the grid of cells. Y grows upwards.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0, y: 0 }
    }

    #[inline]
    pub const fn offset(self, direction: Direction) -> Self {
        Self { x: self.x + direction.dx as i32, y: self.y + direction.dy as i32 }
    }

    #[inline]
    pub fn manhattan_distance(self, other: Cell) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    // Chebyshev distance. 1 for any of the 8 neighbors.
    #[inline]
    pub fn chebyshev_distance(self, other: Cell) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    #[inline]
    pub fn is_adjacent_orthogonal(self, other: Cell) -> bool {
        self.manhattan_distance(other) == 1
    }

    #[inline]
    pub fn is_adjacent(self, other: Cell) -> bool {
        self != other && self.chebyshev_distance(other) == 1
    }
}

impl From<(i32, i32)> for Cell {
    #[inline]
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "[{},{}]", self.x, self.y)
    }
}

// ----------------------------------------------
// Direction
// ----------------------------------------------

// Unit step between two neighboring cells.
// NONE is the incoming direction of a search start node.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Direction {
    pub dx: i8,
    pub dy: i8,
}

impl Direction {
    pub const NONE:  Self = Self::new(0, 0);
    pub const RIGHT: Self = Self::new(1, 0);
    pub const LEFT:  Self = Self::new(-1, 0);
    pub const UP:    Self = Self::new(0, 1);
    pub const DOWN:  Self = Self::new(0, -1);

    pub const UP_RIGHT:   Self = Self::new(1, 1);
    pub const UP_LEFT:    Self = Self::new(-1, 1);
    pub const DOWN_RIGHT: Self = Self::new(1, -1);
    pub const DOWN_LEFT:  Self = Self::new(-1, -1);

    pub const ORTHOGONAL: [Self; 4] = [Self::RIGHT, Self::LEFT, Self::UP, Self::DOWN];
    pub const DIAGONAL:   [Self; 4] = [Self::UP_RIGHT, Self::UP_LEFT, Self::DOWN_RIGHT, Self::DOWN_LEFT];

    #[inline]
    pub const fn new(dx: i8, dy: i8) -> Self {
        Self { dx, dy }
    }

    // Direction of a single step from `from` to `to`. Components are clamped
    // to [-1,1], so this is also the first Bresenham-like step for far cells.
    #[inline]
    pub fn between(from: Cell, to: Cell) -> Self {
        Self {
            dx: (to.x - from.x).signum() as i8,
            dy: (to.y - from.y).signum() as i8,
        }
    }

    #[inline]
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    #[inline]
    pub fn is_diagonal(self) -> bool {
        self.dx != 0 && self.dy != 0
    }

    #[inline]
    pub fn reversed(self) -> Self {
        Self { dx: -self.dx, dy: -self.dy }
    }

    #[inline]
    pub fn is_reverse_of(self, other: Self) -> bool {
        !self.is_none() && self == other.reversed()
    }

    // The two orthogonal components of a diagonal step, i.e. the
    // directions of the flank cells a diagonal move squeezes between.
    #[inline]
    pub fn flanks(self) -> (Self, Self) {
        (Self::new(self.dx, 0), Self::new(0, self.dy))
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({:+},{:+})", self.dx, self.dy)
    }
}

// ----------------------------------------------
// CellRange
// ----------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRange {
    // Inclusive range, e.g.: [start..=end]
    pub start: Cell,
    pub end: Cell,
}

impl CellRange {
    #[inline]
    pub const fn new(start: Cell, end: Cell) -> Self {
        Self { start, end }
    }

    // Range with origin at [0,0] covering `size` cells.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self::with_origin(Cell::zero(), size)
    }

    #[inline]
    pub const fn with_origin(origin: Cell, size: Size) -> Self {
        Self {
            start: origin,
            end: Cell::new(origin.x + size.width - 1, origin.y + size.height - 1),
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.start.x <= self.end.x && self.start.y <= self.end.y
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.end.x - self.start.x + 1
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.end.y - self.start.y + 1
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    // Number of cells covered. Zero for invalid ranges.
    #[inline]
    pub fn count(&self) -> usize {
        if !self.is_valid() {
            return 0;
        }
        (self.width() as usize) * (self.height() as usize)
    }

    #[inline]
    pub fn iter(&self) -> CellRangeIter {
        CellRangeIter::new(*self)
    }

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        if cell.x < self.start.x || cell.y < self.start.y {
            return false;
        }
        if cell.x > self.end.x || cell.y > self.end.y {
            return false;
        }
        true
    }

    // Row-major linear index of `cell` relative to the range origin.
    #[inline]
    pub fn index_of(&self, cell: Cell) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let x = (cell.x - self.start.x) as usize;
        let y = (cell.y - self.start.y) as usize;
        Some(x + y * self.width() as usize)
    }

    // Inverse of index_of().
    #[inline]
    pub fn cell_at(&self, index: usize) -> Option<Cell> {
        if index >= self.count() {
            return None;
        }
        let width = self.width() as usize;
        Some(Cell::new(self.start.x + (index % width) as i32,
                       self.start.y + (index / width) as i32))
    }
}

impl std::fmt::Display for CellRange {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "[{},{}; {},{}]",
               self.start.x,
               self.start.y,
               self.end.x,
               self.end.y)
    }
}

// ----------------------------------------------
// CellRangeIter
// ----------------------------------------------

// Row by row, bottom row first.
#[derive(Copy, Clone)]
pub struct CellRangeIter {
    range:  CellRange,
    curr_y: i32,
    curr_x: i32,
    done:   bool,
}

impl CellRangeIter {
    #[inline]
    pub fn new(range: CellRange) -> Self {
        Self {
            range,
            curr_y: range.start.y,
            curr_x: range.start.x,
            done: !range.is_valid(),
        }
    }
}

impl Iterator for CellRangeIter {
    type Item = Cell;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = Cell::new(self.curr_x, self.curr_y);

        if self.curr_x < self.range.end.x {
            self.curr_x += 1;
        } else if self.curr_y < self.range.end.y {
            self.curr_y += 1;
            self.curr_x = self.range.start.x;
        } else {
            self.done = true;
        }

        Some(result)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl ExactSizeIterator for CellRangeIter {
    #[inline]
    fn len(&self) -> usize {
        if self.done {
            return 0;
        }
        let width = self.range.width() as usize;
        let yielded = (self.curr_y - self.range.start.y) as usize * width
                    + (self.curr_x - self.range.start.x) as usize;
        self.range.count() - yielded
    }
}

// Guarantees next() always stays None after exhaustion.
impl FusedIterator for CellRangeIter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_range_iteration() {
        let range = CellRange::new(Cell::new(-1, 2), Cell::new(1, 3));
        let cells: Vec<Cell> = range.iter().collect();
        assert_eq!(cells.len(), 6);
        assert_eq!(cells[0], Cell::new(-1, 2));
        assert_eq!(cells[2], Cell::new(1, 2));
        assert_eq!(cells[3], Cell::new(-1, 3));
        assert_eq!(*cells.last().unwrap(), Cell::new(1, 3));

        let mut iter = range.iter();
        assert_eq!(iter.len(), 6);
        iter.next();
        iter.next();
        iter.next();
        assert_eq!(iter.len(), 3);
    }

    #[test]
    fn test_cell_range_index_round_trip() {
        let range = CellRange::with_origin(Cell::new(-3, -2), Size::new(4, 5));
        assert_eq!(range.count(), 20);
        for (i, cell) in range.iter().enumerate() {
            assert_eq!(range.index_of(cell), Some(i));
            assert_eq!(range.cell_at(i), Some(cell));
        }
        assert_eq!(range.index_of(Cell::new(1, 0)), None);
        assert_eq!(range.cell_at(20), None);
    }

    #[test]
    fn test_invalid_range_is_empty() {
        let range = CellRange::new(Cell::new(2, 2), Cell::new(1, 1));
        assert!(!range.is_valid());
        assert_eq!(range.count(), 0);
        assert_eq!(range.iter().count(), 0);
    }

    #[test]
    fn test_direction_helpers() {
        assert!(Direction::UP_RIGHT.is_diagonal());
        assert!(!Direction::UP.is_diagonal());
        assert!(Direction::UP.is_reverse_of(Direction::DOWN));
        assert!(!Direction::NONE.is_reverse_of(Direction::NONE));
        assert_eq!(Direction::DOWN_LEFT.flanks(), (Direction::LEFT, Direction::DOWN));
        assert_eq!(Direction::between(Cell::new(0, 0), Cell::new(5, -2)), Direction::DOWN_RIGHT);
        assert_eq!(Cell::new(2, 2).offset(Direction::UP_LEFT), Cell::new(1, 3));
    }
}
