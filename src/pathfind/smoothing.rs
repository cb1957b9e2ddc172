use super::{
    forbidden::ForbiddenSet,
    grid::GridProvider,
    neighbors::CellFilter,
};
use crate::utils::coords::{Cell, Direction};

// ----------------------------------------------
// BresenhamLine
// ----------------------------------------------

// Cells rasterized by Bresenham's line algorithm from `start` to `end`,
// both included. Consecutive cells are always 8-adjacent.
#[derive(Clone)]
pub struct BresenhamLine {
    current: Cell,
    end: Cell,
    dx: i32,
    dy: i32,
    step_x: i32,
    step_y: i32,
    error: i32,
    done: bool,
}

impl BresenhamLine {
    pub fn new(start: Cell, end: Cell) -> Self {
        let dx = (end.x - start.x).abs();
        let dy = -(end.y - start.y).abs();
        Self {
            current: start,
            end,
            dx,
            dy,
            step_x: if start.x < end.x { 1 } else { -1 },
            step_y: if start.y < end.y { 1 } else { -1 },
            error: dx + dy,
            done: false,
        }
    }
}

impl Iterator for BresenhamLine {
    type Item = Cell;

    fn next(&mut self) -> Option<Cell> {
        if self.done {
            return None;
        }

        let cell = self.current;
        if cell == self.end {
            self.done = true;
            return Some(cell);
        }

        let e2 = self.error * 2;
        if e2 >= self.dy {
            self.error += self.dy;
            self.current.x += self.step_x;
        }
        if e2 <= self.dx {
            self.error += self.dx;
            self.current.y += self.step_y;
        }

        Some(cell)
    }
}

impl std::iter::FusedIterator for BresenhamLine {}

// ----------------------------------------------
// Line of sight
// ----------------------------------------------

// True if every cell rasterized between `from` and `to` is passable and
// every diagonal raster step satisfies the corner rule.
pub fn line_of_sight<G>(filter: &CellFilter<'_, G>, from: Cell, to: Cell, prevent_corner_cutting: bool) -> bool
    where G: GridProvider + ?Sized
{
    let mut previous: Option<Cell> = None;

    for cell in BresenhamLine::new(from, to) {
        if !filter.is_passable(cell) {
            return false;
        }

        if let Some(prev) = previous {
            let step = Direction::between(prev, cell);
            if !filter.can_step(prev, step, prevent_corner_cutting) {
                return false;
            }
        }

        previous = Some(cell);
    }

    true
}

// ----------------------------------------------
// PathSmoother
// ----------------------------------------------

// String pulling: reduces a raw cell path to the waypoints an agent must
// actually steer through, keeping only cells where the straight line from
// the previous waypoint would otherwise be obstructed.
pub struct PathSmoother<'a, G: GridProvider + ?Sized> {
    filter: CellFilter<'a, G>,
    prevent_corner_cutting: bool,
}

impl<'a, G: GridProvider + ?Sized> PathSmoother<'a, G> {
    pub fn new(grid: &'a G, forbidden: &'a ForbiddenSet, prevent_corner_cutting: bool) -> Self {
        Self { filter: CellFilter::new(grid, forbidden), prevent_corner_cutting }
    }

    #[inline]
    pub fn has_line_of_sight(&self, from: Cell, to: Cell) -> bool {
        line_of_sight(&self.filter, from, to, self.prevent_corner_cutting)
    }

    // Writes the smoothed subsequence of `cells` into `waypoints`.
    // Endpoints are always kept. Paths with 2 cells or fewer are copied as-is.
    pub fn smooth_into(&self, cells: &[Cell], waypoints: &mut Vec<Cell>) {
        waypoints.clear();

        if cells.len() <= 2 {
            waypoints.extend_from_slice(cells);
            return;
        }

        let last = cells.len() - 1;
        let mut anchor = 0;
        waypoints.push(cells[anchor]);

        while anchor < last {
            // Farthest visible cell first. Falls back to the next raw cell,
            // which the search already proved reachable in one step.
            let next = (anchor + 2..=last)
                .rev()
                .find(|&index| self.has_line_of_sight(cells[anchor], cells[index]))
                .unwrap_or(anchor + 1);

            waypoints.push(cells[next]);
            anchor = next;
        }
    }

    pub fn smooth(&self, cells: &[Cell]) -> Vec<Cell> {
        let mut waypoints = Vec::with_capacity(cells.len());
        self.smooth_into(cells, &mut waypoints);
        waypoints
    }
}
