use crate::occupancy_grid::OccupancyGrid;
use crate::Path;
use grid_util::point::Point;

/// Iterator over the grid cells touched by the straight line between two cells, both endpoints
/// included. This is the supercover variant of Bresenham's algorithm: it advances one axis at a
/// time along the dominant error term, and steps diagonally only when the line passes exactly
/// through a cell corner, so no cell is skipped or visited twice.
#[derive(Clone, Debug)]
pub struct SupercoverLine {
    x: i32,
    y: i32,
    x_inc: i32,
    y_inc: i32,
    error: i64,
    dx2: i64,
    dy2: i64,
    remaining: usize,
}

impl SupercoverLine {
    pub fn new(a: Point, b: Point) -> SupercoverLine {
        // Widened so that lines between far-apart points cannot overflow
        let dx = (i64::from(b.x) - i64::from(a.x)).abs();
        let dy = (i64::from(b.y) - i64::from(a.y)).abs();
        SupercoverLine {
            x: a.x,
            y: a.y,
            x_inc: if b.x > a.x { 1 } else { -1 },
            y_inc: if b.y > a.y { 1 } else { -1 },
            error: dx - dy,
            dx2: dx * 2,
            dy2: dy * 2,
            remaining: 1 + dx as usize + dy as usize,
        }
    }
}

impl Iterator for SupercoverLine {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.remaining == 0 {
            return None;
        }
        let cell = Point::new(self.x, self.y);
        self.remaining -= 1;
        if self.remaining == 0 {
            return Some(cell);
        }
        if self.error > 0 {
            self.x += self.x_inc;
            self.error -= self.dy2;
        } else if self.error < 0 {
            self.y += self.y_inc;
            self.error += self.dx2;
        } else {
            // Corner crossing: one diagonal step covers both axis steps
            self.x += self.x_inc;
            self.y += self.y_inc;
            self.error += self.dx2 - self.dy2;
            self.remaining = self.remaining.saturating_sub(1);
        }
        Some(cell)
    }
}

/// Checks whether every cell on the supercover line from `a` to `b` is inside the grid and free.
/// Stops at the first offending cell.
pub fn line_of_sight(grid: &OccupancyGrid, a: Point, b: Point) -> bool {
    // Both endpoints are on the line, so either one outside the grid fails it up front
    grid.in_bounds(a)
        && grid.in_bounds(b)
        && SupercoverLine::new(a, b).all(|cell| grid.is_free(cell))
}

/// Turns waypoints into a path on the grid which can be followed cell by cell, by chaining the
/// supercover lines between consecutive waypoints.
pub fn waypoints_to_path(waypoints: &[Point]) -> Path {
    let mut path: Path = Vec::new();
    for (i, &waypoint) in waypoints.iter().enumerate() {
        match waypoints.get(i + 1) {
            Some(&next) => {
                let line = SupercoverLine::new(waypoint, next);
                // The joint cell is already present as the end of the previous line
                let skip = usize::from(!path.is_empty());
                path.extend(line.skip(skip));
            }
            None if path.is_empty() => path.push(waypoint),
            None => {}
        }
    }
    path
}
