use crate::error::GridError;
use crate::NEUMANN_OFFSETS;
use core::fmt;
use grid_util::point::Point;
use log::info;
use petgraph::unionfind::UnionFind;

/// [OccupancyGrid] stores the raw cell values of a rectangular occupancy grid in row-major order,
/// where `0` is free and any other value is blocked. Points index it as `(x, y) = (row, column)`.
/// In addition it maintains the 4-connected components of the free cells in a [UnionFind]
/// structure, which lets the search reject unreachable goals without flood-filling the grid.
#[derive(Clone, Debug)]
pub struct OccupancyGrid {
    cells: Vec<i32>,
    rows: usize,
    cols: usize,
    pub components: UnionFind<usize>,
    pub components_dirty: bool,
}

impl OccupancyGrid {
    /// Creates a `rows` by `cols` grid in which every cell is either blocked or free.
    pub fn new(rows: usize, cols: usize, blocked: bool) -> OccupancyGrid {
        let mut grid = OccupancyGrid {
            cells: vec![blocked as i32; rows * cols],
            rows,
            cols,
            components: UnionFind::new(rows * cols),
            components_dirty: false,
        };
        grid.generate_components();
        grid
    }

    /// Builds a grid from nested rows, rejecting empty and ragged input.
    pub fn from_rows(rows: Vec<Vec<i32>>) -> Result<OccupancyGrid, GridError> {
        let cols = rows.first().map_or(0, Vec::len);
        if cols == 0 {
            return Err(GridError::Empty);
        }
        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != cols)
        {
            return Err(GridError::Ragged {
                row,
                expected: cols,
                found,
            });
        }
        let n_rows = rows.len();
        let mut grid = OccupancyGrid {
            cells: rows.into_iter().flatten().collect(),
            rows: n_rows,
            cols,
            components: UnionFind::new(n_rows * cols),
            components_dirty: false,
        };
        grid.generate_components();
        Ok(grid)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0
            && point.y >= 0
            && (point.x as usize) < self.rows
            && (point.y as usize) < self.cols
    }

    fn ix(&self, point: Point) -> usize {
        point.x as usize * self.cols + point.y as usize
    }

    fn point_at(&self, ix: usize) -> Point {
        Point::new((ix / self.cols) as i32, (ix % self.cols) as i32)
    }

    /// Raw cell value, or [None] outside the grid.
    pub fn get(&self, point: Point) -> Option<i32> {
        self.in_bounds(point).then(|| self.cells[self.ix(point)])
    }

    /// A cell is free if it lies within the grid and holds a zero.
    #[inline]
    pub fn is_free(&self, point: Point) -> bool {
        self.get(point) == Some(0)
    }

    pub fn is_blocked(&self, point: Point) -> bool {
        !self.is_free(point)
    }

    fn free_neighbours(&self, point: Point) -> impl Iterator<Item = Point> + '_ {
        NEUMANN_OFFSETS
            .iter()
            .map(move |&(dx, dy)| Point::new(point.x + dx, point.y + dy))
            .filter(|&p| self.is_free(p))
    }

    /// Updates a cell. Joins newly connected components and flags the components as dirty if
    /// they are (potentially) broken apart into multiple. Out-of-bounds writes are ignored.
    pub fn set(&mut self, point: Point, value: i32) {
        if !self.in_bounds(point) {
            return;
        }
        let ix = self.ix(point);
        let was_free = self.cells[ix] == 0;
        self.cells[ix] = value;
        if value != 0 {
            if was_free {
                self.components_dirty = true;
            }
        } else {
            let neighbours = self.free_neighbours(point).collect::<Vec<_>>();
            for n in neighbours {
                let n_ix = self.ix(n);
                self.components.union(ix, n_ix);
            }
        }
    }

    pub fn set_blocked(&mut self, point: Point, blocked: bool) {
        self.set(point, blocked as i32);
    }

    /// True when both points lie in the grid and share a 4-connected component.
    pub fn reachable(&self, start: &Point, goal: &Point) -> bool {
        !self.unreachable(start, goal)
    }

    /// Checks if start and goal are not on the same component. Blocked cells form singleton
    /// components, so a blocked goal is only reachable from itself.
    pub fn unreachable(&self, start: &Point, goal: &Point) -> bool {
        if self.in_bounds(*start) && self.in_bounds(*goal) {
            !self.components.equiv(self.ix(*start), self.ix(*goal))
        } else {
            true
        }
    }

    /// Representative of the component containing `point`, or `None` outside the grid.
    pub fn get_component(&self, point: &Point) -> Option<usize> {
        self.in_bounds(*point)
            .then(|| self.components.find(self.ix(*point)))
    }

    /// Rebuilds the components, but only after a blocking write has made them stale.
    pub fn update(&mut self) {
        if self.components_dirty {
            info!("Components are dirty: regenerating components");
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up free 4-neighbours to the same component.
    pub fn generate_components(&mut self) {
        info!(
            "Generating connected components for {}x{} grid",
            self.rows, self.cols
        );
        self.components = UnionFind::new(self.rows * self.cols);
        self.components_dirty = false;
        for ix in 0..self.cells.len() {
            if self.cells[ix] != 0 {
                continue;
            }
            let point = self.point_at(ix);
            // Linking forward is enough, the backward links come from the other cell
            for n in [Point::new(point.x + 1, point.y), Point::new(point.x, point.y + 1)] {
                if self.is_free(n) {
                    let n_ix = self.ix(n);
                    self.components.union(ix, n_ix);
                }
            }
        }
    }

    /// Returns a copy of the grid in which every free cell whose Euclidean distance to a blocked
    /// cell is at most `radius` is blocked as well. Each blocked cell stamps the disc of offsets
    /// with `dx² + dy² <= radius²` onto the copy.
    pub fn inflate_obstacles(&self, radius: f32) -> OccupancyGrid {
        if radius <= 0.0 {
            return self.clone();
        }
        let radius_sq = radius * radius;
        let reach = radius.floor() as i32;
        let disc = (-reach..=reach)
            .flat_map(|dx| (-reach..=reach).map(move |dy| (dx, dy)))
            .filter(|&(dx, dy)| (dx * dx + dy * dy) as f32 <= radius_sq)
            .collect::<Vec<_>>();
        let mut inflated = self.clone();
        for (ix, &value) in self.cells.iter().enumerate() {
            if value == 0 {
                continue;
            }
            let obstacle = self.point_at(ix);
            for &(dx, dy) in &disc {
                let p = Point::new(obstacle.x + dx, obstacle.y + dy);
                if self.is_free(p) {
                    let p_ix = self.ix(p);
                    inflated.cells[p_ix] = 1;
                }
            }
        }
        inflated.generate_components();
        inflated
    }
}

impl TryFrom<Vec<Vec<i32>>> for OccupancyGrid {
    type Error = GridError;

    fn try_from(rows: Vec<Vec<i32>>) -> Result<Self, Self::Error> {
        OccupancyGrid::from_rows(rows)
    }
}

impl fmt::Display for OccupancyGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.cells.chunks(self.cols.max(1)) {
            let line = row
                .iter()
                .map(|&v| if v == 0 { '.' } else { '#' })
                .collect::<String>();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_ragged_rows() {
        assert_eq!(OccupancyGrid::from_rows(vec![]).unwrap_err(), GridError::Empty);
        assert_eq!(
            OccupancyGrid::from_rows(vec![vec![]]).unwrap_err(),
            GridError::Empty
        );
        let err = OccupancyGrid::from_rows(vec![vec![0, 0], vec![0], vec![0, 0]]).unwrap_err();
        assert_eq!(
            err,
            GridError::Ragged {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn axis_convention_is_row_then_column() {
        let grid = OccupancyGrid::from_rows(vec![vec![0, 7, 0], vec![0, 0, 0]]).unwrap();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.get(Point::new(0, 1)), Some(7));
        assert!(grid.is_blocked(Point::new(0, 1)));
        assert!(grid.is_free(Point::new(1, 2)));
        assert_eq!(grid.get(Point::new(2, 0)), None);
        assert!(grid.is_blocked(Point::new(-1, 0)));
    }

    /// A blocked column splits the free cells into a left and a right component.
    #[test]
    fn wall_separates_components() {
        // |.#.|
        // |.#.|
        let grid = OccupancyGrid::from_rows(vec![vec![0, 1, 0], vec![0, 1, 0]]).unwrap();
        let p1 = Point::new(0, 0);
        let p2 = Point::new(0, 1);
        let p3 = Point::new(1, 0);
        let p4 = Point::new(0, 2);
        assert!(grid.unreachable(&p1, &p2));
        assert!(grid.reachable(&p1, &p3));
        assert!(grid.unreachable(&p1, &p4));
        assert!(grid.unreachable(&p1, &Point::new(5, 5)));
    }

    /// Diagonal contact does not connect two cells on a 4-grid.
    #[test]
    fn diagonal_cells_are_not_connected() {
        let grid = OccupancyGrid::from_rows(vec![vec![0, 1], vec![1, 0]]).unwrap();
        assert!(grid.unreachable(&Point::new(0, 0), &Point::new(1, 1)));
    }

    #[test]
    fn set_tracks_component_changes() {
        let mut grid = OccupancyGrid::new(1, 3, false);
        let left = Point::new(0, 0);
        let right = Point::new(0, 2);
        grid.set_blocked(Point::new(0, 1), true);
        assert!(grid.components_dirty);
        grid.update();
        assert!(!grid.components_dirty);
        assert!(grid.unreachable(&left, &right));
        grid.set_blocked(Point::new(0, 1), false);
        assert!(!grid.components_dirty);
        assert!(grid.reachable(&left, &right));
    }

    #[test]
    fn inflation_blocks_cells_within_radius() {
        let mut grid = OccupancyGrid::new(5, 5, false);
        grid.set_blocked(Point::new(2, 2), true);
        grid.update();
        let inflated = grid.inflate_obstacles(1.0);
        for p in [(1, 2), (3, 2), (2, 1), (2, 3)] {
            assert!(inflated.is_blocked(Point::new(p.0, p.1)));
        }
        for p in [(1, 1), (3, 3), (0, 2), (2, 0)] {
            assert!(inflated.is_free(Point::new(p.0, p.1)));
        }
        let wider = grid.inflate_obstacles(1.5);
        assert!(wider.is_blocked(Point::new(1, 1)));
        assert!(wider.is_free(Point::new(0, 2)));
        // The source grid is left untouched
        assert!(grid.is_free(Point::new(1, 2)));
    }

    #[test]
    fn inflation_uses_euclidean_distance() {
        // (2,1) and (1,2) away from the obstacle lie at √5 ≈ 2.236, inside a radius of 2.25,
        // while (2,2) lies at √8 and stays free.
        let mut grid = OccupancyGrid::new(7, 7, false);
        grid.set_blocked(Point::new(3, 3), true);
        grid.update();
        let inflated = grid.inflate_obstacles(2.25);
        for (dx, dy) in [(2, 1), (1, 2), (-2, 1), (2, -1), (-1, -2), (2, 0), (0, -2)] {
            assert!(inflated.is_blocked(Point::new(3 + dx, 3 + dy)));
        }
        for (dx, dy) in [(2, 2), (-2, -2), (3, 0), (0, 3)] {
            assert!(inflated.is_free(Point::new(3 + dx, 3 + dy)));
        }
        assert_eq!(
            inflated.to_string(),
            ".......\n..###..\n.#####.\n.#####.\n.#####.\n..###..\n.......\n"
        );
    }

    #[test]
    fn zero_radius_inflation_is_a_copy() {
        let grid = OccupancyGrid::from_rows(vec![vec![0, 1], vec![0, 0]]).unwrap();
        let inflated = grid.inflate_obstacles(0.0);
        assert_eq!(grid.to_string(), inflated.to_string());
    }

    #[test]
    fn display_marks_blocked_cells() {
        let grid = OccupancyGrid::from_rows(vec![vec![0, 1], vec![2, 0]]).unwrap();
        assert_eq!(grid.to_string(), ".#\n#.\n");
    }
}
