use crate::line_of_sight::line_of_sight;
use crate::occupancy_grid::OccupancyGrid;
use crate::Path;
use grid_util::point::Point;

/// Greedy string-pulling from start to end: from the current waypoint, jumps to the furthest later
/// waypoint that is in line of sight, or to the next one if none is. Paths shorter than three
/// points are returned as they are.
///
/// The scan is greedy rather than a shortest path through the visibility graph, so the result
/// depends on the direction of the scan; see [reverse_optimize_path].
pub fn optimize_path(grid: &OccupancyGrid, path: &[Point]) -> Path {
    if path.len() < 3 {
        return path.to_vec();
    }
    let last = path.len() - 1;
    let mut optimized = vec![path[0]];
    let mut current = 0;
    while current < last {
        let next = (current + 2..=last)
            .rev()
            .find(|&candidate| line_of_sight(grid, path[current], path[candidate]))
            .unwrap_or(current + 1);
        optimized.push(path[next]);
        current = next;
    }
    if optimized.len() > 2 && line_of_sight(grid, path[0], path[last]) {
        return vec![path[0], path[last]];
    }
    optimized
}

/// Mirror image of [optimize_path]: starts at the end of the path and jumps back to the earliest
/// waypoint in line of sight, or to the previous one if none is. The result is in start-to-end
/// order.
pub fn reverse_optimize_path(grid: &OccupancyGrid, path: &[Point]) -> Path {
    if path.len() < 3 {
        return path.to_vec();
    }
    let mut current = path.len() - 1;
    let mut optimized = vec![path[current]];
    while current > 0 {
        let previous = (0..current.saturating_sub(1))
            .find(|&candidate| line_of_sight(grid, path[candidate], path[current]))
            .unwrap_or(current - 1);
        optimized.push(path[previous]);
        current = previous;
    }
    optimized.reverse();
    optimized
}
