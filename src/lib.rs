//! # any_angle_grid
//!
//! Any-angle pathfinding on occupancy grids. A route is first found with a
//! [Theta*](https://en.wikipedia.org/wiki/Theta*)-style search that expands the four cardinal
//! neighbours of a cell but attaches a neighbour directly to its grandparent whenever the two
//! can see each other. The raw route is then shortened by alternating forward and reverse
//! string-pulling passes, which keep only waypoints that are needed to stay clear of obstacles.
//!
//! Grids are rectangular matrices of `i32` values where `0` is free and anything else is blocked.
//! A [Point] indexes the grid as `(x, y) = (row, column)`, and the same convention is used for
//! distances and line traversal. Failure is structural: an empty [Path] means no route exists.
//!
//! Free cells are grouped into [connected components](https://en.wikipedia.org/wiki/Component_(graph_theory))
//! up front, so unreachable goals are rejected without flood-filling the grid.
pub mod error;
pub mod line_of_sight;
pub mod occupancy_grid;
pub mod planner;
pub mod smoothing;
pub mod theta_star;
pub mod tracking;
pub mod walker;

pub use error::GridError;
pub use grid_util::point::Point;
pub use line_of_sight::{line_of_sight, waypoints_to_path, SupercoverLine};
pub use occupancy_grid::OccupancyGrid;
pub use planner::{plan, Plan, PlannerConfig};
pub use smoothing::{
    is_visible_chain, multi_pass_optimize, multi_pass_optimize_with_length, optimize_path,
    reverse_optimize_path, split_long_segments,
};
pub use theta_star::{find_path, find_path_with_mode, SearchMode};
pub use tracking::{
    apply_speed_limits, sample_path, PathSample, PathTracker, SpeedLimits, TrackingState,
};
pub use walker::{path_length, segments, PathSegment, PathStats, PathWalker};

/// Ordered sequence of grid cells from start to goal. Empty if no route was found.
pub type Path = Vec<Point>;

/// Segment length above which [split_long_segments] inserts intermediate points by default.
pub const DEFAULT_MAX_SEGMENT_LENGTH: f32 = 10.0;
/// Default number of rounds run by [multi_pass_optimize] in a [plan].
pub const DEFAULT_PASSES: usize = 5;

/// 4-neighbourhood in `(row, column)` steps: right, down, left, up.
pub(crate) const NEUMANN_OFFSETS: [(i32, i32); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// Straight-line distance between two cells, used both as step cost and as search heuristic.
#[inline]
pub fn euclidean_distance(a: Point, b: Point) -> f32 {
    let dx = (a.x - b.x) as f32;
    let dy = (a.y - b.y) as f32;
    (dx * dx + dy * dy).sqrt()
}
