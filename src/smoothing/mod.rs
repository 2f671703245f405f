use crate::line_of_sight::line_of_sight;
use crate::occupancy_grid::OccupancyGrid;
use crate::{Path, DEFAULT_MAX_SEGMENT_LENGTH};
use grid_util::point::Point;
use itertools::Itertools;
use log::debug;

pub mod optimize;
pub mod split;

pub use optimize::{optimize_path, reverse_optimize_path};
pub use split::split_long_segments;

/// Runs `passes` rounds of splitting and string-pulling, splitting at
/// [DEFAULT_MAX_SEGMENT_LENGTH]. See [multi_pass_optimize_with_length].
pub fn multi_pass_optimize(grid: &OccupancyGrid, path: &[Point], passes: usize) -> Path {
    multi_pass_optimize_with_length(grid, path, passes, DEFAULT_MAX_SEGMENT_LENGTH)
}

/// Runs `passes` rounds of splitting and string-pulling. Each round splits long segments,
/// optimizes forward, splits again and optimizes in reverse. Splitting brings back intermediate
/// candidates that an earlier scan dropped, which lets later scans find connections that were
/// hidden inside a single long segment. There is no convergence test; the pass count is a fixed
/// budget. Paths shorter than three points are returned as they are.
///
/// A rounded split point sits on a different supercover line than the segment it came from, so a
/// pass can produce a segment that crosses an obstacle. Such a pass is discarded and the last
/// clean path is returned.
pub fn multi_pass_optimize_with_length(
    grid: &OccupancyGrid,
    path: &[Point],
    passes: usize,
    max_segment_length: f32,
) -> Path {
    let mut optimized = path.to_vec();
    if optimized.len() < 3 {
        return optimized;
    }
    for pass in 0..passes {
        let mut candidate = split_long_segments(&optimized, max_segment_length);
        candidate = optimize_path(grid, &candidate);
        candidate = split_long_segments(&candidate, max_segment_length);
        candidate = reverse_optimize_path(grid, &candidate);
        if !is_visible_chain(grid, &candidate) {
            debug!(
                "Pass {} introduced a blocked segment, keeping {} waypoints",
                pass + 1,
                optimized.len()
            );
            break;
        }
        optimized = candidate;
        debug!("Pass {}: {} waypoints", pass + 1, optimized.len());
    }
    optimized
}

/// Checks that every pair of consecutive waypoints is in line of sight.
pub fn is_visible_chain(grid: &OccupancyGrid, path: &[Point]) -> bool {
    path.iter()
        .tuple_windows()
        .all(|(&a, &b)| line_of_sight(grid, a, b))
}
