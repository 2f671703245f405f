use crate::occupancy_grid::OccupancyGrid;
use crate::smoothing::multi_pass_optimize_with_length;
use crate::theta_star::{find_path_with_mode, SearchMode};
use crate::walker::PathStats;
use crate::{Path, DEFAULT_MAX_SEGMENT_LENGTH, DEFAULT_PASSES};
use grid_util::point::Point;
use log::debug;

/// Settings for a full search-and-smooth run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlannerConfig {
    pub mode: SearchMode,
    /// Segments longer than this are split before each optimizer scan.
    pub max_segment_length: f32,
    /// Number of split/forward/split/reverse rounds. Zero skips smoothing.
    pub passes: usize,
}

impl Default for PlannerConfig {
    fn default() -> PlannerConfig {
        PlannerConfig {
            mode: SearchMode::Theta,
            max_segment_length: DEFAULT_MAX_SEGMENT_LENGTH,
            passes: DEFAULT_PASSES,
        }
    }
}

impl PlannerConfig {
    pub fn new() -> PlannerConfig {
        PlannerConfig::default()
    }

    pub fn with_mode(mut self, mode: SearchMode) -> PlannerConfig {
        self.mode = mode;
        self
    }

    pub fn with_max_segment_length(mut self, max_segment_length: f32) -> PlannerConfig {
        self.max_segment_length = max_segment_length;
        self
    }

    pub fn with_passes(mut self, passes: usize) -> PlannerConfig {
        self.passes = passes;
        self
    }
}

/// The raw search result next to its smoothed version.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Plan {
    pub raw: Path,
    pub smoothed: Path,
}

impl Plan {
    /// True if no route was found.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn stats(&self) -> PathStats {
        PathStats::compare(&self.raw, &self.smoothed)
    }
}

/// Searches for a route from start to end and smooths it according to `config`.
pub fn plan(grid: &OccupancyGrid, start: Point, end: Point, config: &PlannerConfig) -> Plan {
    let raw = find_path_with_mode(grid, start, end, config.mode);
    let smoothed = if config.passes > 0 && !raw.is_empty() {
        multi_pass_optimize_with_length(grid, &raw, config.passes, config.max_segment_length)
    } else {
        raw.clone()
    };
    debug!(
        "Planned {} -> {}: {} raw waypoints, {} after smoothing",
        start,
        end,
        raw.len(),
        smoothed.len()
    );
    Plan { raw, smoothed }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let config = PlannerConfig::new()
            .with_mode(SearchMode::Grid)
            .with_passes(2)
            .with_max_segment_length(4.0);
        assert_eq!(config.mode, SearchMode::Grid);
        assert_eq!(config.passes, 2);
        assert_eq!(config.max_segment_length, 4.0);
        assert_eq!(PlannerConfig::default().passes, DEFAULT_PASSES);
    }

    #[test]
    fn grid_search_is_smoothed() {
        let grid = OccupancyGrid::new(6, 6, false);
        let start = Point::new(0, 0);
        let end = Point::new(5, 3);
        let config = PlannerConfig::new().with_mode(SearchMode::Grid);
        let plan = plan(&grid, start, end, &config);
        assert_eq!(plan.raw.len(), 9);
        assert_eq!(plan.smoothed, vec![start, end]);
        let stats = plan.stats();
        assert!(stats.length_reduction > 0.0);
        assert!(stats.waypoint_reduction > 0.0);
    }

    #[test]
    fn zero_passes_keeps_raw_path() {
        let grid = OccupancyGrid::new(4, 4, false);
        let config = PlannerConfig::new().with_passes(0);
        let plan = plan(&grid, Point::new(0, 0), Point::new(3, 1), &config);
        assert_eq!(plan.raw, plan.smoothed);
    }

    #[test]
    fn unreachable_goal_gives_empty_plan() {
        let mut grid = OccupancyGrid::new(3, 3, false);
        for x in 0..3 {
            grid.set_blocked(Point::new(x, 1), true);
        }
        grid.update();
        let plan = plan(&grid, Point::new(0, 0), Point::new(0, 2), &PlannerConfig::default());
        assert!(plan.is_empty());
        assert!(plan.smoothed.is_empty());
    }
}
