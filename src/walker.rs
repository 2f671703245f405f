use crate::euclidean_distance;
use grid_util::point::Point;
use itertools::Itertools;

/// Total Euclidean length of a path.
pub fn path_length(path: &[Point]) -> f32 {
    path.iter()
        .tuple_windows()
        .map(|(&a, &b)| euclidean_distance(a, b))
        .sum()
}

/// A straight piece of a path together with where it starts along the whole path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathSegment {
    pub start: Point,
    pub end: Point,
    pub length: f32,
    pub distance_from_start: f32,
}

impl PathSegment {
    fn end_distance(&self) -> f32 {
        self.distance_from_start + self.length
    }

    /// Interpolated position `offset` units past the segment start.
    pub fn position_at(&self, offset: f32) -> (f32, f32) {
        if self.length <= 0.0 {
            return (self.start.x as f32, self.start.y as f32);
        }
        let ratio = (offset / self.length).clamp(0.0, 1.0);
        (
            self.start.x as f32 + (self.end.x - self.start.x) as f32 * ratio,
            self.start.y as f32 + (self.end.y - self.start.y) as f32 * ratio,
        )
    }
}

/// Splits a path into its segments, accumulating the distance travelled up to each of them.
pub fn segments(path: &[Point]) -> Vec<PathSegment> {
    let mut distance_from_start = 0.0;
    path.iter()
        .tuple_windows()
        .map(|(&start, &end)| {
            let length = euclidean_distance(start, end);
            let segment = PathSegment {
                start,
                end,
                length,
                distance_from_start,
            };
            distance_from_start += length;
            segment
        })
        .collect()
}

/// Follows a path by distance, e.g. to sample positions at a fixed spacing or to feed a
/// controller. Positions are continuous `(x, y)` coordinates in grid units.
#[derive(Clone, Debug)]
pub struct PathWalker {
    segments: Vec<PathSegment>,
    segment_ix: usize,
    distance_traveled: f32,
    position: (f32, f32),
}

impl PathWalker {
    pub fn new(segments: Vec<PathSegment>) -> PathWalker {
        let position = segments
            .first()
            .map_or((0.0, 0.0), |s| (s.start.x as f32, s.start.y as f32));
        PathWalker {
            segments,
            segment_ix: 0,
            distance_traveled: 0.0,
            position,
        }
    }

    pub fn from_path(path: &[Point]) -> PathWalker {
        PathWalker::new(segments(path))
    }

    pub fn position(&self) -> (f32, f32) {
        self.position
    }

    pub fn distance_traveled(&self) -> f32 {
        self.distance_traveled
    }

    pub fn total_length(&self) -> f32 {
        self.segments.last().map_or(0.0, PathSegment::end_distance)
    }

    pub fn is_finished(&self) -> bool {
        self.segment_ix >= self.segments.len()
    }

    /// Moves `distance` further along the path and returns the new position. Movement stops at
    /// the end of the path; negative distances are ignored.
    pub fn advance(&mut self, distance: f32) -> (f32, f32) {
        let target = (self.distance_traveled + distance.max(0.0)).min(self.total_length());
        while let Some(segment) = self.segments.get(self.segment_ix) {
            if target < segment.end_distance() {
                self.position = segment.position_at(target - segment.distance_from_start);
                break;
            }
            self.position = (segment.end.x as f32, segment.end.y as f32);
            self.segment_ix += 1;
        }
        self.distance_traveled = target;
        self.position
    }
}

/// Before/after figures for a smoothing run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathStats {
    pub raw_length: f32,
    pub smoothed_length: f32,
    pub raw_waypoints: usize,
    pub smoothed_waypoints: usize,
    /// Percentage of waypoints removed.
    pub waypoint_reduction: f32,
    /// Percentage of length removed.
    pub length_reduction: f32,
}

impl PathStats {
    pub fn compare(raw: &[Point], smoothed: &[Point]) -> PathStats {
        let raw_length = path_length(raw);
        let smoothed_length = path_length(smoothed);
        let waypoint_reduction = if raw.is_empty() {
            0.0
        } else {
            (1.0 - smoothed.len() as f32 / raw.len() as f32) * 100.0
        };
        let length_reduction = if raw_length > 0.0 {
            (1.0 - smoothed_length / raw_length) * 100.0
        } else {
            0.0
        };
        PathStats {
            raw_length,
            smoothed_length,
            raw_waypoints: raw.len(),
            smoothed_waypoints: smoothed.len(),
            waypoint_reduction,
            length_reduction,
        }
    }
}
