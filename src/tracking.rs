//! Dense sampling of a planned path, a speed profile limited by curvature and acceleration, and
//! tracking of a moving robot against the sampled path.
//!
//! Headings are measured in radians from the x axis towards the y axis, and distances are in grid
//! units.
use crate::walker::{path_length, PathWalker};
use grid_util::point::Point;
use std::f32::consts::PI;

/// A point on a densely sampled path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathSample {
    pub x: f32,
    pub y: f32,
    /// Direction of travel leaving this sample.
    pub heading: f32,
    /// Signed heading change per unit of distance, zero at both ends.
    pub curvature: f32,
    /// Distance along the path from its start.
    pub distance: f32,
    /// Filled in by [apply_speed_limits], zero until then.
    pub speed_limit: f32,
}

/// Wraps an angle into [-π, π).
fn normalize_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(2.0 * PI) - PI
}

/// Samples a path at evenly spaced distances no further apart than `spacing`, both ends included.
/// A path of a single point, or one with zero length, gives one sample. A non-positive spacing
/// samples only the start and the end.
pub fn sample_path(path: &[Point], spacing: f32) -> Vec<PathSample> {
    let Some(&first) = path.first() else {
        return Vec::new();
    };
    let total = path_length(path);
    let start = PathSample {
        x: first.x as f32,
        y: first.y as f32,
        heading: 0.0,
        curvature: 0.0,
        distance: 0.0,
        speed_limit: 0.0,
    };
    if total <= 0.0 {
        return vec![start];
    }
    let pieces = if spacing > 0.0 {
        (total / spacing).ceil().max(1.0) as usize
    } else {
        1
    };
    let step = total / pieces as f32;
    let mut walker = PathWalker::from_path(path);
    let mut samples = vec![start];
    for i in 1..=pieces {
        let (x, y) = walker.advance(step);
        let distance = if i == pieces { total } else { step * i as f32 };
        samples.push(PathSample {
            x,
            y,
            distance,
            ..start
        });
    }

    let headings = samples
        .windows(2)
        .map(|w| (w[1].y - w[0].y).atan2(w[1].x - w[0].x))
        .collect::<Vec<_>>();
    let last = samples.len() - 1;
    for (i, sample) in samples.iter_mut().enumerate() {
        sample.heading = headings[i.min(last - 1)];
        if i > 0 && i < last {
            sample.curvature = normalize_angle(headings[i] - headings[i - 1]) / step;
        }
    }
    samples
}

/// Limits used to derive a speed profile for a sampled path.
#[derive(Clone, Debug)]
pub struct SpeedLimits {
    /// Upper bound for the speed anywhere on the path (units/s)
    pub max_speed: f32,
    /// Lower bound for the speed, also used at both ends (units/s)
    pub min_speed: f32,
    /// Maximum rate of turn (rad/s)
    pub max_turn_rate: f32,
    /// Maximum acceleration (units/s²)
    pub max_accel: f32,
    /// Maximum deceleration as a positive value (units/s²)
    pub max_decel: f32,
    /// Width of the distance window over which curvature is averaged (units)
    pub smoothing_window: f32,
}

impl Default for SpeedLimits {
    fn default() -> Self {
        Self {
            max_speed: 10.0,
            min_speed: 2.0,
            max_turn_rate: 1.0,
            max_accel: 2.0,
            max_decel: 3.0,
            smoothing_window: 5.0,
        }
    }
}

/// Averages curvature over neighbouring samples with Gaussian weights (σ = window / 4), ignoring
/// samples further than half the window away.
fn smoothed_curvatures(samples: &[PathSample], window: f32) -> Vec<f32> {
    if window <= 0.0 {
        return samples.iter().map(|s| s.curvature).collect();
    }
    let sigma = window / 4.0;
    samples
        .iter()
        .map(|center| {
            let (weighted, total) = samples
                .iter()
                .filter(|s| (s.distance - center.distance).abs() <= window / 2.0)
                .fold((0.0, 0.0), |(weighted, total), s| {
                    let d = s.distance - center.distance;
                    let w = (-(d * d) / (2.0 * sigma * sigma)).exp();
                    (weighted + w * s.curvature, total + w)
                });
            weighted / total
        })
        .collect()
}

/// Fills in [PathSample::speed_limit]. The turn rate bounds the speed by the smoothed curvature
/// (`v = ω / |κ|`), the result is kept between the minimum and maximum speed, and a forward and a
/// backward pass bound it by the acceleration and deceleration needed to start and stop at the
/// minimum speed.
pub fn apply_speed_limits(samples: &mut [PathSample], limits: &SpeedLimits) {
    if samples.is_empty() {
        return;
    }
    let curvatures = smoothed_curvatures(samples, limits.smoothing_window);
    for (sample, curvature) in samples.iter_mut().zip(curvatures) {
        let turn_limited = limits.max_turn_rate / (curvature.abs() + 1e-6);
        sample.speed_limit = turn_limited.min(limits.max_speed).max(limits.min_speed);
    }

    samples[0].speed_limit = limits.min_speed;
    for i in 1..samples.len() {
        let ds = samples[i].distance - samples[i - 1].distance;
        let reachable = (samples[i - 1].speed_limit.powi(2) + 2.0 * limits.max_accel * ds).sqrt();
        samples[i].speed_limit = samples[i].speed_limit.min(reachable);
    }

    let last = samples.len() - 1;
    samples[last].speed_limit = limits.min_speed;
    for i in (0..last).rev() {
        let ds = samples[i + 1].distance - samples[i].distance;
        let stoppable = (samples[i + 1].speed_limit.powi(2) + 2.0 * limits.max_decel * ds).sqrt();
        samples[i].speed_limit = samples[i].speed_limit.min(stoppable);
    }
}

/// Where a robot is relative to the sampled path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackingState {
    /// Index of the nearest sample.
    pub index: usize,
    pub distance_from_start: f32,
    pub heading: f32,
    pub speed_limit: f32,
    /// Signed lateral offset from the path, positive towards increasing heading.
    pub offset: f32,
    pub is_last_point: bool,
}

/// Tracks the nearest sample to a moving robot. Each update only searches `window` samples around
/// the previous match, so progress along the path is continuous even where it passes close to
/// itself.
#[derive(Clone, Debug)]
pub struct PathTracker {
    samples: Vec<PathSample>,
    current_ix: usize,
    window: usize,
}

impl PathTracker {
    pub fn new(samples: Vec<PathSample>, window: usize) -> PathTracker {
        PathTracker {
            samples,
            current_ix: 0,
            window,
        }
    }

    /// Moves the match to the nearest sample around the previous one and reports the robot's
    /// state there. Returns `None` for an empty path.
    pub fn update(&mut self, x: f32, y: f32) -> Option<TrackingState> {
        let half = self.window / 2;
        let from = self.current_ix.saturating_sub(half);
        let to = (self.current_ix + half)
            .max(self.current_ix + 1)
            .min(self.samples.len());
        let (index, sample) = self
            .samples
            .get(from..to)?
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                let da = (a.x - x).powi(2) + (a.y - y).powi(2);
                let db = (b.x - x).powi(2) + (b.y - y).powi(2);
                da.total_cmp(&db)
            })
            .map(|(i, s)| (from + i, *s))?;
        self.current_ix = index;

        let (dx, dy) = (x - sample.x, y - sample.y);
        Some(TrackingState {
            index,
            distance_from_start: sample.distance,
            heading: sample.heading,
            speed_limit: sample.speed_limit,
            offset: -dx * sample.heading.sin() + dy * sample.heading.cos(),
            is_last_point: index + 1 == self.samples.len(),
        })
    }

    /// The currently matched sample.
    pub fn current(&self) -> Option<&PathSample> {
        self.samples.get(self.current_ix)
    }

    pub fn samples(&self) -> &[PathSample] {
        &self.samples
    }

    pub fn reset(&mut self) {
        self.current_ix = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPS: f32 = 1e-4;

    fn points(coords: &[(i32, i32)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn straight_line_has_no_curvature() {
        let samples = sample_path(&points(&[(0, 0), (0, 10)]), 1.0);
        assert_eq!(samples.len(), 11);
        for (i, s) in samples.iter().enumerate() {
            assert!((s.x - 0.0).abs() < EPS);
            assert!((s.y - i as f32).abs() < EPS);
            assert!((s.distance - i as f32).abs() < EPS);
            assert!((s.heading - FRAC_PI_2).abs() < EPS);
            assert_eq!(s.curvature, 0.0);
        }
    }

    #[test]
    fn corner_concentrates_curvature() {
        // Travels along +y, then turns to +x
        let samples = sample_path(&points(&[(0, 0), (0, 4), (4, 4)]), 1.0);
        assert_eq!(samples.len(), 9);
        for (i, s) in samples.iter().enumerate() {
            if i == 4 {
                assert!((s.curvature + FRAC_PI_2).abs() < EPS);
            } else {
                assert!(s.curvature.abs() < EPS);
            }
        }
        assert!((samples[3].heading - FRAC_PI_2).abs() < EPS);
        assert!(samples[4].heading.abs() < EPS);
        assert!(samples[8].heading.abs() < EPS);
    }

    #[test]
    fn degenerate_paths() {
        assert!(sample_path(&[], 1.0).is_empty());
        assert_eq!(sample_path(&points(&[(2, 3)]), 1.0).len(), 1);
        assert_eq!(sample_path(&points(&[(2, 3), (2, 3)]), 1.0).len(), 1);
        let ends = sample_path(&points(&[(0, 0), (3, 4)]), 0.0);
        assert_eq!(ends.len(), 2);
        assert!((ends[1].distance - 5.0).abs() < EPS);
    }

    #[test]
    fn speed_profile_respects_all_limits() {
        let limits = SpeedLimits::default();
        let mut samples = sample_path(&points(&[(0, 0), (0, 20), (20, 20)]), 0.5);
        apply_speed_limits(&mut samples, &limits);
        let first = samples[0];
        let last = samples[samples.len() - 1];
        assert_eq!(first.speed_limit, limits.min_speed);
        assert_eq!(last.speed_limit, limits.min_speed);
        for w in samples.windows(2) {
            let ds = w[1].distance - w[0].distance;
            let (v0, v1) = (w[0].speed_limit, w[1].speed_limit);
            assert!(v1 * v1 <= v0 * v0 + 2.0 * limits.max_accel * ds + 1e-3);
            assert!(v0 * v0 <= v1 * v1 + 2.0 * limits.max_decel * ds + 1e-3);
        }
        for s in &samples {
            assert!(s.speed_limit >= limits.min_speed - EPS);
            assert!(s.speed_limit <= limits.max_speed + EPS);
        }
        // The corner at distance 20 is taken at the minimum speed, the straights allow more
        let corner = samples
            .iter()
            .find(|s| (s.distance - 20.0).abs() < EPS)
            .unwrap();
        assert!((corner.speed_limit - limits.min_speed).abs() < EPS);
        assert!(samples.iter().any(|s| s.speed_limit > 2.0 * limits.min_speed));
    }

    #[test]
    fn tracker_reports_offset_and_progress() {
        let mut samples = sample_path(&points(&[(0, 0), (0, 10)]), 1.0);
        apply_speed_limits(&mut samples, &SpeedLimits::default());
        let mut tracker = PathTracker::new(samples, 100);
        let state = tracker.update(1.0, 3.2).unwrap();
        assert_eq!(state.index, 3);
        assert!((state.distance_from_start - 3.0).abs() < EPS);
        assert!((state.offset + 1.0).abs() < EPS);
        assert!(!state.is_last_point);
        assert_eq!(tracker.current().map(|s| s.distance), Some(state.distance_from_start));

        let state = tracker.update(-0.5, 10.0).unwrap();
        assert!(state.is_last_point);
        assert!((state.offset - 0.5).abs() < EPS);
        tracker.reset();
        assert_eq!(tracker.current().map(|s| s.distance), Some(0.0));
    }

    #[test]
    fn narrow_window_advances_gradually() {
        let samples = sample_path(&points(&[(0, 0), (0, 10)]), 1.0);
        let mut tracker = PathTracker::new(samples, 4);
        // Only two samples either side of the previous match are searched
        let indices = (0..4)
            .map(|_| tracker.update(0.0, 9.0).unwrap().index)
            .collect::<Vec<_>>();
        assert_eq!(indices, vec![1, 2, 3, 4]);
    }

    #[test]
    fn empty_tracker_has_no_state() {
        let mut tracker = PathTracker::new(Vec::new(), 10);
        assert!(tracker.update(0.0, 0.0).is_none());
        assert!(tracker.current().is_none());
    }
}
