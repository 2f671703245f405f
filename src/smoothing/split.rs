use crate::{euclidean_distance, Path};
use grid_util::point::Point;
use itertools::Itertools;

fn lerp(from: i32, to: i32, t: f32) -> i32 {
    (from as f32 + (to - from) as f32 * t).round() as i32
}

/// Inserts evenly spaced grid points into every segment longer than `max_length`, so that a
/// segment of length `d` is cut into `ceil(d / max_length)` pieces. Shorter segments and the
/// original points are kept as they are. The grid is not consulted, so inserted points may land on
/// blocked cells.
pub fn split_long_segments(path: &[Point], max_length: f32) -> Path {
    let Some(&first) = path.first() else {
        return Vec::new();
    };
    let mut split = vec![first];
    for (a, b) in path.iter().copied().tuple_windows() {
        let distance = euclidean_distance(a, b);
        if distance > max_length {
            let pieces = (distance / max_length).ceil() as usize;
            split.extend((1..pieces).map(|j| {
                let t = j as f32 / pieces as f32;
                Point::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t))
            }));
        }
        split.push(b);
    }
    split
}
