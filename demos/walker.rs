use any_angle_grid::{
    apply_speed_limits, plan, sample_path, OccupancyGrid, PathTracker, PathWalker, PlannerConfig,
    Point, SpeedLimits,
};

// Plans a route around a block, samples the position every 2 cells along the smoothed path and
// derives a speed profile, then tracks a robot that drifts half a cell off the route.
fn main() {
    let mut grid = OccupancyGrid::new(12, 12, false);
    for x in 3..9 {
        for y in 3..9 {
            grid.set_blocked(Point::new(x, y), true);
        }
    }
    grid.update();
    let plan = plan(
        &grid,
        Point::new(0, 0),
        Point::new(11, 11),
        &PlannerConfig::default(),
    );
    let mut walker = PathWalker::from_path(&plan.smoothed);
    println!("Total length: {:.2}", walker.total_length());
    while !walker.is_finished() {
        let (x, y) = walker.advance(2.0);
        println!(
            "{:>6.2}: ({:.2}, {:.2})",
            walker.distance_traveled(),
            x,
            y
        );
    }

    let mut samples = sample_path(&plan.smoothed, 0.5);
    apply_speed_limits(&mut samples, &SpeedLimits::default());
    let mut tracker = PathTracker::new(samples.clone(), 20);
    for sample in samples.iter().step_by(4) {
        if let Some(state) = tracker.update(sample.x + 0.5, sample.y) {
            println!(
                "{:>6.2}: speed limit {:.2}, offset {:+.2}",
                state.distance_from_start, state.speed_limit, state.offset
            );
        }
    }
}
