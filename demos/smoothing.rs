use any_angle_grid::{plan, waypoints_to_path, OccupancyGrid, PlannerConfig, Point, SearchMode};

/// This example compares the raw output of a plain grid search with the result of the multi-pass
/// smoother on a 20x20 grid with two walls, after inflating the walls by one cell.
fn main() {
    let mut grid = OccupancyGrid::new(20, 20, false);
    for i in 4..16 {
        grid.set_blocked(Point::new(i, 6), true);
        grid.set_blocked(Point::new(10, i), true);
    }
    grid.update();
    let grid = grid.inflate_obstacles(1.0);
    println!("{}", grid);

    let start = Point::new(0, 0);
    let end = Point::new(19, 19);
    for mode in [SearchMode::Grid, SearchMode::Theta] {
        let config = PlannerConfig::new().with_mode(mode);
        let plan = plan(&grid, start, end, &config);
        if plan.is_empty() {
            println!("{:?}: no path", mode);
            continue;
        }
        let stats = plan.stats();
        println!(
            "{:?}: {} -> {} waypoints, length {:.2} -> {:.2} ({:.1}% shorter)",
            mode,
            stats.raw_waypoints,
            stats.smoothed_waypoints,
            stats.raw_length,
            stats.smoothed_length,
            stats.length_reduction
        );
        println!("Smoothed waypoints: {:?}", plan.smoothed);
        println!(
            "Cells to follow: {}",
            waypoints_to_path(&plan.smoothed).len()
        );
    }
}
