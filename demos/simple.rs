use any_angle_grid::{find_path, OccupancyGrid, Point};

// In this example a path is found on a 5x5 grid with shape
//  _____
// |S.#.E|
// |..#..|
// |..#..|
// |..#..|
// |.....|
//  _____
// where
// - # marks an obstacle
// - S marks the start
// - E marks the end
//
// The search expands 4-neighbourhoods but connects cells in line of sight directly.

fn main() {
    let mut rows = vec![vec![0; 5]; 5];
    for row in rows.iter_mut().take(4) {
        row[2] = 1;
    }
    let grid = OccupancyGrid::from_rows(rows).unwrap();
    println!("{}", grid);
    let start = Point::new(0, 0);
    let end = Point::new(0, 4);
    let path = find_path(&grid, start, end);
    println!("Path:");
    for p in path {
        println!("{:?}", p);
    }
}
