//! Best-first grid search with Theta*-style path relaxation. Follows the structure of
//! [pathfinding's astar function](https://docs.rs/pathfinding/latest/pathfinding/directed/astar/index.html):
//! a binary heap of cost holders that refer to nodes by index, except that nodes live in an
//! append-only arena so a parent index stays valid however often a position is improved.
use crate::line_of_sight::line_of_sight;
use crate::occupancy_grid::OccupancyGrid;
use crate::{euclidean_distance, Path, NEUMANN_OFFSETS};
use fxhash::{FxHashMap, FxHashSet};
use grid_util::point::Point;
use log::{debug, info, warn};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Controls how a search connects an expanded cell to its neighbours.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SearchMode {
    /// A neighbour visible from the grandparent is attached to the grandparent directly, at the
    /// cost of the straight-line distance.
    #[default]
    Theta,
    /// Plain 4-connected A* where every step costs one.
    Grid,
}

struct SmallestCostHolder {
    estimated_cost: f32,
    cost: f32,
    index: usize,
}

impl Eq for SmallestCostHolder {}

impl PartialEq for SmallestCostHolder {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for SmallestCostHolder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SmallestCostHolder {
    fn cmp(&self, other: &Self) -> Ordering {
        // Lowest estimated cost first, ties go to the larger cost so far
        match other.estimated_cost.total_cmp(&self.estimated_cost) {
            Ordering::Equal => self.cost.total_cmp(&other.cost),
            s => s,
        }
    }
}

#[derive(Clone, Debug)]
struct SearchNode {
    position: Point,
    parent: Option<usize>,
    g: f32,
    h: f32,
}

impl SearchNode {
    fn f(&self) -> f32 {
        self.g + self.h
    }
}

fn reverse_path(arena: &[SearchNode], index: usize) -> Path {
    let mut path = std::iter::successors(Some(index), |&i| arena[i].parent)
        .map(|i| arena[i].position)
        .collect::<Path>();
    path.reverse();
    path
}

/// Runs the search without any reachability pre-checks. Returns an empty path if the open set
/// runs dry before the goal is popped.
pub(crate) fn any_angle_search(
    grid: &OccupancyGrid,
    start: Point,
    goal: Point,
    mode: SearchMode,
) -> Path {
    let mut arena = vec![SearchNode {
        position: start,
        parent: None,
        g: 0.0,
        h: euclidean_distance(start, goal),
    }];
    let mut best_known: FxHashMap<Point, usize> = FxHashMap::default();
    best_known.insert(start, 0);
    let mut closed: FxHashSet<Point> = FxHashSet::default();
    let mut to_see = BinaryHeap::new();
    to_see.push(SmallestCostHolder {
        estimated_cost: arena[0].f(),
        cost: 0.0,
        index: 0,
    });

    while let Some(SmallestCostHolder { index, .. }) = to_see.pop() {
        let current = arena[index].clone();
        // Stale entries for already expanded positions are skipped
        if !closed.insert(current.position) {
            continue;
        }
        if current.position == goal {
            debug!(
                "Reached {} after expanding {} cells ({} nodes created)",
                goal,
                closed.len(),
                arena.len()
            );
            return reverse_path(&arena, index);
        }
        for &(dx, dy) in NEUMANN_OFFSETS.iter() {
            let neighbour = Point::new(current.position.x + dx, current.position.y + dy);
            if !grid.is_free(neighbour) {
                continue;
            }
            let grandparent = match mode {
                SearchMode::Theta => current
                    .parent
                    .filter(|&p| line_of_sight(grid, arena[p].position, neighbour)),
                SearchMode::Grid => None,
            };
            let (parent, g) = match grandparent {
                Some(p) => (
                    p,
                    arena[p].g + euclidean_distance(arena[p].position, neighbour),
                ),
                None => (index, current.g + 1.0),
            };
            if let Some(&known) = best_known.get(&neighbour) {
                if arena[known].g <= g {
                    continue;
                }
            }
            let node = SearchNode {
                position: neighbour,
                parent: Some(parent),
                g,
                h: euclidean_distance(neighbour, goal),
            };
            let n = arena.len();
            to_see.push(SmallestCostHolder {
                estimated_cost: node.f(),
                cost: g,
                index: n,
            });
            arena.push(node);
            best_known.insert(neighbour, n);
        }
    }
    debug!(
        "Open set exhausted after expanding {} cells without reaching {}",
        closed.len(),
        goal
    );
    Vec::new()
}

/// Computes a path from start to end using Theta*. An empty path means that no route exists.
/// See [find_path_with_mode] for details.
pub fn find_path(grid: &OccupancyGrid, start: Point, end: Point) -> Path {
    find_path_with_mode(grid, start, end, SearchMode::Theta)
}

/// Computes a path from start to end with the given [SearchMode]. A start equal to the end gives
/// a single-element path, and a start outside the grid or on a blocked cell gives an empty one.
/// If the grid's components are up to date and put start and end on different components, the
/// search is skipped altogether.
pub fn find_path_with_mode(
    grid: &OccupancyGrid,
    start: Point,
    end: Point,
    mode: SearchMode,
) -> Path {
    if start == end {
        return vec![start];
    }
    if !grid.is_free(start) {
        info!("Start {} is blocked or outside the grid", start);
        return Vec::new();
    }
    let known_unreachable = !grid.components_dirty && grid.unreachable(&start, &end);
    if known_unreachable {
        info!("{} is not reachable from {}", end, start);
        return Vec::new();
    }
    let path = any_angle_search(grid, start, end, mode);
    if path.is_empty() && !grid.components_dirty {
        warn!("Reachable goal could not be pathed to, are the components correct?");
    }
    path
}
