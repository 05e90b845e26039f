use itertools::Itertools;
use smallvec::SmallVec;
use std::collections::VecDeque;
use std::slice;

use crate::cells::GridCoordinate;
use crate::errors::{MazeError, Result};
use crate::grid::Grid;
use crate::utils::{self, FnvHashMap};

/// A route through a maze, from its start cell to its goal cell inclusive. Consecutive cells
/// are adjacent with an open wall between them. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    cells: Vec<GridCoordinate>,
}

impl Path {
    fn single(coord: GridCoordinate) -> Path {
        Path { cells: vec![coord] }
    }

    #[inline]
    pub fn cells(&self) -> &[GridCoordinate] {
        &self.cells
    }

    /// Number of moves from start to goal.
    #[inline]
    pub fn steps(&self) -> usize {
        self.cells.len() - 1
    }

    #[inline]
    pub fn start(&self) -> GridCoordinate {
        self.cells[0]
    }

    #[inline]
    pub fn goal(&self) -> GridCoordinate {
        self.cells[self.cells.len() - 1]
    }

    pub fn iter(&self) -> slice::Iter<'_, GridCoordinate> {
        self.cells.iter()
    }

    /// Could the path actually be walked on `grid`: every cell in bounds and every step
    /// through an open wall?
    pub fn is_walkable_on(&self, grid: &Grid) -> bool {
        self.cells.iter().all(|coord| grid.is_valid_coordinate(*coord)) &&
        self.cells
            .iter()
            .tuple_windows()
            .all(|(a, b)| grid.is_linked(*a, *b))
    }

    pub fn into_vec(self) -> Vec<GridCoordinate> {
        self.cells
    }
}

impl IntoIterator for Path {
    type Item = GridCoordinate;
    type IntoIter = ::std::vec::IntoIter<GridCoordinate>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.into_iter()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a GridCoordinate;
    type IntoIter = slice::Iter<'a, GridCoordinate>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

/// Per cell search marker, only alive for the duration of one `solve` call.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
enum VisitState {
    Unvisited,
    Frontier,
    Visited,
}

/// Breadth first search from `start` to `goal` through open walls.
///
/// The returned path has the fewest cells of any route, loops or not. Neighbours are
/// explored north, east, south then west so ties between equally short routes always resolve
/// the same way. `NoPathExists` means the grid is not connected, which a generated perfect
/// maze never is.
pub fn solve(grid: &Grid, start: GridCoordinate, goal: GridCoordinate) -> Result<Path> {
    grid.check_coordinate(start)?;
    grid.check_coordinate(goal)?;

    if start == goal {
        return Ok(Path::single(start));
    }

    let index = grid.row_major_indexer();
    let mut visit_states = vec![VisitState::Unvisited; grid.size()];
    let mut predecessors: FnvHashMap<GridCoordinate, GridCoordinate> =
        utils::fnv_hashmap(grid.size());
    let mut frontier = VecDeque::new();

    visit_states[index(start)] = VisitState::Frontier;
    frontier.push_back(start);

    while let Some(current) = frontier.pop_front() {
        visit_states[index(current)] = VisitState::Visited;

        if current == goal {
            return Ok(reconstruct_path(&predecessors, goal));
        }

        for &next in grid.links(current)?.iter() {
            if visit_states[index(next)] == VisitState::Unvisited {
                visit_states[index(next)] = VisitState::Frontier;
                predecessors.insert(next, current);
                frontier.push_back(next);
            }
        }
    }

    Err(MazeError::NoPathExists { start, goal })
}

/// Follow predecessors back from the goal. The start cell is the only visited cell without
/// a predecessor.
fn reconstruct_path(predecessors: &FnvHashMap<GridCoordinate, GridCoordinate>,
                    goal: GridCoordinate)
                    -> Path {
    let mut cells = vec![goal];
    let mut current = goal;
    while let Some(&previous) = predecessors.get(&current) {
        cells.push(previous);
        current = previous;
    }
    cells.reverse();
    Path { cells }
}

/// Flood fill step counts from one start cell to every cell reachable from it.
#[derive(Debug, Clone)]
pub struct Distances {
    start_coordinate: GridCoordinate,
    distances: FnvHashMap<GridCoordinate, u32>,
    max_distance: u32,
}

impl Distances {
    pub fn for_grid(grid: &Grid, start_coordinate: GridCoordinate) -> Result<Distances> {
        grid.check_coordinate(start_coordinate)?;

        let mut max = 0;
        let mut distances = utils::fnv_hashmap(grid.size());
        distances.insert(start_coordinate, 0);

        // Links are unweighted, so the first time a cell is reached is by a shortest route and
        // its distance never needs revising. The distances map doubles as the visited set.
        let mut frontier = vec![start_coordinate];
        let mut distance = 0;
        while !frontier.is_empty() {
            distance += 1;
            let mut new_frontier = vec![];
            for cell_coord in &frontier {
                for &link_coordinate in grid.links(*cell_coord)?.iter() {
                    if !distances.contains_key(&link_coordinate) {
                        distances.insert(link_coordinate, distance);
                        new_frontier.push(link_coordinate);
                        max = distance;
                    }
                }
            }
            frontier = new_frontier;
        }

        Ok(Distances {
            start_coordinate,
            distances,
            max_distance: max,
        })
    }

    #[inline(always)]
    pub fn start(&self) -> GridCoordinate {
        self.start_coordinate
    }

    #[inline(always)]
    pub fn max(&self) -> u32 {
        self.max_distance
    }

    /// Steps from the start to `coord`, None if it cannot be reached.
    #[inline(always)]
    pub fn distance_to(&self, coord: GridCoordinate) -> Option<u32> {
        self.distances.get(&coord).cloned()
    }

    pub fn reachable_count(&self) -> usize {
        self.distances.len()
    }

    /// The cells at the maximum distance from the start, sorted by coordinate.
    pub fn furthest_points(&self) -> SmallVec<[GridCoordinate; 8]> {
        let furthest_distance = self.max();
        let mut furthest = self.distances
            .iter()
            .filter(|&(_, distance)| *distance == furthest_distance)
            .map(|(coord, _)| *coord)
            .collect::<SmallVec<[GridCoordinate; 8]>>();
        furthest.sort();
        furthest
    }

    /// A shortest route from the start to `end`, found by walking downhill through the
    /// distances. Works independently of `solve`. The distances must have been computed on
    /// `grid`, otherwise the walk stalls and None is returned.
    pub fn path_to(&self, grid: &Grid, end_point: GridCoordinate) -> Option<Path> {
        let mut current_distance = self.distance_to(end_point)?;
        let mut cells = vec![end_point];
        let mut current_coord = end_point;

        while current_coord != self.start_coordinate {
            let closer = grid.links(current_coord)
                .ok()?
                .iter()
                .cloned()
                .find(|link| self.distance_to(*link) == current_distance.checked_sub(1))?;
            current_coord = closer;
            current_distance -= 1;
            cells.push(current_coord);
        }

        cells.reverse();
        Some(Path { cells })
    }
}

/// The longest route in the maze.
///
/// The cell furthest from an arbitrary cell is one end of the longest path, and the cell
/// furthest from that is the other end. Exact for perfect mazes; with loops it is a long path
/// but not necessarily the longest.
pub fn longest_path(grid: &Grid) -> Result<Path> {
    let origin = GridCoordinate::new(0, 0);
    let first_distances = Distances::for_grid(grid, origin)?;
    let path_start = first_distances.furthest_points()
        .first()
        .cloned()
        .unwrap_or(origin);

    let distances_from_start = Distances::for_grid(grid, path_start)?;
    let path_end = distances_from_start.furthest_points()
        .first()
        .cloned()
        .unwrap_or(path_start);

    distances_from_start
        .path_to(grid, path_end)
        .ok_or(MazeError::NoPathExists {
                   start: path_start,
                   goal: path_end,
               })
}

#[cfg(test)]
mod tests {

    use quickcheck::{QuickCheck, TestResult};
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    use super::*;
    use crate::generators::{self, Algorithm};
    use crate::units::{Height, Width};

    static OUT_OF_GRID_COORDINATE: GridCoordinate = GridCoordinate {
        row: u32::max_value(),
        col: u32::max_value(),
    };

    fn gc(row: u32, col: u32) -> GridCoordinate {
        GridCoordinate::new(row, col)
    }

    fn blank(w: usize, h: usize) -> Grid {
        Grid::new(Width(w), Height(h)).expect("valid grid dimensions")
    }

    fn maze(w: usize, h: usize, algorithm: Algorithm, seed: u64) -> Grid {
        let mut g = blank(w, h);
        let mut rng = XorShiftRng::seed_from_u64(seed);
        generators::generate(&mut g, algorithm, &mut rng).expect("generation failed");
        g
    }

    fn open_grid(w: usize, h: usize) -> Grid {
        let mut g = blank(w, h);
        for coord in g.iter().collect::<Vec<_>>() {
            for neighbour in g.neighbours(coord).unwrap() {
                g.open_wall_between(coord, neighbour.coordinate).unwrap();
            }
        }
        g
    }

    #[test]
    fn single_cell_path() {
        let g = blank(1, 1);
        let path = solve(&g, gc(0, 0), gc(0, 0)).unwrap();
        assert_eq!(path.cells(), &[gc(0, 0)]);
        assert_eq!(path.steps(), 0);
        assert!(path.is_walkable_on(&g));
    }

    #[test]
    fn start_equals_goal_on_a_larger_maze() {
        let g = maze(6, 6, Algorithm::Kruskal, 8);
        let path = solve(&g, gc(3, 2), gc(3, 2)).unwrap();
        assert_eq!(path.cells().len(), 1);
        assert_eq!(path.start(), path.goal());
    }

    #[test]
    fn five_by_five_seed_42() {
        let g = maze(5, 5, Algorithm::RecursiveBacktracker, 42);
        let path = solve(&g, gc(0, 0), gc(4, 4)).unwrap();
        assert_eq!(path.start(), gc(0, 0));
        assert_eq!(path.goal(), gc(4, 4));
        assert!(path.is_walkable_on(&g));
        assert!(path.steps() >= 8);
        assert!(path.steps() <= 24);

        let again = solve(&maze(5, 5, Algorithm::RecursiveBacktracker, 42), gc(0, 0), gc(4, 4))
            .unwrap();
        assert_eq!(path, again);
    }

    #[test]
    fn out_of_bounds_endpoints() {
        let g = maze(4, 3, Algorithm::Ellers, 1);
        assert_eq!(solve(&g, gc(3, 0), gc(0, 0)), Err(MazeError::OutOfBounds(gc(3, 0))));
        assert_eq!(solve(&g, gc(0, 0), gc(0, 4)), Err(MazeError::OutOfBounds(gc(0, 4))));
    }

    #[test]
    fn unreachable_goal() {
        let g = blank(3, 3);
        assert_eq!(solve(&g, gc(0, 0), gc(2, 2)),
                   Err(MazeError::NoPathExists {
                           start: gc(0, 0),
                           goal: gc(2, 2),
                       }));
    }

    #[test]
    fn shortest_path_with_loops_and_fixed_tie_break() {
        let g = open_grid(2, 2);
        let path = solve(&g, gc(0, 0), gc(1, 1)).unwrap();
        // East is explored before south
        assert_eq!(path.cells(), &[gc(0, 0), gc(0, 1), gc(1, 1)]);

        let g = open_grid(5, 5);
        let path = solve(&g, gc(0, 0), gc(4, 4)).unwrap();
        assert_eq!(path.steps(), 8);
        assert!(path.is_walkable_on(&g));
    }

    #[test]
    fn solve_matches_reference_path_in_perfect_maze() {
        let g = maze(9, 7, Algorithm::RecursiveBacktracker, 2024);
        let start = gc(0, 0);
        let distances = Distances::for_grid(&g, start).unwrap();
        for goal in g.iter() {
            let solved = solve(&g, start, goal).unwrap();
            let reference = distances.path_to(&g, goal).unwrap();
            assert_eq!(solved, reference);
            assert_eq!(solved.steps() as u32, distances.distance_to(goal).unwrap());
        }
    }

    #[test]
    fn path_iteration() {
        let g = open_grid(3, 1);
        let path = solve(&g, gc(0, 0), gc(0, 2)).unwrap();
        assert_eq!((&path).into_iter().count(), 3);
        assert_eq!(path.iter().cloned().collect::<Vec<_>>(), path.clone().into_vec());
        assert_eq!(path.into_iter().last(), Some(gc(0, 2)));
    }

    #[test]
    fn path_walkability() {
        let g = blank(3, 3);
        let path = Path { cells: vec![gc(0, 0), gc(0, 1)] };
        assert!(!path.is_walkable_on(&g));
        let outside = Path { cells: vec![OUT_OF_GRID_COORDINATE] };
        assert!(!outside.is_walkable_on(&g));
    }

    #[test]
    fn distances_construction_requires_valid_start_coordinate() {
        let g = blank(3, 3);
        assert_eq!(Distances::for_grid(&g, OUT_OF_GRID_COORDINATE).unwrap_err(),
                   MazeError::OutOfBounds(OUT_OF_GRID_COORDINATE));
    }

    #[test]
    fn distances_to_unreachable_cells_is_none() {
        let g = blank(3, 3);
        let start_coordinate = gc(0, 0);
        let distances = Distances::for_grid(&g, start_coordinate).unwrap();
        assert_eq!(distances.start(), start_coordinate);
        for coord in g.iter() {
            if coord != start_coordinate {
                assert!(distances.distance_to(coord).is_none());
            } else {
                assert_eq!(distances.distance_to(coord), Some(0));
            }
        }
        assert_eq!(distances.reachable_count(), 1);
        assert_eq!(distances.path_to(&g, gc(2, 2)), None);
    }

    #[test]
    fn distances_on_open_grid() {
        let g = open_grid(2, 2);
        let distances = Distances::for_grid(&g, gc(0, 0)).unwrap();
        assert_eq!(distances.distance_to(gc(0, 0)), Some(0));
        assert_eq!(distances.distance_to(gc(0, 1)), Some(1));
        assert_eq!(distances.distance_to(gc(1, 0)), Some(1));
        assert_eq!(distances.distance_to(gc(1, 1)), Some(2));
        assert_eq!(distances.max(), 2);
        assert_eq!(&*distances.furthest_points(), &[gc(1, 1)]);
    }

    #[test]
    fn longest_path_of_a_corridor() {
        let g = maze(6, 1, Algorithm::Ellers, 3);
        let path = longest_path(&g).unwrap();
        assert_eq!(path.steps(), 5);
        let mut ends = vec![path.start(), path.goal()];
        ends.sort();
        assert_eq!(ends, vec![gc(0, 0), gc(0, 5)]);
    }

    #[test]
    fn longest_path_is_longest() {
        let g = maze(8, 8, Algorithm::Kruskal, 77);
        let longest = longest_path(&g).unwrap();
        assert!(longest.is_walkable_on(&g));
        for start in g.iter().step_by(7) {
            let distances = Distances::for_grid(&g, start).unwrap();
            assert!(distances.max() as usize <= longest.steps());
        }
    }

    #[test]
    fn quickcheck_solve_agrees_with_flood_fill() {
        fn prop(w: u8, h: u8, seed: u64, a: u16, b: u16) -> TestResult {
            let (w, h) = (1 + (w % 12) as usize, 1 + (h % 12) as usize);
            let g = maze(w, h, Algorithm::Kruskal, seed);
            let start = g.index_to_coordinate(a as usize % g.size()).unwrap();
            let goal = g.index_to_coordinate(b as usize % g.size()).unwrap();

            let solved = match solve(&g, start, goal) {
                Ok(path) => path,
                Err(_) => return TestResult::failed(),
            };
            let reference = Distances::for_grid(&g, start)
                .ok()
                .and_then(|distances| distances.path_to(&g, goal));
            TestResult::from_bool(Some(&solved) == reference.as_ref() &&
                                  solved.is_walkable_on(&g))
        }
        QuickCheck::new()
            .tests(100)
            .quickcheck(prop as fn(u8, u8, u64, u16, u16) -> TestResult);
    }
}
