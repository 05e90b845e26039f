use bit_set::BitSet;
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::cells::{CompassPrimary, CoordinateSmallVec, GridCoordinate};
use crate::errors::{MazeError, Result};
use crate::grid::Grid;
use crate::set_union::DisjointSets;
use crate::utils;

/// Perfect maze generation algorithms.
///
/// Each one turns a blank grid into a spanning tree of its cells, drawing every random
/// decision from the rng handed in, so a seeded rng always reproduces the same maze.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum Algorithm {
    RecursiveBacktracker,
    Kruskal,
    Ellers,
}

impl Default for Algorithm {
    fn default() -> Algorithm {
        Algorithm::RecursiveBacktracker
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            Algorithm::RecursiveBacktracker => "recursive-backtracker",
            Algorithm::Kruskal => "kruskal",
            Algorithm::Ellers => "ellers",
        };
        f.write_str(name)
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Algorithm, String> {
        match s.to_lowercase().as_str() {
            "backtracker" | "recursive-backtracker" => Ok(Algorithm::RecursiveBacktracker),
            "kruskal" => Ok(Algorithm::Kruskal),
            "ellers" | "eller" => Ok(Algorithm::Ellers),
            other => Err(format!("Unknown maze generation algorithm '{}'", other)),
        }
    }
}

/// Carve a perfect maze into a blank grid.
pub fn generate<R: Rng + ?Sized>(grid: &mut Grid, algorithm: Algorithm, rng: &mut R) -> Result<()> {
    generate_cancellable(grid, algorithm, rng, &AtomicBool::new(false))
}

/// As `generate`, but gives up with `Cancelled` at the next carve step once `cancel` is set.
/// A cancelled grid is left partially carved and should be thrown away.
pub fn generate_cancellable<R: Rng + ?Sized>(grid: &mut Grid,
                                             algorithm: Algorithm,
                                             rng: &mut R,
                                             cancel: &AtomicBool)
                                             -> Result<()> {
    match algorithm {
        Algorithm::RecursiveBacktracker => recursive_backtracker(grid, rng, cancel),
        Algorithm::Kruskal => kruskal(grid, rng, cancel),
        Algorithm::Ellers => ellers(grid, rng, cancel),
    }
}

/// Randomised depth first search carving, starting from the north west corner.
///
/// Walk from the cell on top of the stack to a random unvisited neighbour, knocking down the
/// wall between them. When a cell has no unvisited neighbours left, backtrack by popping it.
/// Every cell is visited exactly once, producing long winding corridors with few dead ends.
pub fn recursive_backtracker<R: Rng + ?Sized>(grid: &mut Grid,
                                              rng: &mut R,
                                              cancel: &AtomicBool)
                                              -> Result<()> {
    ensure_blank(grid)?;

    let index = grid.row_major_indexer();
    let mut visited = BitSet::with_capacity(grid.size());
    let start = GridCoordinate::new(0, 0);
    visited.insert(index(start));
    let mut stack = vec![start];

    while let Some(&current) = stack.last() {

        let unvisited_neighbours: CoordinateSmallVec = grid.neighbours(current)?
            .iter()
            .map(|neighbour| neighbour.coordinate)
            .filter(|coord| !visited.contains(index(*coord)))
            .collect();

        if unvisited_neighbours.is_empty() {
            stack.pop();
        } else {
            check_cancelled(cancel)?;
            // Forced moves through a corridor do not consume a draw
            let next = if unvisited_neighbours.len() == 1 {
                unvisited_neighbours[0]
            } else {
                unvisited_neighbours[rng.gen_range(0..unvisited_neighbours.len())]
            };
            grid.open_wall_between(current, next)?;
            visited.insert(index(next));
            stack.push(next);
        }
    }

    debug_assert_eq!(visited.len(), grid.size());
    Ok(())
}

/// Randomised Kruskal: repeatedly take a random interior wall out of the remaining pool and
/// knock it down unless the cells either side are already joined by some route.
pub fn kruskal<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R, cancel: &AtomicBool) -> Result<()> {
    ensure_blank(grid)?;

    let index = grid.row_major_indexer();
    let mut walls = interior_walls(grid);
    let mut sets = DisjointSets::new(grid.size());

    while sets.sets_count() > 1 && !walls.is_empty() {
        let (a, b) = walls.swap_remove(rng.gen_range(0..walls.len()));
        if sets.union(index(a), index(b)) {
            check_cancelled(cancel)?;
            grid.open_wall_between(a, b)?;
        }
    }

    Ok(())
}

/// Eller's algorithm, building the maze one row at a time.
///
/// Within a row, neighbouring cells from different sets are joined on a coin flip. Each set
/// then carves down into the next row at least once so no set is left cut off. The final row
/// joins every remaining pair of distinct sets, leaving a single connected tree.
pub fn ellers<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R, cancel: &AtomicBool) -> Result<()> {
    ensure_blank(grid)?;

    let index = grid.row_major_indexer();
    let mut sets = DisjointSets::new(grid.size());
    let last_row_index = grid.height().0 - 1;
    let rows = grid.iter_row().collect::<Vec<_>>();

    for (row_index, row) in rows.iter().enumerate() {
        let is_last_row = row_index == last_row_index;

        for pair in row.windows(2) {
            let (west, east) = (pair[0], pair[1]);
            if sets.connected(index(west), index(east)) {
                continue;
            }
            if is_last_row || rng.gen() {
                check_cancelled(cancel)?;
                grid.open_wall_between(west, east)?;
                sets.union(index(west), index(east));
            }
        }

        if is_last_row {
            break;
        }

        // Gather the row's cells by set, sets ordered by their westmost member
        let mut set_members: Vec<Vec<GridCoordinate>> = vec![];
        let mut set_positions = utils::fnv_hashmap(row.len());
        for &coord in row {
            let root = sets.find(index(coord));
            let position = *set_positions.entry(root).or_insert_with(|| {
                set_members.push(vec![]);
                set_members.len() - 1
            });
            set_members[position].push(coord);
        }

        for members in &set_members {
            let mut carve_down = members.iter()
                .cloned()
                .filter(|_| rng.gen())
                .collect::<Vec<_>>();
            if carve_down.is_empty() {
                carve_down.push(members[rng.gen_range(0..members.len())]);
            }

            for coord in carve_down {
                let below = GridCoordinate::new(coord.row + 1, coord.col);
                check_cancelled(cancel)?;
                grid.open_wall_between(coord, below)?;
                sets.union(index(coord), index(below));
            }
        }
    }

    Ok(())
}

/// Knock down up to `count` randomly chosen closed interior walls, adding loops so there is
/// more than one route between some cells. Returns how many walls were opened, which is less
/// than `count` only if the grid ran out of closed walls.
pub fn add_loops<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R, count: usize) -> Result<usize> {
    let mut closed_walls = interior_walls(grid)
        .into_iter()
        .filter(|&(a, b)| !grid.is_linked(a, b))
        .collect::<Vec<_>>();
    closed_walls.shuffle(rng);

    let opened = count.min(closed_walls.len());
    for &(a, b) in closed_walls.iter().take(opened) {
        log::trace!("Opening extra passage between {} and {}", a, b);
        grid.open_wall_between(a, b)?;
    }

    Ok(opened)
}

/// Every wall shared by two cells, row-major, the east wall of a cell before its south wall.
fn interior_walls(grid: &Grid) -> Vec<(GridCoordinate, GridCoordinate)> {
    let mut walls = vec![];
    for coord in grid.iter() {
        for &direction in &[CompassPrimary::East, CompassPrimary::South] {
            if let Some(neighbour) = grid.neighbour_at_direction(coord, direction) {
                walls.push((coord, neighbour));
            }
        }
    }
    walls
}

fn ensure_blank(grid: &Grid) -> Result<()> {
    if grid.is_blank() {
        Ok(())
    } else {
        Err(MazeError::AlreadyGenerated)
    }
}

#[inline]
fn check_cancelled(cancel: &AtomicBool) -> Result<()> {
    if cancel.load(Ordering::Relaxed) {
        Err(MazeError::Cancelled)
    } else {
        Ok(())
    }
}
