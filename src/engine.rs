use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use std::sync::atomic::AtomicBool;

use crate::cells::GridCoordinate;
use crate::errors::Result;
use crate::generators::{self, Algorithm};
use crate::grid::Grid;
use crate::pathing::{self, Path};
use crate::units::{Height, Width};

/// Where `MazeEngine::generate_default` takes its seed from.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum SeedSource {
    Fixed(u64),
    /// A fresh seed from the thread local rng on every call.
    Entropy,
}

impl SeedSource {
    fn next_seed(self) -> u64 {
        match self {
            SeedSource::Fixed(seed) => seed,
            SeedSource::Entropy => rand::thread_rng().gen(),
        }
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct EngineConfig {
    pub width: Width,
    pub height: Height,
    pub algorithm: Algorithm,
    pub seed: SeedSource,
    /// Walls knocked down after generation. Zero keeps the maze perfect.
    pub extra_passages: usize,
}

impl Default for EngineConfig {
    fn default() -> EngineConfig {
        EngineConfig {
            width: Width(20),
            height: Height(20),
            algorithm: Algorithm::default(),
            seed: SeedSource::Entropy,
            extra_passages: 0,
        }
    }
}

/// Generates and solves mazes. Holds nothing but its configuration, every grid it hands out
/// belongs to the caller.
#[derive(Default, Debug, Clone)]
pub struct MazeEngine {
    config: EngineConfig,
}

impl MazeEngine {
    pub fn new(config: EngineConfig) -> MazeEngine {
        MazeEngine { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build a `width` x `height` maze with the configured algorithm. The same seed always
    /// gives the same maze.
    pub fn generate(&self, width: Width, height: Height, seed: u64) -> Result<Grid> {
        self.generate_cancellable(width, height, seed, &AtomicBool::new(false))
    }

    /// Build a maze with the configured dimensions and seed source, returning the seed used.
    pub fn generate_default(&self) -> Result<(Grid, u64)> {
        let seed = self.config.seed.next_seed();
        let grid = self.generate(self.config.width, self.config.height, seed)?;
        Ok((grid, seed))
    }

    /// As `generate`, failing with `Cancelled` soon after `cancel` is set from another thread.
    pub fn generate_cancellable(&self,
                                width: Width,
                                height: Height,
                                seed: u64,
                                cancel: &AtomicBool)
                                -> Result<Grid> {
        let mut grid = Grid::new(width, height)?;
        let mut rng = XorShiftRng::seed_from_u64(seed);
        generators::generate_cancellable(&mut grid, self.config.algorithm, &mut rng, cancel)?;

        if self.config.extra_passages > 0 {
            generators::add_loops(&mut grid, &mut rng, self.config.extra_passages)?;
        }

        log::debug!("Generated {}x{} maze with {}, seed {}, {} open walls",
                    width.0,
                    height.0,
                    self.config.algorithm,
                    seed,
                    grid.open_walls_count());
        Ok(grid)
    }

    pub fn solve(&self, grid: &Grid, start: GridCoordinate, goal: GridCoordinate) -> Result<Path> {
        let path = pathing::solve(grid, start, goal)?;
        log::debug!("Solved {} to {} in {} steps", start, goal, path.steps());
        Ok(path)
    }

    /// The longest shortest path in the maze, between two of its furthest apart cells.
    pub fn solve_longest(&self, grid: &Grid) -> Result<Path> {
        let path = pathing::longest_path(grid)?;
        log::debug!("Longest path {} to {} in {} steps", path.start(), path.goal(), path.steps());
        Ok(path)
    }
}
