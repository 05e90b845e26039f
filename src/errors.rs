use thiserror::Error;

use crate::cells::GridCoordinate;

/// Everything that can go wrong inside the maze engine.
///
/// None of these are worth retrying: the engine is deterministic, so the same inputs
/// always fail the same way.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum MazeError {
    #[error("Invalid grid dimensions {width}x{height}")]
    InvalidDimension { width: usize, height: usize },
    #[error("Cells {0} and {1} are not adjacent")]
    NotAdjacent(GridCoordinate, GridCoordinate),
    #[error("Coordinate {0} is outside the grid")]
    OutOfBounds(GridCoordinate),
    #[error("Grid already has passages carved, generators need a blank grid")]
    AlreadyGenerated,
    #[error("No path from {start} to {goal}")]
    NoPathExists {
        start: GridCoordinate,
        goal: GridCoordinate,
    },
    #[error("Maze generation was cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, MazeError>;
