//! **perfect_mazes** generates perfect mazes on rectangular grids, finds routes through them
//! and renders them as text.

pub mod cells;
pub mod engine;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod grid_iterators;
pub mod grid_traits;
pub mod pathing;
pub mod set_union;
pub mod units;
mod utils;

pub use crate::engine::{EngineConfig, MazeEngine, SeedSource};
pub use crate::errors::{MazeError, Result};
