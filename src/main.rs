use docopt::Docopt;
use error_chain::bail;
use log::LevelFilter;
use perfect_mazes::{
    cells::GridCoordinate,
    generators::Algorithm,
    grid::Grid,
    grid_displays::{PathDisplay, StartEndPointsDisplay},
    pathing::{self, Path},
    units::{Height, Width},
    EngineConfig, MazeEngine, SeedSource,
};
use serde_derive::Deserialize;

const USAGE: &str = "Mazes

Usage:
    mazes_driver -h | --help
    mazes_driver [options]

Options:
    -h --help               Show this screen.
    --grid-size=<n>         The grid size is n * n.
    --grid-width=<w>        The grid width in a w*h grid [default: 20].
    --grid-height=<h>       The grid height in a w*h grid [default: 20].
    --seed=<s>              Seed for the maze generator. A random seed is used and printed if not given.
    --algorithm=<name>      Generation algorithm: backtracker, kruskal or ellers [default: backtracker].
    --extra-passages=<n>    Knock down n extra walls after generation, adding loops [default: 0].
    --show-path             Show the path from the start to the end point. Uses the longest path in the maze for any point not given.
    --show-distances        Show the distance from the start point to every other cell, in hexadecimal.
    --start-x=<x>           Column of the path start.
    --start-y=<y>           Row of the path start.
    --end-x=<x>             Column of the path end.
    --end-y=<y>             Row of the path end.
    -v --verbose            Log generation and solving details to stderr.
";
#[derive(Debug, Deserialize)]
struct MazeArgs {
    flag_grid_size: Option<usize>,
    flag_grid_width: usize,
    flag_grid_height: usize,
    flag_seed: Option<u64>,
    flag_algorithm: String,
    flag_extra_passages: usize,
    flag_show_path: bool,
    flag_show_distances: bool,
    flag_start_x: Option<u32>,
    flag_start_y: Option<u32>,
    flag_end_x: Option<u32>,
    flag_end_y: Option<u32>,
    flag_verbose: bool,
}

mod errors {
    use error_chain::*;
    error_chain! {

        foreign_links {
            DocOptFailure(::docopt::Error);
            MazeFailure(::perfect_mazes::MazeError);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    env_logger::Builder::from_default_env()
        .filter_level(if args.flag_verbose { LevelFilter::Debug } else { LevelFilter::Warn })
        .init();

    let (width, height) = if let Some(square_grid_size) = args.flag_grid_size {
        (square_grid_size, square_grid_size)
    } else {
        (args.flag_grid_width, args.flag_grid_height)
    };
    let algorithm: Algorithm = args.flag_algorithm.parse()?;

    let engine = MazeEngine::new(EngineConfig {
        width: Width(width),
        height: Height(height),
        algorithm,
        seed: args.flag_seed.map_or(SeedSource::Entropy, SeedSource::Fixed),
        extra_passages: args.flag_extra_passages,
    });

    let (maze_grid, seed) = engine.generate_default()
        .chain_err(|| format!("Failed to generate a {}x{} maze", width, height))?;
    if args.flag_seed.is_none() {
        println!("seed: {}", seed);
    }

    let start_opt = point_from_args("start", args.flag_start_x, args.flag_start_y)?;
    let end_opt = point_from_args("end", args.flag_end_x, args.flag_end_y)?;

    if args.flag_show_distances {

        let start = match start_opt {
            Some(start) => start,
            None => engine.solve_longest(&maze_grid)?.start(),
        };
        let distances = pathing::Distances::for_grid(&maze_grid, start)
            .chain_err(|| "Invalid start point from which to show distances")?;
        println!("{}", maze_grid.display_with(&distances));

    } else if args.flag_show_path {

        let path = path_from_args(&engine, &maze_grid, start_opt, end_opt)?;
        println!("{}", maze_grid.display_with(&PathDisplay::new(&path)));

    } else {

        // Mark whichever of the start and end points were given
        let starts = start_opt.into_iter().collect::<Vec<_>>();
        let ends = end_opt.into_iter().collect::<Vec<_>>();
        println!("{}", maze_grid.display_with(&StartEndPointsDisplay::new(&starts, &ends)));
    }

    Ok(())
}

/// A point needs both of its halves, giving just one is a usage error.
fn point_from_args(name: &str, x: Option<u32>, y: Option<u32>) -> Result<Option<GridCoordinate>> {
    match (x, y) {
        (Some(col), Some(row)) => Ok(Some(GridCoordinate::new(row, col))),
        (None, None) => Ok(None),
        _ => bail!("Both --{0}-x and --{0}-y are required to set the {0} point", name),
    }
}

/// The path between the given points. A missing point is taken from the longest path in the
/// maze, or from the furthest cell from the other point when only one is given.
fn path_from_args(engine: &MazeEngine,
                  maze_grid: &Grid,
                  start_opt: Option<GridCoordinate>,
                  end_opt: Option<GridCoordinate>)
                  -> Result<Path> {

    let (start, end) = match (start_opt, end_opt) {
        (Some(start), Some(end)) => (start, end),
        (Some(point), None) | (None, Some(point)) => {
            let distances = pathing::Distances::for_grid(maze_grid, point)
                .chain_err(|| format!("Invalid path point {}", point))?;
            let furthest = distances.furthest_points()
                .first()
                .cloned()
                .unwrap_or(point);
            if start_opt.is_some() { (point, furthest) } else { (furthest, point) }
        }
        (None, None) => return Ok(engine.solve_longest(maze_grid)?),
    };

    engine.solve(maze_grid, start, end)
        .chain_err(|| format!("Failed to find a path from {} to {}", start, end))
}
