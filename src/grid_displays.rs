use smallvec::SmallVec;
use std::fmt;

use crate::cells::{CompassPrimary, GridCoordinate};
use crate::grid::Grid;
use crate::grid_traits::GridDisplay;
use crate::pathing::{Distances, Path};
use crate::utils::{self, FnvHashSet};

impl GridDisplay for Distances {
    fn render_cell_body(&self, coord: GridCoordinate) -> String {
        if let Some(d) = self.distance_to(coord) {
            // centre align, padding 3, lowercase hexadecimal
            format!("{:^3x}", d)
        } else {
            String::from("   ")
        }
    }
}

#[derive(Debug)]
pub struct PathDisplay {
    on_path_coordinates: FnvHashSet<GridCoordinate>,
}
impl PathDisplay {
    pub fn new(path: &Path) -> Self {
        let mut on_path_coordinates = utils::fnv_hashset(path.cells().len());
        on_path_coordinates.extend(path.iter().cloned());
        PathDisplay { on_path_coordinates }
    }
}
impl GridDisplay for PathDisplay {
    fn render_cell_body(&self, coord: GridCoordinate) -> String {
        if self.on_path_coordinates.contains(&coord) {
            String::from(" . ")
        } else {
            String::from("   ")
        }
    }
}

#[derive(Debug)]
pub struct StartEndPointsDisplay {
    start_coordinates: SmallVec<[GridCoordinate; 4]>,
    end_coordinates: SmallVec<[GridCoordinate; 4]>,
}
impl StartEndPointsDisplay {
    pub fn new(starts: &[GridCoordinate], ends: &[GridCoordinate]) -> StartEndPointsDisplay {
        StartEndPointsDisplay {
            start_coordinates: starts.iter().cloned().collect(),
            end_coordinates: ends.iter().cloned().collect(),
        }
    }
}
impl GridDisplay for StartEndPointsDisplay {
    fn render_cell_body(&self, coord: GridCoordinate) -> String {
        if self.start_coordinates.contains(&coord) {
            String::from(" S ")
        } else if self.end_coordinates.contains(&coord) {
            String::from(" E ")
        } else {
            String::from("   ")
        }
    }
}

/// A grid rendered with cell bodies supplied by a `GridDisplay`.
pub struct DisplayWith<'a> {
    grid: &'a Grid,
    displayer: &'a dyn GridDisplay,
}

impl Grid {
    pub fn display_with<'a>(&'a self, displayer: &'a dyn GridDisplay) -> DisplayWith<'a> {
        DisplayWith {
            grid: self,
            displayer,
        }
    }
}

impl<'a> fmt::Display for DisplayWith<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&render_grid(self.grid, Some(self.displayer)))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&render_grid(self, None))
    }
}

fn render_grid(grid: &Grid, displayer: Option<&dyn GridDisplay>) -> String {
    const WALL_L: &str = "╴";
    const WALL_R: &str = "╶";
    const WALL_U: &str = "╵";
    const WALL_D: &str = "╷";
    const WALL_LR_3: &str = "───";
    const WALL_LR: &str = "─";
    const WALL_UD: &str = "│";
    const WALL_LD: &str = "┐";
    const WALL_RU: &str = "└";
    const WALL_LU: &str = "┘";
    const WALL_RD: &str = "┌";
    const WALL_LRU: &str = "┴";
    const WALL_LRD: &str = "┬";
    const WALL_LRUD: &str = "┼";
    const WALL_RUD: &str = "├";
    const WALL_LUD: &str = "┤";

    let columns_count = grid.width().0;
    let rows_count = grid.height().0;

    // Start by special case rendering the text for the north most boundary
    let mut output = String::from(WALL_RD);
    for col in 0..columns_count {
        let coord = GridCoordinate::new(0, col as u32);
        output.push_str(WALL_LR_3);
        if grid.is_neighbour_linked(coord, CompassPrimary::East) {
            output.push_str(WALL_LR);
        } else if col == columns_count - 1 {
            output.push_str(WALL_LD);
        } else {
            output.push_str(WALL_LRD);
        }
    }
    output.push('\n');

    for (index_row, row) in grid.iter_row().enumerate() {

        let is_last_row = index_row == rows_count - 1;

        // Each row renders its cell bodies with east walls, then its south walls with the
        // corners below. The north walls were drawn by the row above.
        let mut row_middle_section_render = String::from(WALL_UD);
        let mut row_bottom_section_render = String::new();

        for (index_column, cell_coord) in row.into_iter().enumerate() {

            let is_first_column = index_column == 0;
            let is_last_column = index_column == columns_count - 1;
            let east_open = grid.is_neighbour_linked(cell_coord, CompassPrimary::East);
            let south_open = grid.is_neighbour_linked(cell_coord, CompassPrimary::South);

            match displayer {
                Some(d) => row_middle_section_render.push_str(&d.render_cell_body(cell_coord)),
                None => row_middle_section_render.push_str("   "),
            }
            row_middle_section_render.push_str(if east_open { " " } else { WALL_UD });

            if is_first_column {
                row_bottom_section_render.push_str(if is_last_row {
                                                       WALL_RU
                                                   } else if south_open {
                                                       WALL_UD
                                                   } else {
                                                       WALL_RUD
                                                   });
            }
            row_bottom_section_render.push_str(if south_open { "   " } else { WALL_LR_3 });

            let corner = match (is_last_row, is_last_column) {
                (true, true) => WALL_LU,
                (true, false) => if east_open { WALL_LR } else { WALL_LRU },
                (false, true) => if south_open { WALL_UD } else { WALL_LUD },
                (false, false) => {
                    let access_se_from_east =
                        grid.neighbour_at_direction(cell_coord, CompassPrimary::East)
                            .map_or(false,
                                    |c| grid.is_neighbour_linked(c, CompassPrimary::South));
                    let access_se_from_south =
                        grid.neighbour_at_direction(cell_coord, CompassPrimary::South)
                            .map_or(false,
                                    |c| grid.is_neighbour_linked(c, CompassPrimary::East));
                    let show_left_section = !south_open;
                    let show_right_section = !access_se_from_east;
                    let show_up_section = !east_open;
                    let show_down_section = !access_se_from_south;

                    match (show_left_section,
                           show_right_section,
                           show_up_section,
                           show_down_section) {
                        (true, true, true, true) => WALL_LRUD,
                        (true, true, true, false) => WALL_LRU,
                        (true, true, false, true) => WALL_LRD,
                        (true, false, true, true) => WALL_LUD,
                        (false, true, true, true) => WALL_RUD,
                        (true, true, false, false) => WALL_LR,
                        (false, false, true, true) => WALL_UD,
                        (false, true, true, false) => WALL_RU,
                        (true, false, false, true) => WALL_LD,
                        (true, false, true, false) => WALL_LU,
                        (false, true, false, true) => WALL_RD,
                        (true, false, false, false) => WALL_L,
                        (false, true, false, false) => WALL_R,
                        (false, false, true, false) => WALL_U,
                        (false, false, false, true) => WALL_D,
                        _ => " ",
                    }
                }
            };
            row_bottom_section_render.push_str(corner);
        }

        output.push_str(&row_middle_section_render);
        output.push('\n');
        output.push_str(&row_bottom_section_render);
        output.push('\n');
    }

    output
}
