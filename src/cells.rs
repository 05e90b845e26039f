use smallvec::SmallVec;
use std::convert::From;
use std::fmt;

/// A cell position on a rectangular grid, `row` counting down from the north edge and `col`
/// counting east from the west edge.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct GridCoordinate {
    pub row: u32,
    pub col: u32,
}

impl GridCoordinate {
    pub fn new(row: u32, col: u32) -> GridCoordinate {
        GridCoordinate { row, col }
    }

    /// Are the two coordinates one step apart along exactly one axis?
    pub fn is_adjacent_to(&self, other: GridCoordinate) -> bool {
        let row_diff = (i64::from(self.row) - i64::from(other.row)).abs();
        let col_diff = (i64::from(self.col) - i64::from(other.col)).abs();
        row_diff + col_diff == 1
    }

    /// The direction to travel from `self` to reach an adjacent `other`.
    pub fn direction_to(&self, other: GridCoordinate) -> Option<CompassPrimary> {
        CompassPrimary::ALL
            .iter()
            .cloned()
            .find(|dir| dir.offset(*self) == Some(other))
    }
}

impl From<(u32, u32)> for GridCoordinate {
    fn from(row_col_pair: (u32, u32)) -> GridCoordinate {
        GridCoordinate::new(row_col_pair.0, row_col_pair.1)
    }
}

impl fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

pub type CoordinateSmallVec = SmallVec<[GridCoordinate; 4]>;

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CompassPrimary {
    North,
    East,
    South,
    West,
}

impl CompassPrimary {
    /// Neighbour enumeration order. Anything that must be reproducible walks directions in
    /// this order.
    pub const ALL: [CompassPrimary; 4] = [CompassPrimary::North,
                                          CompassPrimary::East,
                                          CompassPrimary::South,
                                          CompassPrimary::West];

    pub fn opposite(self) -> CompassPrimary {
        match self {
            CompassPrimary::North => CompassPrimary::South,
            CompassPrimary::East => CompassPrimary::West,
            CompassPrimary::South => CompassPrimary::North,
            CompassPrimary::West => CompassPrimary::East,
        }
    }

    /// Creates a new coordinate offset 1 cell away in this direction.
    /// Returns None if the coordinate is not representable, the grid bounds are not checked.
    pub fn offset(self, coord: GridCoordinate) -> Option<GridCoordinate> {
        let GridCoordinate { row, col } = coord;
        match self {
            CompassPrimary::North => row.checked_sub(1).map(|r| GridCoordinate::new(r, col)),
            CompassPrimary::East => col.checked_add(1).map(|c| GridCoordinate::new(row, c)),
            CompassPrimary::South => row.checked_add(1).map(|r| GridCoordinate::new(r, col)),
            CompassPrimary::West => col.checked_sub(1).map(|c| GridCoordinate::new(row, c)),
        }
    }
}

/// Snapshot of one cell's walls. `true` means the wall is standing.
///
/// Cells are views computed from the grid's passages, so two adjacent cells can never
/// disagree about the wall they share.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub struct Cell {
    pub coordinate: GridCoordinate,
    pub north: bool,
    pub east: bool,
    pub south: bool,
    pub west: bool,
}

impl Cell {
    /// A cell with every wall standing.
    pub fn walled(coordinate: GridCoordinate) -> Cell {
        Cell {
            coordinate,
            north: true,
            east: true,
            south: true,
            west: true,
        }
    }

    pub fn has_wall(&self, direction: CompassPrimary) -> bool {
        match direction {
            CompassPrimary::North => self.north,
            CompassPrimary::East => self.east,
            CompassPrimary::South => self.south,
            CompassPrimary::West => self.west,
        }
    }

    pub(crate) fn set_wall(&mut self, direction: CompassPrimary, present: bool) {
        match direction {
            CompassPrimary::North => self.north = present,
            CompassPrimary::East => self.east = present,
            CompassPrimary::South => self.south = present,
            CompassPrimary::West => self.west = present,
        }
    }

    /// Directions with no wall, in N, E, S, W order.
    pub fn open_sides(&self) -> SmallVec<[CompassPrimary; 4]> {
        CompassPrimary::ALL
            .iter()
            .cloned()
            .filter(|dir| !self.has_wall(*dir))
            .collect()
    }
}

/// An in-bounds cell next to some other cell.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Neighbour {
    pub coordinate: GridCoordinate,
    pub direction: CompassPrimary,
    /// Is the wall shared with the neighbour open?
    pub open: bool,
}
