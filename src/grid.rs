use petgraph::graph;
use petgraph::visit::Bfs;
use petgraph::{Graph, Undirected};
use smallvec::SmallVec;
use std::fmt;
use std::slice;

use crate::cells::{Cell, CompassPrimary, CoordinateSmallVec, GridCoordinate, Neighbour};
use crate::errors::{MazeError, Result};
use crate::grid_iterators::{CellIter, RowIter};
use crate::units::{self, EdgesCount, Height, NodesCount, Width};

type GridIndexType = u32;
type NodeIndex = graph::NodeIndex<GridIndexType>;

/// A rectangular maze grid.
///
/// Every cell is a node of an undirected graph, numbered row-major. An open wall (a
/// passage) between two adjacent cells is a single edge, so both cells always see the same
/// wall state. A new grid has no edges: every cell is walled in on all four sides.
#[derive(Clone)]
pub struct Grid {
    graph: Graph<(), (), Undirected, GridIndexType>,
    width: Width,
    height: Height,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "Grid :: width: {:?}, height: {:?}, open walls: {:?}",
               self.width,
               self.height,
               self.graph.edge_count())
    }
}

impl PartialEq for Grid {
    fn eq(&self, other: &Grid) -> bool {
        self.width == other.width && self.height == other.height &&
        self.iter().all(|coord| self.cell(coord) == other.cell(coord))
    }
}
impl Eq for Grid {}

impl Grid {
    /// Creates a fully walled grid.
    ///
    /// Fails with `InvalidDimension` if either side is zero or there are more cells than the
    /// graph index type can address.
    pub fn new(width: Width, height: Height) -> Result<Grid> {
        let (Width(w), Height(h)) = (width, height);
        let invalid = MazeError::InvalidDimension {
            width: w,
            height: h,
        };
        if w == 0 || h == 0 {
            return Err(invalid);
        }
        // u32::MAX is reserved by petgraph as the "no node" marker.
        match w.checked_mul(h) {
            Some(cells) if cells < GridIndexType::max_value() as usize => {}
            _ => return Err(invalid),
        }

        let (NodesCount(nodes), EdgesCount(edges)) = units::graph_size(width, height);
        let mut graph = Graph::with_capacity(nodes, edges);
        for _ in 0..nodes {
            let _ = graph.add_node(());
        }

        Ok(Grid {
            graph,
            width,
            height,
        })
    }

    #[inline]
    pub fn width(&self) -> Width {
        self.width
    }

    #[inline]
    pub fn height(&self) -> Height {
        self.height
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.width.0 * self.height.0
    }

    /// Number of open walls (passages) in the grid.
    #[inline]
    pub fn open_walls_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// True while no passage has been carved.
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.graph.edge_count() == 0
    }

    /// Is the grid coordinate valid for this grid - within the grid's dimensions
    #[inline]
    pub fn is_valid_coordinate(&self, coord: GridCoordinate) -> bool {
        (coord.row as usize) < self.height.0 && (coord.col as usize) < self.width.0
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0..grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn coordinate_to_index(&self, coord: GridCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.row as usize * self.width.0 + coord.col as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn index_to_coordinate(&self, index: usize) -> Option<GridCoordinate> {
        if index < self.size() {
            Some(GridCoordinate::new((index / self.width.0) as u32,
                                     (index % self.width.0) as u32))
        } else {
            None
        }
    }

    /// Read-only view of the cell at `row`, `col`.
    pub fn cell_at(&self, row: u32, col: u32) -> Result<Cell> {
        let coord = GridCoordinate::new(row, col);
        self.check_coordinate(coord)?;
        Ok(self.cell(coord))
    }

    /// Cells that are to the North, East, South or West of `coord`, in that order, whether a
    /// passage leads there or not.
    pub fn neighbours(&self, coord: GridCoordinate) -> Result<SmallVec<[Neighbour; 4]>> {
        self.check_coordinate(coord)?;
        Ok(CompassPrimary::ALL
               .iter()
               .filter_map(|&direction| {
                   self.neighbour_at_direction(coord, direction)
                       .map(|neighbour| {
                                Neighbour {
                                    coordinate: neighbour,
                                    direction,
                                    open: self.is_linked(coord, neighbour),
                                }
                            })
               })
               .collect())
    }

    pub fn neighbour_at_direction(&self,
                                  coord: GridCoordinate,
                                  direction: CompassPrimary)
                                  -> Option<GridCoordinate> {
        direction
            .offset(coord)
            .filter(|neighbour| self.is_valid_coordinate(*neighbour))
    }

    /// Cells reachable from `coord` through an open wall, in N, E, S, W order.
    pub fn links(&self, coord: GridCoordinate) -> Result<CoordinateSmallVec> {
        Ok(self.neighbours(coord)?
               .iter()
               .filter(|neighbour| neighbour.open)
               .map(|neighbour| neighbour.coordinate)
               .collect())
    }

    /// Carve a passage between two adjacent cells. Opening an already open wall is a no-op.
    pub fn open_wall_between(&mut self, a: GridCoordinate, b: GridCoordinate) -> Result<()> {
        let a_index = self.checked_node_index(a)?;
        let b_index = self.checked_node_index(b)?;
        if !a.is_adjacent_to(b) {
            return Err(MazeError::NotAdjacent(a, b));
        }
        let _ = self.graph.update_edge(a_index, b_index, ());
        Ok(())
    }

    /// Are two cells in the grid joined by an open wall?
    pub fn is_linked(&self, a: GridCoordinate, b: GridCoordinate) -> bool {
        match (self.node_index(a), self.node_index(b)) {
            (Some(a_index), Some(b_index)) => self.graph.find_edge(a_index, b_index).is_some(),
            _ => false,
        }
    }

    pub fn is_neighbour_linked(&self, coord: GridCoordinate, direction: CompassPrimary) -> bool {
        self.neighbour_at_direction(coord, direction)
            .map_or(false, |neighbour| self.is_linked(coord, neighbour))
    }

    /// Can every cell be reached from every other cell?
    pub fn is_connected(&self) -> bool {
        let mut bfs = Bfs::new(&self.graph, NodeIndex::new(0));
        let mut reached = 0;
        while bfs.next(&self.graph).is_some() {
            reached += 1;
        }
        reached == self.size()
    }

    /// A perfect maze is a spanning tree of the cells: connected with exactly one route
    /// between any two cells.
    pub fn is_perfect(&self) -> bool {
        self.open_walls_count() == self.size() - 1 && self.is_connected()
    }

    #[inline]
    pub fn iter(&self) -> CellIter {
        CellIter::new(self.width, self.height)
    }

    #[inline]
    pub fn iter_row(&self) -> RowIter {
        RowIter::new(self.width, self.height)
    }

    pub fn iter_links(&self) -> LinksIter<'_> {
        LinksIter {
            graph_edge_iter: self.graph.raw_edges().iter(),
            row_length: self.width.0,
        }
    }

    /// Row-major index lookup for coordinates already known to be valid. The returned
    /// closure does not borrow the grid, so it can be used while the grid is being carved.
    pub(crate) fn row_major_indexer(&self) -> impl Fn(GridCoordinate) -> usize {
        let row_length = self.width.0;
        move |coord: GridCoordinate| coord.row as usize * row_length + coord.col as usize
    }

    pub(crate) fn check_coordinate(&self, coord: GridCoordinate) -> Result<()> {
        if self.is_valid_coordinate(coord) {
            Ok(())
        } else {
            Err(MazeError::OutOfBounds(coord))
        }
    }

    /// Wall view of a coordinate already known to be valid.
    pub(crate) fn cell(&self, coord: GridCoordinate) -> Cell {
        let mut cell = Cell::walled(coord);
        for &direction in CompassPrimary::ALL.iter() {
            if self.is_neighbour_linked(coord, direction) {
                cell.set_wall(direction, false);
            }
        }
        cell
    }

    #[inline]
    fn node_index(&self, coord: GridCoordinate) -> Option<NodeIndex> {
        self.coordinate_to_index(coord).map(NodeIndex::new)
    }

    fn checked_node_index(&self, coord: GridCoordinate) -> Result<NodeIndex> {
        self.node_index(coord).ok_or(MazeError::OutOfBounds(coord))
    }
}

#[cfg(test)]
impl Grid {
    /// Does every cell agree with each of its neighbours about the wall they share, with the
    /// outer boundary walls all standing?
    pub(crate) fn is_wall_symmetric(&self) -> bool {
        self.iter().all(|coord| {
            let cell = self.cell(coord);
            CompassPrimary::ALL.iter().all(|&dir| match self.neighbour_at_direction(coord, dir) {
                Some(n) => cell.has_wall(dir) == self.cell(n).has_wall(dir.opposite()),
                None => cell.has_wall(dir),
            })
        })
    }
}

pub struct LinksIter<'a> {
    graph_edge_iter: slice::Iter<'a, graph::Edge<(), GridIndexType>>,
    row_length: usize,
}

impl<'a> LinksIter<'a> {
    fn coordinate(&self, node: NodeIndex) -> GridCoordinate {
        let index = node.index();
        GridCoordinate::new((index / self.row_length) as u32,
                            (index % self.row_length) as u32)
    }
}

impl<'a> Iterator for LinksIter<'a> {
    type Item = (GridCoordinate, GridCoordinate);

    fn next(&mut self) -> Option<Self::Item> {
        let edge = self.graph_edge_iter.next()?;
        Some((self.coordinate(edge.source()), self.coordinate(edge.target())))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.graph_edge_iter.size_hint()
    }
}
impl<'a> ExactSizeIterator for LinksIter<'a> {} // default impl using size_hint()

impl<'a> fmt::Debug for LinksIter<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LinksIter :: remaining edges: {:?}", self.graph_edge_iter.len())
    }
}

#[cfg(test)]
mod tests {

    use itertools::Itertools;

    use super::*;

    fn grid(w: usize, h: usize) -> Grid {
        Grid::new(Width(w), Height(h)).expect("valid grid dimensions")
    }

    fn gc(row: u32, col: u32) -> GridCoordinate {
        GridCoordinate::new(row, col)
    }

    #[test]
    fn invalid_dimensions() {
        assert_eq!(Grid::new(Width(0), Height(5)).unwrap_err(),
                   MazeError::InvalidDimension {
                       width: 0,
                       height: 5,
                   });
        assert_eq!(Grid::new(Width(5), Height(0)).unwrap_err(),
                   MazeError::InvalidDimension {
                       width: 5,
                       height: 0,
                   });
        assert!(Grid::new(Width(usize::max_value()), Height(2)).is_err());
    }

    #[test]
    fn new_grid_is_fully_walled() {
        let g = grid(3, 2);
        assert_eq!(g.size(), 6);
        assert!(g.is_blank());
        assert!(!g.is_connected());
        for coord in g.iter() {
            assert_eq!(g.cell_at(coord.row, coord.col).unwrap(), Cell::walled(coord));
        }
    }

    #[test]
    fn single_cell_grid_is_connected() {
        let g = grid(1, 1);
        assert!(g.is_connected());
        assert!(g.is_perfect());
    }

    #[test]
    fn cell_at_out_of_bounds() {
        let g = grid(3, 2);
        assert_eq!(g.cell_at(2, 0), Err(MazeError::OutOfBounds(gc(2, 0))));
        assert_eq!(g.cell_at(0, 3), Err(MazeError::OutOfBounds(gc(0, 3))));
        assert!(g.cell_at(1, 2).is_ok());
    }

    #[test]
    fn neighbour_cells() {
        let g = grid(10, 10);

        let check_expected_neighbours = |coord, expected: &[GridCoordinate]| {
            let actual: Vec<GridCoordinate> = g.neighbours(coord)
                .unwrap()
                .iter()
                .map(|n| n.coordinate)
                .sorted()
                .collect();
            let expected: Vec<GridCoordinate> = expected.iter().cloned().sorted().collect();
            assert_eq!(actual, expected);
        };

        // corners
        check_expected_neighbours(gc(0, 0), &[gc(0, 1), gc(1, 0)]);
        check_expected_neighbours(gc(0, 9), &[gc(0, 8), gc(1, 9)]);
        check_expected_neighbours(gc(9, 0), &[gc(8, 0), gc(9, 1)]);
        check_expected_neighbours(gc(9, 9), &[gc(9, 8), gc(8, 9)]);

        // side element examples
        check_expected_neighbours(gc(0, 1), &[gc(0, 0), gc(1, 1), gc(0, 2)]);
        check_expected_neighbours(gc(8, 9), &[gc(7, 9), gc(9, 9), gc(8, 8)]);

        // Some place with 4 neighbours inside the grid
        check_expected_neighbours(gc(1, 1), &[gc(0, 1), gc(1, 0), gc(2, 1), gc(1, 2)]);

        assert_eq!(g.neighbours(gc(10, 0)).unwrap_err(),
                   MazeError::OutOfBounds(gc(10, 0)));
    }

    #[test]
    fn neighbours_are_ordered_and_tagged() {
        let mut g = grid(3, 3);
        g.open_wall_between(gc(1, 1), gc(1, 2)).unwrap();

        let neighbours = g.neighbours(gc(1, 1)).unwrap();
        let directions = neighbours.iter().map(|n| n.direction).collect::<Vec<_>>();
        assert_eq!(directions,
                   vec![CompassPrimary::North,
                        CompassPrimary::East,
                        CompassPrimary::South,
                        CompassPrimary::West]);
        let open = neighbours.iter().filter(|n| n.open).collect::<Vec<_>>();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].coordinate, gc(1, 2));
        assert_eq!(open[0].direction, CompassPrimary::East);
    }

    #[test]
    fn neighbour_at_dir() {
        let g = grid(2, 2);
        assert_eq!(g.neighbour_at_direction(gc(0, 0), CompassPrimary::North), None);
        assert_eq!(g.neighbour_at_direction(gc(0, 0), CompassPrimary::West), None);
        assert_eq!(g.neighbour_at_direction(gc(0, 0), CompassPrimary::South),
                   Some(gc(1, 0)));
        assert_eq!(g.neighbour_at_direction(gc(0, 0), CompassPrimary::East),
                   Some(gc(0, 1)));
        assert_eq!(g.neighbour_at_direction(gc(1, 1), CompassPrimary::South), None);
        assert_eq!(g.neighbour_at_direction(gc(1, 1), CompassPrimary::East), None);
    }

    #[test]
    fn coordinate_index_conversion() {
        let g = grid(3, 2);
        let indices = g.iter()
            .map(|coord| g.coordinate_to_index(coord))
            .collect::<Vec<_>>();
        assert_eq!(indices, (0..6).map(Some).collect::<Vec<_>>());
        for index in 0..6 {
            let coord = g.index_to_coordinate(index).unwrap();
            assert_eq!(g.coordinate_to_index(coord), Some(index));
        }
        assert_eq!(g.coordinate_to_index(gc(2, 0)), None);
        assert_eq!(g.coordinate_to_index(gc(u32::max_value(), u32::max_value())), None);
        assert_eq!(g.index_to_coordinate(6), None);
    }

    #[test]
    fn opening_walls_is_symmetric() {
        let mut g = grid(4, 4);
        let a = gc(1, 0);
        let b = gc(2, 0);
        let c = gc(2, 1);

        g.open_wall_between(a, b).unwrap();
        assert!(g.is_linked(a, b) && g.is_linked(b, a));
        assert!(!g.cell_at(1, 0).unwrap().south);
        assert!(!g.cell_at(2, 0).unwrap().north);
        assert!(g.cell_at(2, 0).unwrap().east);

        g.open_wall_between(c, b).unwrap();
        assert!(!g.cell_at(2, 0).unwrap().east);
        assert!(!g.cell_at(2, 1).unwrap().west);
        assert!(!g.is_linked(a, c));

        assert_eq!(&*g.links(b).unwrap(), &[a, c]);
        assert_eq!(&*g.links(a).unwrap(), &[b]);
        assert_eq!(g.open_walls_count(), 2);
        assert!(g.is_wall_symmetric());
    }

    #[test]
    fn opening_an_open_wall_is_a_no_op() {
        let mut g = grid(4, 4);
        g.open_wall_between(gc(0, 0), gc(0, 1)).unwrap();
        g.open_wall_between(gc(0, 1), gc(0, 0)).unwrap();
        assert_eq!(g.open_walls_count(), 1);
        assert_eq!(&*g.links(gc(0, 0)).unwrap(), &[gc(0, 1)]);
    }

    #[test]
    fn opening_walls_requires_adjacent_cells() {
        let mut g = grid(4, 4);
        assert_eq!(g.open_wall_between(gc(0, 0), gc(0, 0)),
                   Err(MazeError::NotAdjacent(gc(0, 0), gc(0, 0))));
        assert_eq!(g.open_wall_between(gc(0, 0), gc(1, 1)),
                   Err(MazeError::NotAdjacent(gc(0, 0), gc(1, 1))));
        assert_eq!(g.open_wall_between(gc(0, 0), gc(0, 2)),
                   Err(MazeError::NotAdjacent(gc(0, 0), gc(0, 2))));
        assert_eq!(g.open_wall_between(gc(3, 3), gc(4, 3)),
                   Err(MazeError::OutOfBounds(gc(4, 3))));
        assert!(g.is_blank());
    }

    #[test]
    fn connectivity() {
        let mut g = grid(2, 2);
        g.open_wall_between(gc(0, 0), gc(0, 1)).unwrap();
        g.open_wall_between(gc(0, 1), gc(1, 1)).unwrap();
        assert!(!g.is_connected());
        g.open_wall_between(gc(1, 1), gc(1, 0)).unwrap();
        assert!(g.is_connected());
        assert!(g.is_perfect());
        g.open_wall_between(gc(1, 0), gc(0, 0)).unwrap();
        assert!(g.is_connected());
        assert!(!g.is_perfect());
    }

    #[test]
    fn links_iter() {
        let mut g = grid(3, 3);
        g.open_wall_between(gc(0, 0), gc(1, 0)).unwrap();
        g.open_wall_between(gc(2, 2), gc(2, 1)).unwrap();
        let links = g.iter_links().collect::<Vec<_>>();
        assert_eq!(links, vec![(gc(0, 0), gc(1, 0)), (gc(2, 2), gc(2, 1))]);
        assert_eq!(g.iter_links().len(), 2);
    }

    #[test]
    fn grid_equality_is_by_walls() {
        let mut a = grid(3, 3);
        let mut b = grid(3, 3);
        a.open_wall_between(gc(0, 0), gc(0, 1)).unwrap();
        a.open_wall_between(gc(1, 1), gc(2, 1)).unwrap();
        b.open_wall_between(gc(2, 1), gc(1, 1)).unwrap();
        assert_ne!(a, b);
        b.open_wall_between(gc(0, 1), gc(0, 0)).unwrap();
        assert_eq!(a, b);
        assert_ne!(grid(3, 3), grid(3, 2));
    }
}
