use crate::cells::GridCoordinate;
use crate::units::{Height, Width};

/// Row-major iterator over every coordinate of a grid.
#[derive(Debug, Copy, Clone)]
pub struct CellIter {
    row_length: usize,
    current_cell_number: usize,
    cells_count: usize,
}

impl CellIter {
    pub(crate) fn new(width: Width, height: Height) -> CellIter {
        CellIter {
            row_length: width.0,
            current_cell_number: 0,
            cells_count: width.0 * height.0,
        }
    }
}

impl ExactSizeIterator for CellIter {} // default impl using size_hint()
impl Iterator for CellIter {
    type Item = GridCoordinate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let index = self.current_cell_number;
            self.current_cell_number += 1;
            Some(GridCoordinate::new((index / self.row_length) as u32,
                                     (index % self.row_length) as u32))
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.cells_count - self.current_cell_number;
        (remaining, Some(remaining))
    }
}

/// Iterates a grid one whole row at a time, north to south.
#[derive(Debug, Copy, Clone)]
pub struct RowIter {
    row_length: usize,
    rows_count: usize,
    current_row: usize,
}

impl RowIter {
    pub(crate) fn new(width: Width, height: Height) -> RowIter {
        RowIter {
            row_length: width.0,
            rows_count: height.0,
            current_row: 0,
        }
    }
}

impl ExactSizeIterator for RowIter {}
impl Iterator for RowIter {
    type Item = Vec<GridCoordinate>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_row < self.rows_count {
            let row = self.current_row as u32;
            let coords = (0..self.row_length)
                .map(|col| GridCoordinate::new(row, col as u32))
                .collect();
            self.current_row += 1;
            Some(coords)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.rows_count - self.current_row;
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_iter_is_row_major() {
        let gc = |r, c| GridCoordinate::new(r, c);
        let coords = CellIter::new(Width(2), Height(3)).collect::<Vec<_>>();
        assert_eq!(coords,
                   &[gc(0, 0), gc(0, 1), gc(1, 0), gc(1, 1), gc(2, 0), gc(2, 1)]);
    }

    #[test]
    fn cell_iter_size_hint() {
        let mut iter = CellIter::new(Width(3), Height(3));
        assert_eq!(iter.len(), 9);
        iter.next();
        assert_eq!(iter.len(), 8);
    }

    #[test]
    fn row_iter() {
        let gc = |r, c| GridCoordinate::new(r, c);
        let rows = RowIter::new(Width(2), Height(2)).collect::<Vec<_>>();
        assert_eq!(rows, vec![vec![gc(0, 0), gc(0, 1)], vec![gc(1, 0), gc(1, 1)]]);
        assert_eq!(RowIter::new(Width(5), Height(4)).len(), 4);
    }
}
