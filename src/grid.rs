/// A single cube position in the wall
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

/// Square grid of cells, stored row-major
#[derive(Clone, Debug)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Builds a `size x size` grid. Callers validate `size > 0` beforehand.
    pub fn build(size: usize) -> Self {
        let cells = (0..size)
            .flat_map(|row| (0..size).map(move |col| Cell { row, col }))
            .collect();
        Grid { size, cells }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Row-major index of `(row, col)`, if it lies inside the grid
    pub fn index_of(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.size && col < self.size).then(|| row * self.size + col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_row_major() {
        let grid = Grid::build(3);
        assert_eq!(grid.len(), 9);
        assert_eq!(grid.cells()[0], Cell { row: 0, col: 0 });
        assert_eq!(grid.cells()[1], Cell { row: 0, col: 1 });
        assert_eq!(grid.cells()[3], Cell { row: 1, col: 0 });
        assert_eq!(grid.cells()[8], Cell { row: 2, col: 2 });
    }

    #[test]
    fn index_matches_position() {
        let grid = Grid::build(5);
        for (i, cell) in grid.cells().iter().enumerate() {
            assert_eq!(grid.index_of(cell.row, cell.col), Some(i));
        }
        assert_eq!(grid.index_of(5, 0), None);
        assert_eq!(grid.index_of(0, 5), None);
    }
}
