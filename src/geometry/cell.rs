/// The eight neighbor offsets `(drow, dcol)`, in row-major order.
///
/// The order is significant: it fixes the insertion order of neighbors into the
/// search frontier, which in turn decides between equal-cost routes.
pub const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// The four orthogonal offsets `(drow, dcol)`, in row-major order.
pub const ORTHOGONAL_OFFSETS: [(isize, isize); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];

/// A grid cell, addressed by row and column.
///
/// Row 0 is the row nearest the agent; rows increase away from it.
/// Coordinates are unsigned, so a cell can never lie above or left of the grid;
/// whether it lies within a particular grid is [`Map::in_bounds`][crate::geometry::Map::in_bounds].
///
/// The textual form is `(row, col)`. Parsing also accepts a bare `row,col`.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    parse_display::Display,
    parse_display::FromStr,
)]
#[display("({row}, {col})")]
#[from_str(regex = r"^\s*\(?\s*(?P<row>\d+)\s*,\s*(?P<col>\d+)\s*\)?\s*$")]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    #[inline]
    pub const fn new(row: usize, col: usize) -> Cell {
        Cell { row, col }
    }

    /// Apply a signed offset to this cell.
    ///
    /// Returns `None` if either coordinate would become negative (or overflow).
    /// The result is not checked against any grid's far edges.
    #[inline]
    pub fn offset(self, drow: isize, dcol: isize) -> Option<Cell> {
        Some(Cell {
            row: self.row.checked_add_signed(drow)?,
            col: self.col.checked_add_signed(dcol)?,
        })
    }

    /// Absolute difference in rows and columns between two cells.
    #[inline]
    pub fn delta(self, other: Cell) -> (usize, usize) {
        (self.row.abs_diff(other.row), self.col.abs_diff(other.col))
    }

    /// Chebyshev (L-inf) distance: the number of 8-connected steps between two cells
    /// on an unobstructed grid.
    #[inline]
    pub fn chebyshev(self, other: Cell) -> usize {
        let (drow, dcol) = self.delta(other);
        drow.max(dcol)
    }

    /// `true` when `other` is exactly one diagonal step away.
    #[inline]
    pub fn is_diagonal_to(self, other: Cell) -> bool {
        self.delta(other) == (1, 1)
    }

    /// `true` when the two cells are distinct and 8-connected.
    #[inline]
    pub fn is_neighbor_of(self, other: Cell) -> bool {
        self.chebyshev(other) == 1
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Cell { row, col }
    }
}

impl From<Cell> for (usize, usize) {
    fn from(cell: Cell) -> Self {
        (cell.row, cell.col)
    }
}
