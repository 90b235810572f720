//! Cell positions and traversal orders
//!
//! Every sparse cursor reports its position as a single linear `usize`.
//! For vectors that is the index itself; for matrices it is the cell
//! linearized under the traversal order in force, so comparing two linear
//! cursors is the same as comparing the two cells under that order.

use std::cmp::Ordering;
use std::fmt;

/// A (row, column) pair identifying one matrix cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: usize,
    pub column: usize,
}

impl Cell {
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// The order in which the non-zero cells of a matrix are visited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
    /// Lexicographic by (row, column)
    RowMajor,
    /// Lexicographic by (column, row)
    ColumnMajor,
}

impl Order {
    /// Three-way comparison of two cells under this order
    pub fn compare(self, a: Cell, b: Cell) -> Ordering {
        match self {
            Order::RowMajor => a.row.cmp(&b.row).then(a.column.cmp(&b.column)),
            Order::ColumnMajor => a.column.cmp(&b.column).then(a.row.cmp(&b.row)),
        }
    }

    /// Maps a cell of a `rows × columns` matrix onto its linear cursor
    ///
    /// Row-major: `row * columns + column`. Column-major: `column * rows + row`.
    pub fn linearize(self, cell: Cell, rows: usize, columns: usize) -> usize {
        match self {
            Order::RowMajor => cell.row * columns + cell.column,
            Order::ColumnMajor => cell.column * rows + cell.row,
        }
    }

    /// Recovers the cell behind a linear cursor
    ///
    /// Returns `None` when the stride dimension is zero: such a matrix has
    /// no cells, so no cursor can refer to one.
    pub fn delinearize(self, cursor: usize, rows: usize, columns: usize) -> Option<Cell> {
        match self {
            Order::RowMajor => {
                let row = cursor.checked_div(columns)?;
                Some(Cell::new(row, cursor - row * columns))
            }
            Order::ColumnMajor => {
                let column = cursor.checked_div(rows)?;
                Some(Cell::new(cursor - column * rows, column))
            }
        }
    }

    /// The other order
    pub fn transposed(self) -> Self {
        match self {
            Order::RowMajor => Order::ColumnMajor,
            Order::ColumnMajor => Order::RowMajor,
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Order::RowMajor => write!(f, "row-major"),
            Order::ColumnMajor => write!(f, "column-major"),
        }
    }
}
