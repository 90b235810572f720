//! Dense matrix backed by an `ndarray::Array2`

use std::fmt;

use ndarray::Array2;

use crate::error::{Error, Result};
use crate::iterator::{CursorIterator, JoinTree, MatrixCursor, MatrixCursorMut, StreamCursor, StreamCursorMut};
use crate::matrix::CellAccess;
use crate::position::Order;
use crate::Scalar;

/// A dense matrix; every cell is stored
#[derive(Clone, PartialEq)]
pub struct DenseMatrix<T> {
    data: Array2<T>,
}

impl<T: Scalar> DenseMatrix<T> {
    pub fn new(data: Array2<T>) -> Self {
        Self { data }
    }

    /// Creates a zero-filled matrix with the given dimensions
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Self {
            data: Array2::zeros((n_rows, n_cols)),
        }
    }

    /// Creates a matrix from row-major values
    pub fn from_row_major_vec(n_rows: usize, n_cols: usize, values: Vec<T>) -> Result<Self> {
        let got = values.len();
        Array2::from_shape_vec((n_rows, n_cols), values)
            .map(Self::new)
            .map_err(|_| Error::ShapeMismatch {
                expected: vec![n_rows * n_cols],
                got: vec![got],
            })
    }

    pub fn n_rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn n_cols(&self) -> usize {
        self.data.ncols()
    }

    pub fn as_array(&self) -> &Array2<T> {
        &self.data
    }

    pub fn as_array_mut(&mut self) -> &mut Array2<T> {
        &mut self.data
    }

    pub fn into_array(self) -> Array2<T> {
        self.data
    }

    /// Number of cells holding a non-zero value
    pub fn nnz(&self) -> usize {
        self.data.iter().filter(|value| !value.is_zero()).count()
    }

    /// Non-zero cells in the requested order; zero cells are skipped
    pub fn non_zero_iter(&self, order: Order) -> MatrixCursor<'_, T> {
        let (n_rows, n_cols) = self.data.dim();
        let view = match order {
            Order::RowMajor => self.data.view(),
            Order::ColumnMajor => self.data.view().reversed_axes(),
        };
        let stream = view
            .into_iter()
            .copied()
            .enumerate()
            .filter(|(_, value)| !value.is_zero());
        let tree = JoinTree::leaf("dense", StreamCursor::new(stream));
        MatrixCursor::new(tree, order, n_rows, n_cols)
    }

    /// Writable cursor over the non-zero cells; writes land immediately
    pub fn non_zero_iter_mut(&mut self, order: Order) -> MatrixCursorMut<'_, T> {
        let (n_rows, n_cols) = self.data.dim();
        let view = match order {
            Order::RowMajor => self.data.view_mut(),
            Order::ColumnMajor => self.data.view_mut().reversed_axes(),
        };
        let stream = view
            .into_iter()
            .enumerate()
            .filter(|(_, value)| !value.is_zero());
        MatrixCursorMut::new(StreamCursorMut::new(stream), order, n_rows, n_cols)
    }

    /// Fills the matrix from a cursor; cells it does not visit become zero
    pub fn from_cursor(n_rows: usize, n_cols: usize, cursor: &mut MatrixCursor<'_, T>) -> Result<Self> {
        let mut matrix = Self::zeros(n_rows, n_cols);
        matrix.overwrite_from(cursor)?;
        Ok(matrix)
    }

    /// Zeroes every cell, then writes each cell the cursor visits
    pub fn overwrite_from(&mut self, cursor: &mut MatrixCursor<'_, T>) -> Result<()> {
        self.data.fill(T::zero());
        while cursor.has_next() {
            cursor.advance()?;
            let cell = cursor.cell();
            self.data[[cell.row, cell.column]] = cursor.value();
        }
        Ok(())
    }
}

impl<T: Scalar> CellAccess<T> for DenseMatrix<T> {
    fn get(&self, row: usize, col: usize) -> T {
        self.data[[row, col]]
    }

    fn set(&mut self, row: usize, col: usize, value: T) {
        self.data[[row, col]] = value;
    }
}

impl<T: fmt::Debug> fmt::Debug for DenseMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DenseMatrix {{")?;
        writeln!(f, "  dimensions: {} × {}", self.data.nrows(), self.data.ncols())?;
        writeln!(f, "  data: {:?}", self.data)?;
        write!(f, "}}")
    }
}
