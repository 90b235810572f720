//! Compressed Sparse Column (CSC) matrix format implementation

use std::fmt;

use crate::config::ZeroPolicy;
use crate::error::Result;
use crate::iterator::{JoinTree, MatrixCursor, MatrixCursorMut, StreamCursor};
use crate::matrix::compressed::{self, CompressedCursorMut, CSC_AXES};
use crate::matrix::CellAccess;
use crate::position::Order;
use crate::Scalar;

/// A sparse matrix in Compressed Sparse Column (CSC) format
///
/// The CSC format stores a sparse matrix using three arrays:
/// - col_ptr: Array of size n_cols + 1 containing indices into row_idx and values arrays
/// - row_idx: Array of size nnz containing row indices of non-zero elements
/// - values: Array of size nnz containing the non-zero values
///
/// Stored entries are in column-major order.
#[derive(Clone, PartialEq)]
pub struct SparseMatrixCSC<T> {
    /// Number of rows in the matrix
    pub n_rows: usize,

    /// Number of columns in the matrix
    pub n_cols: usize,

    /// Column pointers (size: n_cols + 1)
    /// col_ptr[j] is the index in row_idx and values where column j starts
    /// col_ptr[n_cols] is equal to nnz
    pub col_ptr: Vec<usize>,

    /// Row indices (size: nnz)
    pub row_idx: Vec<usize>,

    /// Non-zero values (size: nnz)
    pub values: Vec<T>,
}

impl<T: Scalar> SparseMatrixCSC<T> {
    /// Creates a new CSC matrix with the given dimensions and data
    ///
    /// # Panics
    ///
    /// Panics if the input arrays are inconsistent:
    /// - col_ptr.len() must be n_cols + 1
    /// - row_idx.len() must equal values.len()
    /// - col_ptr[n_cols] must equal row_idx.len()
    /// - row indices must be in bounds and strictly increasing per column
    pub fn new(
        n_rows: usize,
        n_cols: usize,
        col_ptr: Vec<usize>,
        row_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Self {
        match Self::try_new(n_rows, n_cols, col_ptr, row_idx, values) {
            Ok(matrix) => matrix,
            Err(err) => panic!("{err}"),
        }
    }

    /// Fallible variant of [`new`](Self::new)
    pub fn try_new(
        n_rows: usize,
        n_cols: usize,
        col_ptr: Vec<usize>,
        row_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self> {
        compressed::check_structure(&CSC_AXES, n_cols, n_rows, &col_ptr, &row_idx, values.len())?;
        Ok(Self {
            n_rows,
            n_cols,
            col_ptr,
            row_idx,
            values,
        })
    }

    /// Returns the number of non-zero elements in the matrix
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Returns an iterator over the non-zero elements in column j
    ///
    /// Each item is a tuple (row_idx, value) representing a non-zero element
    pub fn col_iter(&self, j: usize) -> impl Iterator<Item = (usize, &T)> {
        assert!(j < self.n_cols, "Column index out of bounds");

        let start = self.col_ptr[j];
        let end = self.col_ptr[j + 1];

        self.row_idx[start..end]
            .iter()
            .zip(&self.values[start..end])
            .map(|(&row, val)| (row, val))
    }

    /// Creates an empty matrix with the given dimensions
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            col_ptr: vec![0; n_cols + 1],
            row_idx: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Creates an identity matrix of the given size
    pub fn identity(n: usize) -> Self {
        Self {
            n_rows: n,
            n_cols: n,
            col_ptr: (0..=n).collect(),
            row_idx: (0..n).collect(),
            values: vec![T::one(); n],
        }
    }

    /// Non-zero cells in the requested order
    ///
    /// Column-major walks the storage directly; row-major buckets the
    /// entries by row first, O(nnz + n_rows).
    pub fn non_zero_iter(&self, order: Order) -> MatrixCursor<'_, T> {
        let tree = match order {
            Order::ColumnMajor => {
                let stream = compressed::entries(&self.col_ptr, &self.row_idx, &self.values, self.n_rows);
                JoinTree::leaf("csc", StreamCursor::new(stream))
            }
            Order::RowMajor => {
                let entries = compressed::transposed_entries(&self.col_ptr, &self.row_idx, &self.values, self.n_rows);
                JoinTree::leaf("csc^T", StreamCursor::new(entries.into_iter()))
            }
        };
        MatrixCursor::new(tree, order, self.n_rows, self.n_cols)
    }

    /// Writable column-major cursor; entries set to zero are pruned on flush
    pub fn non_zero_iter_mut(&mut self) -> MatrixCursorMut<'_, T> {
        let (n_rows, n_cols) = (self.n_rows, self.n_cols);
        let cursor = CompressedCursorMut::new(Some(&mut self.col_ptr), &mut self.row_idx, &mut self.values, n_rows);
        MatrixCursorMut::new(cursor, Order::ColumnMajor, n_rows, n_cols)
    }

    /// Builds a matrix from a column-major cursor
    pub fn from_column_major(cursor: &mut MatrixCursor<'_, T>, policy: ZeroPolicy) -> Result<Self> {
        assert_eq!(cursor.order(), Order::ColumnMajor, "CSC is built from a column-major cursor");
        let (n_rows, n_cols) = cursor.shape();
        let (col_ptr, row_idx, values) = compressed::build(n_cols, cursor, policy)?;
        Ok(Self {
            n_rows,
            n_cols,
            col_ptr,
            row_idx,
            values,
        })
    }
}

impl<T: Scalar> CellAccess<T> for SparseMatrixCSC<T> {
    fn get(&self, row: usize, col: usize) -> T {
        compressed::get(&self.col_ptr, &self.row_idx, &self.values, col, row)
    }

    fn set(&mut self, row: usize, col: usize, value: T) {
        compressed::set(&mut self.col_ptr, &mut self.row_idx, &mut self.values, col, row, value)
    }
}

impl<T: fmt::Debug> fmt::Debug for SparseMatrixCSC<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SparseMatrixCSC {{")?;
        writeln!(f, "  dimensions: {} × {}", self.n_rows, self.n_cols)?;
        writeln!(f, "  nnz: {}", self.values.len())?;

        // Print a sample of the matrix content
        let max_cols_to_print = 5.min(self.n_cols);

        if max_cols_to_print > 0 {
            writeln!(f, "  content sample:")?;

            for j in 0..max_cols_to_print {
                write!(f, "    col {}: ", j)?;
                let start = self.col_ptr[j];
                let end = self.col_ptr[j + 1];

                if start == end {
                    writeln!(f, "(empty)")?;
                } else {
                    let max_elements = 5.min(end - start);

                    for i in start..(start + max_elements) {
                        write!(f, "({}, {:?}) ", self.row_idx[i], self.values[i])?;
                    }

                    if end - start > max_elements {
                        write!(f, "... ({} more)", end - start - max_elements)?;
                    }

                    writeln!(f)?;
                }
            }

            if self.n_cols > max_cols_to_print {
                writeln!(f, "    ... ({} more columns)", self.n_cols - max_cols_to_print)?;
            }
        }

        write!(f, "}}")
    }
}
