//! Compressed Sparse Row (CSR) matrix format implementation

use std::fmt;

use crate::config::ZeroPolicy;
use crate::error::Result;
use crate::iterator::{JoinTree, MatrixCursor, MatrixCursorMut, StreamCursor};
use crate::matrix::compressed::{self, CompressedCursorMut, CSR_AXES};
use crate::matrix::CellAccess;
use crate::position::Order;
use crate::Scalar;

/// A sparse matrix in Compressed Sparse Row (CSR) format
///
/// The CSR format stores a sparse matrix using three arrays:
/// - row_ptr: Array of size n_rows + 1 containing indices into col_idx and values arrays
/// - col_idx: Array of size nnz containing column indices of non-zero elements
/// - values: Array of size nnz containing the non-zero values
///
/// Column indices are strictly increasing within each row, so the stored
/// entries are already in row-major order.
#[derive(Clone, PartialEq)]
pub struct SparseMatrixCSR<T> {
    /// Number of rows in the matrix
    pub n_rows: usize,

    /// Number of columns in the matrix
    pub n_cols: usize,

    /// Row pointers (size: n_rows + 1)
    /// row_ptr[i] is the index in col_idx and values where row i starts
    /// row_ptr[n_rows] is equal to nnz
    pub row_ptr: Vec<usize>,

    /// Column indices (size: nnz)
    pub col_idx: Vec<usize>,

    /// Non-zero values (size: nnz)
    pub values: Vec<T>,
}

impl<T: Scalar> SparseMatrixCSR<T> {
    /// Creates a new CSR matrix with the given dimensions and data
    ///
    /// # Panics
    ///
    /// Panics if the input arrays are inconsistent:
    /// - row_ptr.len() must be n_rows + 1
    /// - col_idx.len() must equal values.len()
    /// - row_ptr[n_rows] must equal col_idx.len()
    /// - column indices must be in bounds and strictly increasing per row
    pub fn new(
        n_rows: usize,
        n_cols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Self {
        match Self::try_new(n_rows, n_cols, row_ptr, col_idx, values) {
            Ok(matrix) => matrix,
            Err(err) => panic!("{err}"),
        }
    }

    /// Fallible variant of [`new`](Self::new)
    pub fn try_new(
        n_rows: usize,
        n_cols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self> {
        compressed::check_structure(&CSR_AXES, n_rows, n_cols, &row_ptr, &col_idx, values.len())?;
        Ok(Self {
            n_rows,
            n_cols,
            row_ptr,
            col_idx,
            values,
        })
    }

    /// Returns the number of non-zero elements in the matrix
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Returns an iterator over the non-zero elements in row i
    ///
    /// Each item is a tuple (col_idx, value) representing a non-zero element
    pub fn row_iter(&self, i: usize) -> impl Iterator<Item = (usize, &T)> {
        assert!(i < self.n_rows, "Row index out of bounds");

        let start = self.row_ptr[i];
        let end = self.row_ptr[i + 1];

        self.col_idx[start..end]
            .iter()
            .zip(&self.values[start..end])
            .map(|(&col, val)| (col, val))
    }

    /// Creates an empty matrix with the given dimensions
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            row_ptr: vec![0; n_rows + 1],
            col_idx: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Creates an identity matrix of the given size
    pub fn identity(n: usize) -> Self {
        Self {
            n_rows: n,
            n_cols: n,
            row_ptr: (0..=n).collect(),
            col_idx: (0..n).collect(),
            values: vec![T::one(); n],
        }
    }

    /// Non-zero cells in the requested order
    ///
    /// Row-major walks the storage directly. Column-major first buckets the
    /// entries by column, which costs O(nnz + n_cols).
    pub fn non_zero_iter(&self, order: Order) -> MatrixCursor<'_, T> {
        let tree = match order {
            Order::RowMajor => {
                let stream = compressed::entries(&self.row_ptr, &self.col_idx, &self.values, self.n_cols);
                JoinTree::leaf("csr", StreamCursor::new(stream))
            }
            Order::ColumnMajor => {
                let entries = compressed::transposed_entries(&self.row_ptr, &self.col_idx, &self.values, self.n_cols);
                JoinTree::leaf("csr^T", StreamCursor::new(entries.into_iter()))
            }
        };
        MatrixCursor::new(tree, order, self.n_rows, self.n_cols)
    }

    /// Writable row-major cursor; entries set to zero are pruned on flush
    pub fn non_zero_iter_mut(&mut self) -> MatrixCursorMut<'_, T> {
        let (n_rows, n_cols) = (self.n_rows, self.n_cols);
        let cursor = CompressedCursorMut::new(Some(&mut self.row_ptr), &mut self.col_idx, &mut self.values, n_cols);
        MatrixCursorMut::new(cursor, Order::RowMajor, n_rows, n_cols)
    }

    /// Builds a matrix from a row-major cursor
    pub fn from_row_major(cursor: &mut MatrixCursor<'_, T>, policy: ZeroPolicy) -> Result<Self> {
        assert_eq!(cursor.order(), Order::RowMajor, "CSR is built from a row-major cursor");
        let (n_rows, n_cols) = cursor.shape();
        let (row_ptr, col_idx, values) = compressed::build(n_rows, cursor, policy)?;
        Ok(Self {
            n_rows,
            n_cols,
            row_ptr,
            col_idx,
            values,
        })
    }
}

impl<T: Scalar> CellAccess<T> for SparseMatrixCSR<T> {
    fn get(&self, row: usize, col: usize) -> T {
        compressed::get(&self.row_ptr, &self.col_idx, &self.values, row, col)
    }

    fn set(&mut self, row: usize, col: usize, value: T) {
        compressed::set(&mut self.row_ptr, &mut self.col_idx, &mut self.values, row, col, value)
    }
}

impl<T: fmt::Debug> fmt::Debug for SparseMatrixCSR<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SparseMatrixCSR {{")?;
        writeln!(f, "  dimensions: {} × {}", self.n_rows, self.n_cols)?;
        writeln!(f, "  nnz: {}", self.values.len())?;

        // Print a sample of the matrix content
        let max_rows_to_print = 5.min(self.n_rows);

        if max_rows_to_print > 0 {
            writeln!(f, "  content sample:")?;

            for i in 0..max_rows_to_print {
                write!(f, "    row {}: ", i)?;
                let start = self.row_ptr[i];
                let end = self.row_ptr[i + 1];

                if start == end {
                    writeln!(f, "(empty)")?;
                } else {
                    let max_elements = 5.min(end - start);

                    for j in start..(start + max_elements) {
                        write!(f, "({}, {:?}) ", self.col_idx[j], self.values[j])?;
                    }

                    if end - start > max_elements {
                        write!(f, "... ({} more)", end - start - max_elements)?;
                    }

                    writeln!(f)?;
                }
            }

            if self.n_rows > max_rows_to_print {
                writeln!(f, "    ... ({} more rows)", self.n_rows - max_rows_to_print)?;
            }
        }

        write!(f, "}}")
    }
}
