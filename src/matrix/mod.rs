// Matrix data structures and representation-agnostic access

pub(crate) mod compressed;
pub mod conversion;
pub mod csc;
pub mod csr;
pub mod dense;

pub use compressed::CompressedCursorMut;
pub use csc::SparseMatrixCSC;
pub use csr::SparseMatrixCSR;
pub use dense::DenseMatrix;

use std::fmt;

use crate::config::ZeroPolicy;
use crate::error::Result;
use crate::iterator::{MatrixCursor, MatrixCursorMut};
use crate::position::Order;
use crate::Scalar;

/// Single-cell read/write by coordinate
pub trait CellAccess<T> {
    fn get(&self, row: usize, col: usize) -> T;

    /// Writes one cell; for sparse storage a zero removes the entry
    fn set(&mut self, row: usize, col: usize, value: T);
}

/// The storage strategy behind a [`Matrix`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatrixKind {
    Dense,
    SparseRowMajor,
    SparseColumnMajor,
}

impl MatrixKind {
    pub const ALL: [MatrixKind; 3] = [
        MatrixKind::Dense,
        MatrixKind::SparseRowMajor,
        MatrixKind::SparseColumnMajor,
    ];

    /// The order in which this kind stores its cells
    pub fn natural_order(self) -> Order {
        match self {
            MatrixKind::Dense | MatrixKind::SparseRowMajor => Order::RowMajor,
            MatrixKind::SparseColumnMajor => Order::ColumnMajor,
        }
    }

    pub fn is_sparse(self) -> bool {
        !matches!(self, MatrixKind::Dense)
    }
}

impl fmt::Display for MatrixKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixKind::Dense => write!(f, "dense"),
            MatrixKind::SparseRowMajor => write!(f, "csr"),
            MatrixKind::SparseColumnMajor => write!(f, "csc"),
        }
    }
}

/// A matrix in one of the supported representations
#[derive(Debug, Clone, PartialEq)]
pub enum Matrix<T> {
    Dense(DenseMatrix<T>),
    Csr(SparseMatrixCSR<T>),
    Csc(SparseMatrixCSC<T>),
}

impl<T: Scalar> Matrix<T> {
    /// A zero matrix of the requested kind
    pub fn blank(kind: MatrixKind, n_rows: usize, n_cols: usize) -> Self {
        match kind {
            MatrixKind::Dense => Matrix::Dense(DenseMatrix::zeros(n_rows, n_cols)),
            MatrixKind::SparseRowMajor => Matrix::Csr(SparseMatrixCSR::zeros(n_rows, n_cols)),
            MatrixKind::SparseColumnMajor => Matrix::Csc(SparseMatrixCSC::zeros(n_rows, n_cols)),
        }
    }

    pub fn kind(&self) -> MatrixKind {
        match self {
            Matrix::Dense(_) => MatrixKind::Dense,
            Matrix::Csr(_) => MatrixKind::SparseRowMajor,
            Matrix::Csc(_) => MatrixKind::SparseColumnMajor,
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        match self {
            Matrix::Dense(m) => (m.n_rows(), m.n_cols()),
            Matrix::Csr(m) => (m.n_rows, m.n_cols),
            Matrix::Csc(m) => (m.n_rows, m.n_cols),
        }
    }

    /// Number of stored non-zero cells
    pub fn nnz(&self) -> usize {
        match self {
            Matrix::Dense(m) => m.nnz(),
            Matrix::Csr(m) => m.nnz(),
            Matrix::Csc(m) => m.nnz(),
        }
    }

    pub fn non_zero_iter(&self, order: Order) -> MatrixCursor<'_, T> {
        match self {
            Matrix::Dense(m) => m.non_zero_iter(order),
            Matrix::Csr(m) => m.non_zero_iter(order),
            Matrix::Csc(m) => m.non_zero_iter(order),
        }
    }

    /// Writable cursor in the representation's natural order
    pub fn non_zero_iter_mut(&mut self) -> MatrixCursorMut<'_, T> {
        match self {
            Matrix::Dense(m) => m.non_zero_iter_mut(Order::RowMajor),
            Matrix::Csr(m) => m.non_zero_iter_mut(),
            Matrix::Csc(m) => m.non_zero_iter_mut(),
        }
    }

    /// Drains a cursor into a fresh matrix of `kind`
    ///
    /// The cursor must already be in the kind's natural order.
    pub fn from_cursor(kind: MatrixKind, cursor: &mut MatrixCursor<'_, T>, policy: ZeroPolicy) -> Result<Self> {
        let (n_rows, n_cols) = cursor.shape();
        Ok(match kind {
            MatrixKind::Dense => Matrix::Dense(DenseMatrix::from_cursor(n_rows, n_cols, cursor)?),
            MatrixKind::SparseRowMajor => Matrix::Csr(SparseMatrixCSR::from_row_major(cursor, policy)?),
            MatrixKind::SparseColumnMajor => {
                Matrix::Csc(SparseMatrixCSC::from_column_major(cursor, policy)?)
            }
        })
    }

    pub fn to_dense(&self) -> DenseMatrix<T> {
        match self {
            Matrix::Dense(m) => m.clone(),
            Matrix::Csr(m) => m.to_dense(),
            Matrix::Csc(m) => m.to_dense(),
        }
    }

    pub fn as_dense(&self) -> Option<&DenseMatrix<T>> {
        match self {
            Matrix::Dense(m) => Some(m),
            _ => None,
        }
    }
}

impl<T: Scalar> CellAccess<T> for Matrix<T> {
    fn get(&self, row: usize, col: usize) -> T {
        match self {
            Matrix::Dense(m) => m.get(row, col),
            Matrix::Csr(m) => m.get(row, col),
            Matrix::Csc(m) => m.get(row, col),
        }
    }

    fn set(&mut self, row: usize, col: usize, value: T) {
        match self {
            Matrix::Dense(m) => m.set(row, col, value),
            Matrix::Csr(m) => m.set(row, col, value),
            Matrix::Csc(m) => m.set(row, col, value),
        }
    }
}

impl<T> From<DenseMatrix<T>> for Matrix<T> {
    fn from(matrix: DenseMatrix<T>) -> Self {
        Matrix::Dense(matrix)
    }
}

impl<T> From<SparseMatrixCSR<T>> for Matrix<T> {
    fn from(matrix: SparseMatrixCSR<T>) -> Self {
        Matrix::Csr(matrix)
    }
}

impl<T> From<SparseMatrixCSC<T>> for Matrix<T> {
    fn from(matrix: SparseMatrixCSC<T>) -> Self {
        Matrix::Csc(matrix)
    }
}
