// Vector data structures and representation-agnostic access

pub mod dense;
pub mod sparse;

pub use dense::DenseVector;
pub use sparse::SparseVector;

use std::fmt;

use crate::config::ZeroPolicy;
use crate::error::Result;
use crate::iterator::{VectorCursor, VectorCursorMut};
use crate::Scalar;

/// The storage strategy behind a [`Vector`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VectorKind {
    Dense,
    Sparse,
}

impl VectorKind {
    pub const ALL: [VectorKind; 2] = [VectorKind::Dense, VectorKind::Sparse];
}

impl fmt::Display for VectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VectorKind::Dense => write!(f, "dense"),
            VectorKind::Sparse => write!(f, "sparse"),
        }
    }
}

/// A vector in one of the supported representations
#[derive(Debug, Clone, PartialEq)]
pub enum Vector<T> {
    Dense(DenseVector<T>),
    Sparse(SparseVector<T>),
}

impl<T: Scalar> Vector<T> {
    /// A zero vector of the requested kind
    pub fn blank(kind: VectorKind, length: usize) -> Self {
        match kind {
            VectorKind::Dense => Vector::Dense(DenseVector::zeros(length)),
            VectorKind::Sparse => Vector::Sparse(SparseVector::zeros(length)),
        }
    }

    pub fn kind(&self) -> VectorKind {
        match self {
            Vector::Dense(_) => VectorKind::Dense,
            Vector::Sparse(_) => VectorKind::Sparse,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Vector::Dense(v) => v.len(),
            Vector::Sparse(v) => v.length,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn nnz(&self) -> usize {
        match self {
            Vector::Dense(v) => v.nnz(),
            Vector::Sparse(v) => v.nnz(),
        }
    }

    pub fn get(&self, index: usize) -> T {
        match self {
            Vector::Dense(v) => v.get(index),
            Vector::Sparse(v) => v.get(index),
        }
    }

    pub fn set(&mut self, index: usize, value: T) {
        match self {
            Vector::Dense(v) => v.set(index, value),
            Vector::Sparse(v) => v.set(index, value),
        }
    }

    pub fn non_zero_iter(&self) -> VectorCursor<'_, T> {
        match self {
            Vector::Dense(v) => v.non_zero_iter(),
            Vector::Sparse(v) => v.non_zero_iter(),
        }
    }

    pub fn non_zero_iter_mut(&mut self) -> VectorCursorMut<'_, T> {
        match self {
            Vector::Dense(v) => v.non_zero_iter_mut(),
            Vector::Sparse(v) => v.non_zero_iter_mut(),
        }
    }

    /// Drains a cursor into a fresh vector of `kind`
    pub fn from_cursor(kind: VectorKind, cursor: &mut VectorCursor<'_, T>, policy: ZeroPolicy) -> Result<Self> {
        Ok(match kind {
            VectorKind::Dense => Vector::Dense(DenseVector::from_cursor(cursor)?),
            VectorKind::Sparse => Vector::Sparse(SparseVector::from_cursor(cursor, policy)?),
        })
    }

    pub fn to_dense(&self) -> Vec<T> {
        match self {
            Vector::Dense(v) => v.as_array().to_vec(),
            Vector::Sparse(v) => v.to_dense(),
        }
    }
}

impl<T> From<DenseVector<T>> for Vector<T> {
    fn from(vector: DenseVector<T>) -> Self {
        Vector::Dense(vector)
    }
}

impl<T> From<SparseVector<T>> for Vector<T> {
    fn from(vector: SparseVector<T>) -> Self {
        Vector::Sparse(vector)
    }
}
