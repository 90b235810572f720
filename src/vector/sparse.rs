//! Sparse vector stored as sorted indices and their values

use std::fmt;

use crate::config::ZeroPolicy;
use crate::error::{Error, Result};
use crate::iterator::{CursorIterator, JoinTree, StreamCursor, VectorCursor, VectorCursorMut};
use crate::matrix::{compressed, CompressedCursorMut};
use crate::Scalar;

/// A sparse vector of a fixed length
///
/// `indices` is strictly increasing and `values[k]` belongs to `indices[k]`.
#[derive(Clone, PartialEq)]
pub struct SparseVector<T> {
    pub length: usize,
    pub indices: Vec<usize>,
    pub values: Vec<T>,
}

impl<T: Scalar> SparseVector<T> {
    /// # Panics
    ///
    /// Panics if the indices are unsorted, out of bounds, or do not match
    /// the values in length.
    pub fn new(length: usize, indices: Vec<usize>, values: Vec<T>) -> Self {
        match Self::try_new(length, indices, values) {
            Ok(vector) => vector,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_new(length: usize, indices: Vec<usize>, values: Vec<T>) -> Result<Self> {
        if indices.len() != values.len() {
            return Err(Error::InvalidStructure(
                "indices.len() must equal values.len()".to_string(),
            ));
        }
        if indices.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(Error::InvalidStructure(
                "indices must be strictly increasing".to_string(),
            ));
        }
        if let Some(&last) = indices.last() {
            if last >= length {
                return Err(Error::InvalidStructure(format!(
                    "Index {} out of bounds (length = {})",
                    last, length
                )));
            }
        }
        Ok(Self {
            length,
            indices,
            values,
        })
    }

    pub fn zeros(length: usize) -> Self {
        Self {
            length,
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Keeps the non-zero entries of a dense slice
    pub fn from_dense(dense: &[T]) -> Self {
        let (indices, values) = dense
            .iter()
            .enumerate()
            .filter(|(_, value)| !value.is_zero())
            .map(|(i, &value)| (i, value))
            .unzip();
        Self {
            length: dense.len(),
            indices,
            values,
        }
    }

    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    pub fn get(&self, index: usize) -> T {
        match self.indices.binary_search(&index) {
            Ok(k) => self.values[k],
            Err(_) => T::zero(),
        }
    }

    /// Writes one entry; a zero removes it
    pub fn set(&mut self, index: usize, value: T) {
        assert!(index < self.length, "Index {} out of bounds (length = {})", index, self.length);
        // A sparse vector is a single compressed slice.
        let mut ptr = [0, self.indices.len()];
        compressed::set(&mut ptr, &mut self.indices, &mut self.values, 0, index, value);
    }

    /// Non-zero entries by increasing index
    pub fn non_zero_iter(&self) -> VectorCursor<'_, T> {
        let stream = self.indices.iter().copied().zip(self.values.iter().copied());
        VectorCursor::new(JoinTree::leaf("sparse", StreamCursor::new(stream)), self.length)
    }

    /// Writable cursor; entries set to zero are pruned on flush
    pub fn non_zero_iter_mut(&mut self) -> VectorCursorMut<'_, T> {
        let length = self.length;
        VectorCursorMut::new(CompressedCursorMut::new(None, &mut self.indices, &mut self.values, length))
    }

    /// Drains a cursor into a fresh sparse vector
    pub fn from_cursor(cursor: &mut VectorCursor<'_, T>, policy: ZeroPolicy) -> Result<Self> {
        let mut indices = Vec::new();
        let mut values = Vec::new();
        while cursor.has_next() {
            cursor.advance()?;
            let value = cursor.value();
            if policy.keeps(&value) {
                indices.push(cursor.index());
                values.push(value);
            }
        }
        Ok(Self {
            length: cursor.length(),
            indices,
            values,
        })
    }

    pub fn to_dense(&self) -> Vec<T> {
        let mut dense = vec![T::zero(); self.length];
        for (&i, &value) in self.indices.iter().zip(&self.values) {
            dense[i] = value;
        }
        dense
    }
}

impl<T: fmt::Debug> fmt::Debug for SparseVector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SparseVector[{}] {{ ", self.length)?;
        for (i, value) in self.indices.iter().zip(&self.values) {
            write!(f, "{}: {:?} ", i, value)?;
        }
        write!(f, "}}")
    }
}
