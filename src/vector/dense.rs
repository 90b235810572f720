//! Dense vector backed by an `ndarray::Array1`

use ndarray::Array1;

use crate::error::Result;
use crate::iterator::{CursorIterator, JoinTree, StreamCursor, StreamCursorMut, VectorCursor, VectorCursorMut};
use crate::Scalar;

#[derive(Debug, Clone, PartialEq)]
pub struct DenseVector<T> {
    data: Array1<T>,
}

impl<T: Scalar> DenseVector<T> {
    pub fn new(data: Array1<T>) -> Self {
        Self { data }
    }

    pub fn zeros(length: usize) -> Self {
        Self {
            data: Array1::zeros(length),
        }
    }

    pub fn from_vec(values: Vec<T>) -> Self {
        Self {
            data: Array1::from(values),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, index: usize) -> T {
        self.data[index]
    }

    pub fn set(&mut self, index: usize, value: T) {
        self.data[index] = value;
    }

    pub fn as_array(&self) -> &Array1<T> {
        &self.data
    }

    pub fn as_array_mut(&mut self) -> &mut Array1<T> {
        &mut self.data
    }

    pub fn nnz(&self) -> usize {
        self.data.iter().filter(|value| !value.is_zero()).count()
    }

    /// Non-zero entries by increasing index
    pub fn non_zero_iter(&self) -> VectorCursor<'_, T> {
        let stream = self
            .data
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, value)| !value.is_zero());
        VectorCursor::new(JoinTree::leaf("dense", StreamCursor::new(stream)), self.len())
    }

    /// Writable cursor over the non-zero entries; writes land immediately
    pub fn non_zero_iter_mut(&mut self) -> VectorCursorMut<'_, T> {
        let stream = self
            .data
            .iter_mut()
            .enumerate()
            .filter(|(_, value)| !value.is_zero());
        VectorCursorMut::new(StreamCursorMut::new(stream))
    }

    /// Zeroes every entry, then writes each entry the cursor visits
    pub fn overwrite_from(&mut self, cursor: &mut VectorCursor<'_, T>) -> Result<()> {
        self.data.fill(T::zero());
        while cursor.has_next() {
            cursor.advance()?;
            self.data[cursor.index()] = cursor.value();
        }
        Ok(())
    }

    pub fn from_cursor(cursor: &mut VectorCursor<'_, T>) -> Result<Self> {
        let mut vector = Self::zeros(cursor.length());
        vector.overwrite_from(cursor)?;
        Ok(vector)
    }
}
