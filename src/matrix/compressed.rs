//! Storage helpers shared by the CSR and CSC formats
//!
//! Both formats are "outer slices of sorted inner indices": rows of columns
//! for CSR, columns of rows for CSC. Everything here is written against
//! that outer/inner view so the two formats stay in lockstep.

use crate::config::ZeroPolicy;
use crate::error::{Error, Result};
use crate::iterator::{CursorIterator, CursorIteratorMut, MatrixCursor};
use crate::position::Order;
use crate::utils::exclusive_scan;
use crate::Scalar;

/// Field names used in structure validation messages
pub(crate) struct Axes {
    pub ptr: &'static str,
    pub idx: &'static str,
    pub outer: &'static str,
    pub inner: &'static str,
}

pub(crate) const CSR_AXES: Axes = Axes {
    ptr: "row_ptr",
    idx: "col_idx",
    outer: "n_rows",
    inner: "n_cols",
};

pub(crate) const CSC_AXES: Axes = Axes {
    ptr: "col_ptr",
    idx: "row_idx",
    outer: "n_cols",
    inner: "n_rows",
};

/// Validates raw compressed storage
pub(crate) fn check_structure(
    axes: &Axes,
    outer_dim: usize,
    inner_dim: usize,
    ptr: &[usize],
    idx: &[usize],
    n_values: usize,
) -> Result<()> {
    let fail = |message: String| Err(Error::InvalidStructure(message));

    if ptr.len() != outer_dim + 1 {
        return fail(format!("{}.len() must be {} + 1", axes.ptr, axes.outer));
    }
    if idx.len() != n_values {
        return fail(format!("{}.len() must equal values.len()", axes.idx));
    }
    if ptr[outer_dim] != idx.len() {
        return fail(format!(
            "{}[{}] must equal {}.len()",
            axes.ptr, axes.outer, axes.idx
        ));
    }
    for outer in 0..outer_dim {
        let (start, end) = (ptr[outer], ptr[outer + 1]);
        if start > end || end > idx.len() {
            return fail(format!("{} must be non-decreasing", axes.ptr));
        }
        for k in start..end {
            if idx[k] >= inner_dim {
                return fail(format!(
                    "Index {} out of bounds ({} = {})",
                    idx[k], axes.inner, inner_dim
                ));
            }
            if k > start && idx[k - 1] >= idx[k] {
                return fail(format!(
                    "{} must be strictly increasing within each slice",
                    axes.idx
                ));
            }
        }
    }
    Ok(())
}

/// Entries in storage order, as linear positions `outer * inner_dim + inner`
pub(crate) fn entries<'a, T: Scalar>(
    ptr: &'a [usize],
    idx: &'a [usize],
    values: &'a [T],
    inner_dim: usize,
) -> impl Iterator<Item = (usize, T)> + 'a {
    ptr.windows(2).enumerate().flat_map(move |(outer, bounds)| {
        (bounds[0]..bounds[1]).map(move |k| (outer * inner_dim + idx[k], values[k]))
    })
}

/// Entries in the transposed order, as linear positions `inner * outer_dim + outer`
///
/// Bucketed by inner index with a counting sort, so O(nnz + inner_dim).
pub(crate) fn transposed_entries<T: Scalar>(
    ptr: &[usize],
    idx: &[usize],
    values: &[T],
    inner_dim: usize,
) -> Vec<(usize, T)> {
    let outer_dim = ptr.len() - 1;

    let mut counts = vec![0; inner_dim];
    for &inner in idx {
        counts[inner] += 1;
    }
    let mut next_slot = exclusive_scan(&counts);

    let mut out = vec![(0, T::zero()); idx.len()];
    for outer in 0..outer_dim {
        for k in ptr[outer]..ptr[outer + 1] {
            let inner = idx[k];
            out[next_slot[inner]] = (inner * outer_dim + outer, values[k]);
            next_slot[inner] += 1;
        }
    }
    out
}

fn locate(ptr: &[usize], idx: &[usize], outer: usize, inner: usize) -> (usize, std::result::Result<usize, usize>) {
    let start = ptr[outer];
    let end = ptr[outer + 1];
    (start, idx[start..end].binary_search(&inner))
}

pub(crate) fn get<T: Scalar>(ptr: &[usize], idx: &[usize], values: &[T], outer: usize, inner: usize) -> T {
    match locate(ptr, idx, outer, inner) {
        (start, Ok(offset)) => values[start + offset],
        (_, Err(_)) => T::zero(),
    }
}

/// Writes one cell; a zero removes the stored entry
pub(crate) fn set<T: Scalar>(
    ptr: &mut [usize],
    idx: &mut Vec<usize>,
    values: &mut Vec<T>,
    outer: usize,
    inner: usize,
    value: T,
) {
    match locate(ptr, idx, outer, inner) {
        (start, Ok(offset)) => {
            let k = start + offset;
            if value.is_zero() {
                idx.remove(k);
                values.remove(k);
                ptr[outer + 1..].iter_mut().for_each(|p| *p -= 1);
            } else {
                values[k] = value;
            }
        }
        (start, Err(offset)) => {
            if !value.is_zero() {
                let k = start + offset;
                idx.insert(k, inner);
                values.insert(k, value);
                ptr[outer + 1..].iter_mut().for_each(|p| *p += 1);
            }
        }
    }
}

/// Drops stored zeros in place; returns how many were removed
///
/// `ptr` is `None` for storage with a single outer slice (sparse vectors).
pub(crate) fn compact<T: Scalar>(
    ptr: Option<&mut Vec<usize>>,
    idx: &mut Vec<usize>,
    values: &mut Vec<T>,
) -> usize {
    let mut write = 0;
    let mut read = 0;
    let mut keep_slice = |end: usize, idx: &mut Vec<usize>, values: &mut Vec<T>| {
        while read < end {
            if !values[read].is_zero() {
                idx[write] = idx[read];
                values[write] = values[read];
                write += 1;
            }
            read += 1;
        }
        write
    };

    match ptr {
        Some(ptr) => {
            for outer in 0..ptr.len() - 1 {
                ptr[outer + 1] = keep_slice(ptr[outer + 1], idx, values);
            }
        }
        None => {
            let end = values.len();
            keep_slice(end, idx, values);
        }
    }

    let removed = values.len() - write;
    idx.truncate(write);
    values.truncate(write);
    removed
}

/// Builds compressed storage from a cursor in the format's natural order
pub(crate) fn build<T: Scalar>(
    outer_dim: usize,
    cursor: &mut MatrixCursor<'_, T>,
    policy: ZeroPolicy,
) -> Result<(Vec<usize>, Vec<usize>, Vec<T>)> {
    let mut counts = vec![0; outer_dim];
    let mut idx = Vec::new();
    let mut values = Vec::new();

    while cursor.has_next() {
        cursor.advance()?;
        let value = cursor.value();
        if !policy.keeps(&value) {
            continue;
        }
        let cell = cursor.cell();
        let (outer, inner) = match cursor.order() {
            Order::RowMajor => (cell.row, cell.column),
            Order::ColumnMajor => (cell.column, cell.row),
        };
        counts[outer] += 1;
        idx.push(inner);
        values.push(value);
    }

    tracing::trace!(nnz = values.len(), order = %cursor.order(), "built compressed storage");
    Ok((exclusive_scan(&counts), idx, values))
}

/// Writable cursor over compressed storage in storage order
///
/// Non-zero writes land immediately. Entries overwritten with zero stay in
/// place until [`flush`](CursorIteratorMut::flush), which compacts the
/// storage; dropping the cursor flushes as well.
pub struct CompressedCursorMut<'a, T: Scalar> {
    ptr: Option<&'a mut Vec<usize>>,
    idx: &'a mut Vec<usize>,
    values: &'a mut Vec<T>,
    inner_dim: usize,
    outer: usize,
    next: usize,
    current: Option<(usize, usize)>,
    pruned: bool,
}

impl<'a, T: Scalar> CompressedCursorMut<'a, T> {
    pub(crate) fn new(
        ptr: Option<&'a mut Vec<usize>>,
        idx: &'a mut Vec<usize>,
        values: &'a mut Vec<T>,
        inner_dim: usize,
    ) -> Self {
        Self {
            ptr,
            idx,
            values,
            inner_dim,
            outer: 0,
            next: 0,
            current: None,
            pruned: false,
        }
    }

    fn slot(&self) -> usize {
        match self.current {
            Some((_, slot)) => slot,
            None => panic!("cursor read before the first advance() or after a flush()"),
        }
    }
}

impl<'a, T: Scalar> CursorIterator<T> for CompressedCursorMut<'a, T> {
    fn has_next(&self) -> bool {
        self.next < self.values.len()
    }

    fn advance(&mut self) -> Result<()> {
        if !self.has_next() {
            return Err(Error::IteratorExhausted);
        }
        if let Some(ptr) = self.ptr.as_deref() {
            while ptr[self.outer + 1] <= self.next {
                self.outer += 1;
            }
        }
        let position = self.outer * self.inner_dim + self.idx[self.next];
        self.current = Some((position, self.next));
        self.next += 1;
        Ok(())
    }

    fn cursor(&self) -> usize {
        match self.current {
            Some((position, _)) => position,
            None => panic!("cursor read before the first advance() or after a flush()"),
        }
    }

    fn value(&self) -> T {
        self.values[self.slot()]
    }
}

impl<'a, T: Scalar> CursorIteratorMut<T> for CompressedCursorMut<'a, T> {
    fn set(&mut self, value: T) {
        let slot = self.slot();
        self.values[slot] = value;
        if value.is_zero() {
            self.pruned = true;
        }
    }

    fn flush(&mut self) {
        if !self.pruned {
            return;
        }
        let removed_before = self.values[..self.next]
            .iter()
            .filter(|value| value.is_zero())
            .count();
        let removed = compact(self.ptr.as_deref_mut(), self.idx, self.values);
        tracing::trace!(removed, "flushed pruned entries");

        self.next -= removed_before;
        self.outer = 0;
        self.current = None;
        self.pruned = false;
    }
}

impl<'a, T: Scalar> Drop for CompressedCursorMut<'a, T> {
    fn drop(&mut self) {
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_structure_rejects_unsorted() {
        let result = check_structure(&CSR_AXES, 1, 3, &[0, 2], &[2, 1], 2);
        assert!(matches!(result, Err(Error::InvalidStructure(_))));
    }

    #[test]
    fn test_transposed_entries() {
        //    [1 2 0]
        //    [0 3 0]
        //    [4 0 5]
        let ptr = [0, 2, 3, 5];
        let idx = [0, 1, 1, 0, 2];
        let values = [1, 2, 3, 4, 5];

        let transposed = transposed_entries(&ptr, &idx, &values, 3);
        let positions: Vec<_> = transposed.iter().map(|&(p, _)| p).collect();
        let vals: Vec<_> = transposed.iter().map(|&(_, v)| v).collect();

        assert_eq!(positions, vec![0, 2, 3, 4, 8]);
        assert_eq!(vals, vec![1, 4, 2, 3, 5]);
    }

    #[test]
    fn test_set_inserts_and_removes() {
        let mut ptr = vec![0, 1, 1];
        let mut idx = vec![1];
        let mut values = vec![7.0];

        set(&mut ptr, &mut idx, &mut values, 1, 0, 3.0);
        assert_eq!((ptr.clone(), idx.clone(), values.clone()), (vec![0, 1, 2], vec![1, 0], vec![7.0, 3.0]));

        set(&mut ptr, &mut idx, &mut values, 0, 1, 0.0);
        assert_eq!((ptr, idx, values), (vec![0, 0, 1], vec![0], vec![3.0]));
    }

    #[test]
    fn test_compact() {
        let mut ptr = vec![0, 2, 3];
        let mut idx = vec![0, 2, 1];
        let mut values = vec![0.0, 1.0, 0.0];

        let removed = compact(Some(&mut ptr), &mut idx, &mut values);
        assert_eq!(removed, 2);
        assert_eq!(ptr, vec![0, 1, 1]);
        assert_eq!(idx, vec![2]);
        assert_eq!(values, vec![1.0]);
    }

    #[test]
    fn test_cursor_mut_defers_pruning_to_flush() {
        let mut ptr = vec![0, 2, 3];
        let mut idx = vec![0, 2, 1];
        let mut values = vec![1.0, 2.0, 3.0];
        {
            let mut cursor = CompressedCursorMut::new(Some(&mut ptr), &mut idx, &mut values, 3);
            cursor.advance().unwrap();
            cursor.set(0.0);
            cursor.advance().unwrap();
            assert_eq!(cursor.cursor(), 2);
            cursor.set(20.0);
            cursor.flush();

            assert!(cursor.has_next());
            cursor.advance().unwrap();
            assert_eq!((cursor.cursor(), cursor.value()), (4, 3.0));
        }
        assert_eq!(ptr, vec![0, 1, 2]);
        assert_eq!(idx, vec![2, 1]);
        assert_eq!(values, vec![20.0, 3.0]);
    }
}
