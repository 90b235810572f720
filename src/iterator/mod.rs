//! Sparse cursors and the merge-join engine
//!
//! A cursor walks the non-zero cells of one operand in strictly increasing
//! linear position. Two cursors sharing a traversal order can be merged with
//! [`JoinTree::union`] or [`JoinTree::intersect`], and the merged stream is
//! itself a cursor, so merges nest.

pub mod combinators;
pub mod join;

pub use combinators::{MatrixCursor, MatrixCursorMut, VectorCursor, VectorCursorMut};
pub use join::{BinaryOp, FillMode, Join, JoinFunction, JoinKind, JoinTree, MergeState};

use crate::error::{Error, Result};
use crate::Scalar;

/// A resumable, forward-only cursor over the non-zero cells of a container
///
/// `cursor()` and `value()` are only meaningful after a successful
/// `advance()`. Calling `advance()` when `has_next()` is false yields
/// [`Error::IteratorExhausted`].
pub trait CursorIterator<T> {
    /// True iff a subsequent `advance()` would succeed
    fn has_next(&self) -> bool;

    /// Moves to the next non-zero cell
    fn advance(&mut self) -> Result<()>;

    /// Linear position of the current cell
    fn cursor(&self) -> usize;

    /// Value of the current cell
    fn value(&self) -> T;
}

/// A cursor that can overwrite the value of its current cell
pub trait CursorIteratorMut<T>: CursorIterator<T> {
    /// Overwrites the value at the current position
    fn set(&mut self, value: T);

    /// Makes all writes durable in the underlying container
    ///
    /// Containers that write through immediately need not override this.
    fn flush(&mut self) {}
}

impl<T, C> CursorIterator<T> for Box<C>
where
    C: CursorIterator<T> + ?Sized,
{
    fn has_next(&self) -> bool {
        (**self).has_next()
    }

    fn advance(&mut self) -> Result<()> {
        (**self).advance()
    }

    fn cursor(&self) -> usize {
        (**self).cursor()
    }

    fn value(&self) -> T {
        (**self).value()
    }
}

impl<T, C> CursorIteratorMut<T> for Box<C>
where
    C: CursorIteratorMut<T> + ?Sized,
{
    fn set(&mut self, value: T) {
        (**self).set(value)
    }

    fn flush(&mut self) {
        (**self).flush()
    }
}

/// Adapts a standard iterator of `(position, value)` pairs into a cursor
///
/// The iterator must yield strictly increasing positions. One entry of
/// lookahead is kept so that `has_next` is exact.
pub struct StreamCursor<T, I> {
    entries: I,
    pending: Option<(usize, T)>,
    current: Option<(usize, T)>,
}

impl<T, I> StreamCursor<T, I>
where
    T: Scalar,
    I: Iterator<Item = (usize, T)>,
{
    pub fn new(mut entries: I) -> Self {
        let pending = entries.next();
        Self {
            entries,
            pending,
            current: None,
        }
    }
}

impl<T, I> CursorIterator<T> for StreamCursor<T, I>
where
    T: Scalar,
    I: Iterator<Item = (usize, T)>,
{
    fn has_next(&self) -> bool {
        self.pending.is_some()
    }

    fn advance(&mut self) -> Result<()> {
        let entry = self.pending.take().ok_or(Error::IteratorExhausted)?;
        self.pending = self.entries.next();
        debug_assert!(
            self.pending.map_or(true, |(next, _)| next > entry.0),
            "cursor positions must be strictly increasing"
        );
        self.current = Some(entry);
        Ok(())
    }

    fn cursor(&self) -> usize {
        match self.current {
            Some((position, _)) => position,
            None => panic!("cursor() read before the first advance()"),
        }
    }

    fn value(&self) -> T {
        match self.current {
            Some((_, value)) => value,
            None => panic!("value() read before the first advance()"),
        }
    }
}

/// A cursor with no cells
pub fn empty<T: Scalar>() -> StreamCursor<T, std::iter::Empty<(usize, T)>> {
    StreamCursor::new(std::iter::empty())
}

/// Write-through cursor over mutable references, used by dense storage
pub struct StreamCursorMut<'a, T, I> {
    entries: I,
    pending: Option<(usize, &'a mut T)>,
    current: Option<(usize, &'a mut T)>,
}

impl<'a, T, I> StreamCursorMut<'a, T, I>
where
    T: Scalar,
    I: Iterator<Item = (usize, &'a mut T)>,
{
    pub fn new(mut entries: I) -> Self {
        let pending = entries.next();
        Self {
            entries,
            pending,
            current: None,
        }
    }
}

impl<'a, T, I> CursorIterator<T> for StreamCursorMut<'a, T, I>
where
    T: Scalar,
    I: Iterator<Item = (usize, &'a mut T)>,
{
    fn has_next(&self) -> bool {
        self.pending.is_some()
    }

    fn advance(&mut self) -> Result<()> {
        let entry = self.pending.take().ok_or(Error::IteratorExhausted)?;
        self.pending = self.entries.next();
        self.current = Some(entry);
        Ok(())
    }

    fn cursor(&self) -> usize {
        match &self.current {
            Some((position, _)) => *position,
            None => panic!("cursor() read before the first advance()"),
        }
    }

    fn value(&self) -> T {
        match &self.current {
            Some((_, slot)) => **slot,
            None => panic!("value() read before the first advance()"),
        }
    }
}

impl<'a, T, I> CursorIteratorMut<T> for StreamCursorMut<'a, T, I>
where
    T: Scalar,
    I: Iterator<Item = (usize, &'a mut T)>,
{
    fn set(&mut self, value: T) {
        match self.current.as_mut() {
            Some((_, slot)) => **slot = value,
            None => panic!("set() called before the first advance()"),
        }
    }
}

/// Drains a cursor into `(position, value)` pairs
pub fn collect_entries<T, C>(cursor: &mut C) -> Result<Vec<(usize, T)>>
where
    C: CursorIterator<T> + ?Sized,
{
    let mut entries = Vec::new();
    while cursor.has_next() {
        cursor.advance()?;
        entries.push((cursor.cursor(), cursor.value()));
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_cursor_walks_entries() {
        let mut cursor = StreamCursor::new(vec![(1, 2.0), (4, 3.0)].into_iter());

        assert!(cursor.has_next());
        cursor.advance().unwrap();
        assert_eq!((cursor.cursor(), cursor.value()), (1, 2.0));

        cursor.advance().unwrap();
        assert_eq!((cursor.cursor(), cursor.value()), (4, 3.0));
        assert!(!cursor.has_next());
    }

    #[test]
    fn test_advance_past_end_is_exhausted() {
        let mut cursor = empty::<f64>();
        assert!(!cursor.has_next());
        assert_eq!(cursor.advance(), Err(Error::IteratorExhausted));
    }

    #[test]
    #[should_panic(expected = "before the first advance")]
    fn test_value_before_advance_panics() {
        let cursor = StreamCursor::new(vec![(0, 1.0)].into_iter());
        cursor.value();
    }

    #[test]
    fn test_stream_cursor_mut_writes_through() {
        let mut data = vec![1.0, 2.0, 3.0];
        {
            let mut cursor = StreamCursorMut::new(data.iter_mut().enumerate());
            while cursor.has_next() {
                cursor.advance().unwrap();
                let doubled = cursor.value() * 2.0;
                cursor.set(doubled);
            }
        }
        assert_eq!(data, vec![2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_collect_entries() {
        let mut cursor = StreamCursor::new(vec![(0, 5), (3, 7)].into_iter());
        assert_eq!(collect_entries(&mut cursor).unwrap(), vec![(0, 5), (3, 7)]);
    }
}
