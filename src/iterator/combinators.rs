//! Vector- and matrix-shaped cursors and the named merge combinators
//!
//! The merge engine only sees linear positions. These adapters carry the
//! shape (and, for matrices, the traversal order) alongside a [`JoinTree`]
//! so that merged streams can be turned back into indices and cells.

use crate::error::Result;
use crate::iterator::{CursorIterator, CursorIteratorMut, FillMode, JoinFunction, JoinTree};
use crate::position::{Cell, Order};
use crate::Scalar;

/// Cursor over the non-zero entries of a vector of a given length
pub struct VectorCursor<'a, T> {
    tree: JoinTree<'a, T>,
    length: usize,
}

impl<'a, T: Scalar> VectorCursor<'a, T> {
    pub fn new(tree: JoinTree<'a, T>, length: usize) -> Self {
        Self { tree, length }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Index of the current entry
    pub fn index(&self) -> usize {
        self.tree.cursor()
    }

    pub fn tree(&self) -> &JoinTree<'a, T> {
        &self.tree
    }

    pub fn into_tree(self) -> JoinTree<'a, T> {
        self.tree
    }

    /// Union of both streams under `function`
    pub fn or_else(self, other: Self, function: JoinFunction, fill: FillMode) -> Self {
        assert_eq!(self.length, other.length, "Vector lengths must match");
        Self {
            tree: self.tree.union(other.tree, function, fill),
            length: self.length,
        }
    }

    /// Intersection of both streams under `function`
    pub fn and_also(self, other: Self, function: JoinFunction) -> Result<Self> {
        assert_eq!(self.length, other.length, "Vector lengths must match");
        Ok(Self {
            tree: self.tree.intersect(other.tree, function)?,
            length: self.length,
        })
    }

    pub fn or_else_add(self, other: Self) -> Self {
        self.or_else(other, JoinFunction::ADD, JoinFunction::ADD.union_fill())
    }

    pub fn or_else_sub(self, other: Self) -> Self {
        self.or_else(other, JoinFunction::SUB, JoinFunction::SUB.union_fill())
    }

    pub fn and_also_add(self, other: Self) -> Result<Self> {
        self.and_also(other, JoinFunction::ADD)
    }

    pub fn and_also_sub(self, other: Self) -> Result<Self> {
        self.and_also(other, JoinFunction::SUB)
    }

    pub fn and_also_mul(self, other: Self) -> Result<Self> {
        self.and_also(other, JoinFunction::MUL)
    }

    pub fn and_also_div(self, other: Self) -> Result<Self> {
        self.and_also(other, JoinFunction::DIV)
    }
}

impl<'a, T: Scalar> CursorIterator<T> for VectorCursor<'a, T> {
    fn has_next(&self) -> bool {
        self.tree.has_next()
    }

    fn advance(&mut self) -> Result<()> {
        self.tree.advance()
    }

    fn cursor(&self) -> usize {
        self.tree.cursor()
    }

    fn value(&self) -> T {
        self.tree.value()
    }
}

/// Cursor over the non-zero cells of a `rows × columns` matrix in one order
pub struct MatrixCursor<'a, T> {
    tree: JoinTree<'a, T>,
    order: Order,
    rows: usize,
    columns: usize,
}

impl<'a, T: Scalar> MatrixCursor<'a, T> {
    pub fn new(tree: JoinTree<'a, T>, order: Order, rows: usize, columns: usize) -> Self {
        Self {
            tree,
            order,
            rows,
            columns,
        }
    }

    pub fn order(&self) -> Order {
        self.order
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    /// The current cell, recovered from the linear cursor
    pub fn cell(&self) -> Cell {
        match self
            .order
            .delinearize(self.tree.cursor(), self.rows, self.columns)
        {
            Some(cell) => cell,
            None => panic!("a {}x{} matrix has no cells", self.rows, self.columns),
        }
    }

    pub fn row(&self) -> usize {
        self.cell().row
    }

    pub fn column(&self) -> usize {
        self.cell().column
    }

    pub fn tree(&self) -> &JoinTree<'a, T> {
        &self.tree
    }

    pub fn into_tree(self) -> JoinTree<'a, T> {
        self.tree
    }

    fn check_compatible(&self, other: &Self) {
        assert_eq!(
            self.order, other.order,
            "Both sides of a merge must share one traversal order"
        );
        assert_eq!(self.shape(), other.shape(), "Matrix shapes must match");
    }

    /// Union of both streams under `function`
    pub fn or_else(self, other: Self, function: JoinFunction, fill: FillMode) -> Self {
        self.check_compatible(&other);
        Self {
            tree: self.tree.union(other.tree, function, fill),
            ..self
        }
    }

    /// Intersection of both streams under `function`
    pub fn and_also(self, other: Self, function: JoinFunction) -> Result<Self> {
        self.check_compatible(&other);
        Ok(Self {
            tree: self.tree.intersect(other.tree, function)?,
            ..self
        })
    }

    pub fn or_else_add(self, other: Self) -> Self {
        self.or_else(other, JoinFunction::ADD, JoinFunction::ADD.union_fill())
    }

    pub fn or_else_sub(self, other: Self) -> Self {
        self.or_else(other, JoinFunction::SUB, JoinFunction::SUB.union_fill())
    }

    pub fn and_also_add(self, other: Self) -> Result<Self> {
        self.and_also(other, JoinFunction::ADD)
    }

    pub fn and_also_sub(self, other: Self) -> Result<Self> {
        self.and_also(other, JoinFunction::SUB)
    }

    pub fn and_also_mul(self, other: Self) -> Result<Self> {
        self.and_also(other, JoinFunction::MUL)
    }

    pub fn and_also_div(self, other: Self) -> Result<Self> {
        self.and_also(other, JoinFunction::DIV)
    }
}

impl<'a, T: Scalar> CursorIterator<T> for MatrixCursor<'a, T> {
    fn has_next(&self) -> bool {
        self.tree.has_next()
    }

    fn advance(&mut self) -> Result<()> {
        self.tree.advance()
    }

    fn cursor(&self) -> usize {
        self.tree.cursor()
    }

    fn value(&self) -> T {
        self.tree.value()
    }
}

/// Writable cursor over the non-zero entries of a vector
pub struct VectorCursorMut<'a, T> {
    inner: Box<dyn CursorIteratorMut<T> + 'a>,
}

impl<'a, T: Scalar> VectorCursorMut<'a, T> {
    pub fn new<C>(inner: C) -> Self
    where
        C: CursorIteratorMut<T> + 'a,
    {
        Self {
            inner: Box::new(inner),
        }
    }

    pub fn index(&self) -> usize {
        self.inner.cursor()
    }
}

/// Writable cursor over the non-zero cells of a matrix
pub struct MatrixCursorMut<'a, T> {
    inner: Box<dyn CursorIteratorMut<T> + 'a>,
    order: Order,
    rows: usize,
    columns: usize,
}

impl<'a, T: Scalar> MatrixCursorMut<'a, T> {
    pub fn new<C>(inner: C, order: Order, rows: usize, columns: usize) -> Self
    where
        C: CursorIteratorMut<T> + 'a,
    {
        Self {
            inner: Box::new(inner),
            order,
            rows,
            columns,
        }
    }

    pub fn order(&self) -> Order {
        self.order
    }

    pub fn cell(&self) -> Cell {
        match self
            .order
            .delinearize(self.inner.cursor(), self.rows, self.columns)
        {
            Some(cell) => cell,
            None => panic!("a {}x{} matrix has no cells", self.rows, self.columns),
        }
    }
}

macro_rules! delegate_cursor_mut {
    ($ty:ident) => {
        impl<'a, T: Scalar> CursorIterator<T> for $ty<'a, T> {
            fn has_next(&self) -> bool {
                self.inner.has_next()
            }

            fn advance(&mut self) -> Result<()> {
                self.inner.advance()
            }

            fn cursor(&self) -> usize {
                self.inner.cursor()
            }

            fn value(&self) -> T {
                self.inner.value()
            }
        }

        impl<'a, T: Scalar> CursorIteratorMut<T> for $ty<'a, T> {
            fn set(&mut self, value: T) {
                self.inner.set(value)
            }

            fn flush(&mut self) {
                self.inner.flush()
            }
        }
    };
}

delegate_cursor_mut!(VectorCursorMut);
delegate_cursor_mut!(MatrixCursorMut);
