//! Built-in matrix handlers
//!
//! | left \ right | dense          | csr            | csc            |
//! |--------------|----------------|----------------|----------------|
//! | dense        | dense loop     | mixed scan     | mixed scan     |
//! | csr          | mirrored       | merge-join     | merge-join     |
//! | csc          | mirrored       | mirrored       | merge-join     |
//!
//! In-place operations are registered for all nine pairs.

use std::borrow::Cow;

use ndarray::{Array2, Zip};

use crate::config::DispatchConfig;
use crate::dispatch::{Dispatcher, Handler, Operand, Operation};
use crate::error::Result;
use crate::iterator::{collect_entries, CursorIterator, CursorIteratorMut, JoinFunction, JoinTree, MatrixCursor, StreamCursor};
use crate::matrix::{CellAccess, DenseMatrix, Matrix, MatrixKind};
use crate::position::Order;
use crate::Scalar;

impl<T: Scalar> Operand for Matrix<T> {
    type Kind = MatrixKind;

    fn kind(&self) -> MatrixKind {
        Matrix::kind(self)
    }

    fn kinds() -> &'static [MatrixKind] {
        &MatrixKind::ALL
    }

    fn shape(&self) -> Vec<usize> {
        let (n_rows, n_cols) = Matrix::shape(self);
        vec![n_rows, n_cols]
    }

    fn blank(kind: MatrixKind, shape: &[usize]) -> Self {
        Matrix::blank(kind, shape[0], shape[1])
    }

    fn register_standard(dispatcher: &mut Dispatcher<Self>) {
        use MatrixKind::{Dense, SparseColumnMajor as Csc, SparseRowMajor as Csr};

        let arithmetic = [Operation::Add, Operation::Subtract];

        for operation in arithmetic {
            dispatcher.register(operation, Dense, Dense, Handler::OutOfPlace(dense_dense::<T>));
            dispatcher.register(operation, Dense, Csr, Handler::OutOfPlace(union_dense_sparse::<T>));
            dispatcher.register(operation, Dense, Csc, Handler::OutOfPlace(union_dense_sparse::<T>));
        }
        dispatcher.register(Operation::HadamardProduct, Dense, Dense, Handler::OutOfPlace(dense_dense::<T>));
        dispatcher.register(Operation::HadamardProduct, Dense, Csr, Handler::OutOfPlace(intersect_dense_sparse::<T>));
        dispatcher.register(Operation::HadamardProduct, Dense, Csc, Handler::OutOfPlace(intersect_dense_sparse::<T>));

        for (left, right) in [(Csr, Csr), (Csc, Csc), (Csr, Csc)] {
            for operation in arithmetic {
                dispatcher.register(operation, left, right, Handler::OutOfPlace(union_sparse::<T>));
            }
            dispatcher.register(Operation::HadamardProduct, left, right, Handler::OutOfPlace(intersect_sparse::<T>));
        }

        for source in MatrixKind::ALL {
            dispatcher.register(Operation::CopyInto, source, Dense, Handler::InPlace(copy_into_dense::<T>));
            dispatcher.register(Operation::AddInPlace, source, Dense, Handler::InPlace(add_into_dense::<T>));
            for destination in [Csr, Csc] {
                dispatcher.register(Operation::CopyInto, source, destination, Handler::InPlace(copy_into_sparse::<T>));
                dispatcher.register(Operation::AddInPlace, source, destination, Handler::InPlace(add_into_sparse::<T>));
            }
            for destination in MatrixKind::ALL {
                dispatcher.register(Operation::HadamardInPlace, source, destination, Handler::InPlace(hadamard_in_place::<T>));
            }
        }
    }
}

// Borrows dense storage, densifying anything else.
fn dense_array<T: Scalar>(matrix: &Matrix<T>) -> Cow<'_, Array2<T>> {
    match matrix {
        Matrix::Dense(dense) => Cow::Borrowed(dense.as_array()),
        other => Cow::Owned(other.to_dense().into_array()),
    }
}

fn dense_dense<T: Scalar>(left: &Matrix<T>, right: &Matrix<T>, function: JoinFunction, _: &DispatchConfig) -> Result<Matrix<T>> {
    let (a, b) = (dense_array(left), dense_array(right));
    let out = Zip::from(&*a).and(&*b).map_collect(|&x, &y| function.apply(x, y));
    Ok(Matrix::Dense(DenseMatrix::new(out)))
}

/// Dense result: `f(d, 0)` everywhere, `f(d, s)` on the sparse operand's cells
fn union_dense_sparse<T: Scalar>(
    left: &Matrix<T>,
    right: &Matrix<T>,
    function: JoinFunction,
    _: &DispatchConfig,
) -> Result<Matrix<T>> {
    let dense = dense_array(left);
    let mut out = dense.mapv(|d| function.apply(d, T::zero()));

    let mut cursor = right.non_zero_iter(right.kind().natural_order());
    while cursor.has_next() {
        cursor.advance()?;
        let cell = cursor.cell();
        let index = [cell.row, cell.column];
        out[index] = function.apply(dense[index], cursor.value());
    }
    Ok(Matrix::Dense(DenseMatrix::new(out)))
}

/// Scans the sparse operand and keeps cells where the dense side is non-zero
///
/// The result takes the sparse operand's kind.
fn intersect_dense_sparse<T: Scalar>(
    left: &Matrix<T>,
    right: &Matrix<T>,
    function: JoinFunction,
    config: &DispatchConfig,
) -> Result<Matrix<T>> {
    let dense = dense_array(left);
    let order = right.kind().natural_order();
    let (n_rows, n_cols) = right.shape();

    let entries = collect_entries(&mut right.non_zero_iter(order))?;
    let stream = entries.into_iter().filter_map(|(position, s)| {
        let cell = order.delinearize(position, n_rows, n_cols)?;
        let d = dense[[cell.row, cell.column]];
        (!d.is_zero()).then(|| (position, function.apply(d, s)))
    });

    let mut cursor = MatrixCursor::new(JoinTree::leaf("masked", StreamCursor::new(stream)), order, n_rows, n_cols);
    Matrix::from_cursor(right.kind(), &mut cursor, config.zero_policy)
}

/// Union merge-join in the left operand's natural order
fn union_sparse<T: Scalar>(left: &Matrix<T>, right: &Matrix<T>, function: JoinFunction, config: &DispatchConfig) -> Result<Matrix<T>> {
    let order = left.kind().natural_order();
    let mut merged = left
        .non_zero_iter(order)
        .or_else(right.non_zero_iter(order), function, function.union_fill());
    Matrix::from_cursor(left.kind(), &mut merged, config.zero_policy)
}

/// Intersection merge-join in the left operand's natural order
fn intersect_sparse<T: Scalar>(
    left: &Matrix<T>,
    right: &Matrix<T>,
    function: JoinFunction,
    config: &DispatchConfig,
) -> Result<Matrix<T>> {
    let order = left.kind().natural_order();
    let mut merged = left.non_zero_iter(order).and_also(right.non_zero_iter(order), function)?;
    Matrix::from_cursor(left.kind(), &mut merged, config.zero_policy)
}

fn copy_into_dense<T: Scalar>(source: &Matrix<T>, destination: &mut Matrix<T>, config: &DispatchConfig) -> Result<()> {
    match destination {
        Matrix::Dense(dense) => dense.overwrite_from(&mut source.non_zero_iter(Order::RowMajor)),
        other => copy_into_sparse(source, other, config),
    }
}

/// Rebuilds the destination's storage from the source's non-zero cells
fn copy_into_sparse<T: Scalar>(source: &Matrix<T>, destination: &mut Matrix<T>, config: &DispatchConfig) -> Result<()> {
    let kind = destination.kind();
    let mut cursor = source.non_zero_iter(kind.natural_order());
    *destination = Matrix::from_cursor(kind, &mut cursor, config.zero_policy)?;
    Ok(())
}

fn add_into_dense<T: Scalar>(source: &Matrix<T>, destination: &mut Matrix<T>, config: &DispatchConfig) -> Result<()> {
    let dense = match destination {
        Matrix::Dense(dense) => dense,
        other => return add_into_sparse(source, other, config),
    };
    let mut cursor = source.non_zero_iter(Order::RowMajor);
    while cursor.has_next() {
        cursor.advance()?;
        let cell = cursor.cell();
        let sum = dense.get(cell.row, cell.column) + cursor.value();
        dense.set(cell.row, cell.column, sum);
    }
    Ok(())
}

/// Union of destination and source, rebuilt into the destination's kind
fn add_into_sparse<T: Scalar>(source: &Matrix<T>, destination: &mut Matrix<T>, config: &DispatchConfig) -> Result<()> {
    let kind = destination.kind();
    let order = kind.natural_order();
    let rebuilt = {
        let mut merged = destination.non_zero_iter(order).or_else_add(source.non_zero_iter(order));
        Matrix::from_cursor(kind, &mut merged, config.zero_policy)?
    };
    *destination = rebuilt;
    Ok(())
}

/// Visits only the destination's non-zero cells; zeros produced are pruned
fn hadamard_in_place<T: Scalar>(source: &Matrix<T>, destination: &mut Matrix<T>, _: &DispatchConfig) -> Result<()> {
    let mut cursor = destination.non_zero_iter_mut();
    while cursor.has_next() {
        cursor.advance()?;
        let cell = cursor.cell();
        let product = cursor.value() * source.get(cell.row, cell.column);
        cursor.set(product);
    }
    cursor.flush();
    Ok(())
}
