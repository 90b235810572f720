//! Built-in vector handlers
//!
//! `(dense, dense)` runs a dense loop, `(dense, sparse)` scans the sparse
//! side, `(sparse, sparse)` merge-joins. `(sparse, dense)` is mirrored.

use std::borrow::Cow;

use ndarray::{Array1, Zip};

use crate::config::DispatchConfig;
use crate::dispatch::{Dispatcher, Handler, Operand, Operation};
use crate::error::Result;
use crate::iterator::{collect_entries, CursorIterator, CursorIteratorMut, JoinFunction, JoinTree, StreamCursor, VectorCursor};
use crate::vector::{DenseVector, Vector, VectorKind};
use crate::Scalar;

impl<T: Scalar> Operand for Vector<T> {
    type Kind = VectorKind;

    fn kind(&self) -> VectorKind {
        Vector::kind(self)
    }

    fn kinds() -> &'static [VectorKind] {
        &VectorKind::ALL
    }

    fn shape(&self) -> Vec<usize> {
        vec![self.len()]
    }

    fn blank(kind: VectorKind, shape: &[usize]) -> Self {
        Vector::blank(kind, shape[0])
    }

    fn register_standard(dispatcher: &mut Dispatcher<Self>) {
        use VectorKind::{Dense, Sparse};

        for operation in [Operation::Add, Operation::Subtract] {
            dispatcher.register(operation, Dense, Dense, Handler::OutOfPlace(dense_dense::<T>));
            dispatcher.register(operation, Dense, Sparse, Handler::OutOfPlace(union_dense_sparse::<T>));
            dispatcher.register(operation, Sparse, Sparse, Handler::OutOfPlace(union_sparse::<T>));
        }
        dispatcher.register(Operation::HadamardProduct, Dense, Dense, Handler::OutOfPlace(dense_dense::<T>));
        dispatcher.register(Operation::HadamardProduct, Dense, Sparse, Handler::OutOfPlace(intersect_dense_sparse::<T>));
        dispatcher.register(Operation::HadamardProduct, Sparse, Sparse, Handler::OutOfPlace(intersect_sparse::<T>));

        for source in VectorKind::ALL {
            dispatcher.register(Operation::CopyInto, source, Dense, Handler::InPlace(copy_into_dense::<T>));
            dispatcher.register(Operation::CopyInto, source, Sparse, Handler::InPlace(rebuild_from::<T>));
            dispatcher.register(Operation::AddInPlace, source, Dense, Handler::InPlace(add_into_dense::<T>));
            dispatcher.register(Operation::AddInPlace, source, Sparse, Handler::InPlace(add_into_sparse::<T>));
            for destination in VectorKind::ALL {
                dispatcher.register(Operation::HadamardInPlace, source, destination, Handler::InPlace(hadamard_in_place::<T>));
            }
        }
    }
}

fn dense_array<T: Scalar>(vector: &Vector<T>) -> Cow<'_, Array1<T>> {
    match vector {
        Vector::Dense(dense) => Cow::Borrowed(dense.as_array()),
        Vector::Sparse(sparse) => Cow::Owned(Array1::from(sparse.to_dense())),
    }
}

fn dense_dense<T: Scalar>(left: &Vector<T>, right: &Vector<T>, function: JoinFunction, _: &DispatchConfig) -> Result<Vector<T>> {
    let (a, b) = (dense_array(left), dense_array(right));
    let out = Zip::from(&*a).and(&*b).map_collect(|&x, &y| function.apply(x, y));
    Ok(Vector::Dense(DenseVector::new(out)))
}

fn union_dense_sparse<T: Scalar>(
    left: &Vector<T>,
    right: &Vector<T>,
    function: JoinFunction,
    _: &DispatchConfig,
) -> Result<Vector<T>> {
    let dense = dense_array(left);
    let mut out = dense.mapv(|d| function.apply(d, T::zero()));

    let mut cursor = right.non_zero_iter();
    while cursor.has_next() {
        cursor.advance()?;
        let i = cursor.index();
        out[i] = function.apply(dense[i], cursor.value());
    }
    Ok(Vector::Dense(DenseVector::new(out)))
}

fn intersect_dense_sparse<T: Scalar>(
    left: &Vector<T>,
    right: &Vector<T>,
    function: JoinFunction,
    config: &DispatchConfig,
) -> Result<Vector<T>> {
    let dense = dense_array(left);
    let entries = collect_entries(&mut right.non_zero_iter())?;
    let stream = entries.into_iter().filter_map(|(i, s)| {
        let d = dense[i];
        (!d.is_zero()).then(|| (i, function.apply(d, s)))
    });

    let mut cursor = VectorCursor::new(JoinTree::leaf("masked", StreamCursor::new(stream)), right.len());
    Vector::from_cursor(right.kind(), &mut cursor, config.zero_policy)
}

fn union_sparse<T: Scalar>(left: &Vector<T>, right: &Vector<T>, function: JoinFunction, config: &DispatchConfig) -> Result<Vector<T>> {
    let mut merged = left
        .non_zero_iter()
        .or_else(right.non_zero_iter(), function, function.union_fill());
    Vector::from_cursor(left.kind(), &mut merged, config.zero_policy)
}

fn intersect_sparse<T: Scalar>(left: &Vector<T>, right: &Vector<T>, function: JoinFunction, config: &DispatchConfig) -> Result<Vector<T>> {
    let mut merged = left.non_zero_iter().and_also(right.non_zero_iter(), function)?;
    Vector::from_cursor(left.kind(), &mut merged, config.zero_policy)
}

fn copy_into_dense<T: Scalar>(source: &Vector<T>, destination: &mut Vector<T>, config: &DispatchConfig) -> Result<()> {
    match destination {
        Vector::Dense(dense) => dense.overwrite_from(&mut source.non_zero_iter()),
        other => rebuild_from(source, other, config),
    }
}

fn rebuild_from<T: Scalar>(source: &Vector<T>, destination: &mut Vector<T>, config: &DispatchConfig) -> Result<()> {
    let kind = destination.kind();
    *destination = Vector::from_cursor(kind, &mut source.non_zero_iter(), config.zero_policy)?;
    Ok(())
}

fn add_into_dense<T: Scalar>(source: &Vector<T>, destination: &mut Vector<T>, config: &DispatchConfig) -> Result<()> {
    let dense = match destination {
        Vector::Dense(dense) => dense,
        other => return add_into_sparse(source, other, config),
    };
    let mut cursor = source.non_zero_iter();
    while cursor.has_next() {
        cursor.advance()?;
        let i = cursor.index();
        dense.set(i, dense.get(i) + cursor.value());
    }
    Ok(())
}

fn add_into_sparse<T: Scalar>(source: &Vector<T>, destination: &mut Vector<T>, config: &DispatchConfig) -> Result<()> {
    let kind = destination.kind();
    let rebuilt = {
        let mut merged = destination.non_zero_iter().or_else_add(source.non_zero_iter());
        Vector::from_cursor(kind, &mut merged, config.zero_policy)?
    };
    *destination = rebuilt;
    Ok(())
}

fn hadamard_in_place<T: Scalar>(source: &Vector<T>, destination: &mut Vector<T>, _: &DispatchConfig) -> Result<()> {
    let mut cursor = destination.non_zero_iter_mut();
    while cursor.has_next() {
        cursor.advance()?;
        let product = cursor.value() * source.get(cursor.index());
        cursor.set(product);
    }
    cursor.flush();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::SparseVector;

    fn sparse(values: &[f64]) -> Vector<f64> {
        Vector::Sparse(SparseVector::from_dense(values))
    }

    fn dense(values: &[f64]) -> Vector<f64> {
        Vector::Dense(DenseVector::from_vec(values.to_vec()))
    }

    #[test]
    fn test_standard_table_is_complete() {
        let dispatcher = Dispatcher::<Vector<f64>>::standard(DispatchConfig::default());
        assert!(dispatcher.missing_combinations().is_empty());

        let strict = Dispatcher::<Vector<f64>>::standard(DispatchConfig::strict());
        assert_eq!(strict.missing_combinations().len(), 3);
    }

    #[test]
    fn test_sparse_union_and_intersect() {
        let dispatcher = Dispatcher::standard(DispatchConfig::default());
        let a = sparse(&[2.0, 0.0, 5.0, 0.0, 2.0]);
        let b = sparse(&[0.0, 3.0, 5.0, 0.0, 0.0]);

        let sum = dispatcher.add(&a, &b).unwrap();
        assert_eq!(sum.kind(), VectorKind::Sparse);
        assert_eq!(sum.to_dense(), vec![2.0, 3.0, 10.0, 0.0, 2.0]);

        let product = dispatcher.hadamard_product(&a, &b).unwrap();
        assert_eq!(product.nnz(), 1);
        assert_eq!(product.to_dense(), vec![0.0, 0.0, 25.0, 0.0, 0.0]);
    }

    #[test]
    fn test_subtract_matches_across_kinds() {
        let dispatcher = Dispatcher::standard(DispatchConfig::default());
        let values_a = [2.0, 0.0, 5.0, 0.0];
        let values_b = [0.0, 3.0, 1.0, 0.0];
        let expected = vec![2.0, -3.0, 4.0, 0.0];

        for a in [dense(&values_a), sparse(&values_a)] {
            for b in [dense(&values_b), sparse(&values_b)] {
                let out = dispatcher.subtract(&a, &b).unwrap();
                assert_eq!(out.to_dense(), expected, "{} - {}", a.kind(), b.kind());
            }
        }
    }

    #[test]
    fn test_in_place_into_sparse() {
        let dispatcher = Dispatcher::standard(DispatchConfig::default());
        let source = dense(&[1.0, 0.0, -2.0]);
        let mut destination = sparse(&[0.0, 4.0, 2.0]);

        dispatcher.add_in_place(&source, &mut destination).unwrap();
        assert_eq!(destination.kind(), VectorKind::Sparse);
        assert_eq!(destination.to_dense(), vec![1.0, 4.0, 0.0]);
        assert_eq!(destination.nnz(), 2);

        dispatcher.copy_into(&source, &mut destination).unwrap();
        assert_eq!(destination.to_dense(), vec![1.0, 0.0, -2.0]);
    }

    #[test]
    fn test_empty_vectors_short_circuit() {
        let dispatcher = Dispatcher::<Vector<f64>>::new(DispatchConfig::default());
        let a = Vector::blank(VectorKind::Sparse, 0);
        let b = Vector::blank(VectorKind::Dense, 0);

        let out = dispatcher.add(&a, &b).unwrap();
        assert_eq!(out.kind(), VectorKind::Sparse);
        assert!(out.is_empty());
    }
}
