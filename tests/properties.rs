//! Property-based tests for the merge engine and the dispatcher

use std::collections::BTreeMap;

use proptest::prelude::*;
use sparsejoin::iterator::{collect_entries, empty, FillMode};
use sparsejoin::{
    Cell, DenseMatrix, DispatchConfig, Dispatcher, JoinFunction, JoinTree, Matrix, MatrixKind, Order, SparseVector,
    VectorCursor,
};

/// Mostly-zero small integers, so every sum and product is exact in f64
fn sparse_values(len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(
        prop_oneof![3 => Just(0.0), 2 => (-9i32..=9).prop_map(f64::from)],
        len,
    )
}

fn matrix_pair() -> impl Strategy<Value = (usize, usize, Vec<f64>, Vec<f64>)> {
    (1usize..6, 1usize..6).prop_flat_map(|(rows, cols)| {
        (Just(rows), Just(cols), sparse_values(rows * cols), sparse_values(rows * cols))
    })
}

fn vector_pair() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    (0usize..24).prop_flat_map(|len| (sparse_values(len), sparse_values(len)))
}

fn as_kind(dense: &DenseMatrix<f64>, kind: MatrixKind) -> Matrix<f64> {
    match kind {
        MatrixKind::Dense => Matrix::Dense(dense.clone()),
        MatrixKind::SparseRowMajor => Matrix::Csr(dense.to_csr()),
        MatrixKind::SparseColumnMajor => Matrix::Csc(dense.to_csc()),
    }
}

fn non_zeros(values: &[f64]) -> BTreeMap<usize, f64> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| **v != 0.0)
        .map(|(i, &v)| (i, v))
        .collect()
}

proptest! {
    #[test]
    fn prop_cursor_positions_strictly_increase((rows, cols, values, _) in matrix_pair()) {
        let dense = DenseMatrix::from_row_major_vec(rows, cols, values).unwrap();
        for kind in MatrixKind::ALL {
            let matrix = as_kind(&dense, kind);
            for order in [Order::RowMajor, Order::ColumnMajor] {
                let entries = collect_entries(&mut matrix.non_zero_iter(order)).unwrap();
                prop_assert!(entries.windows(2).all(|w| w[0].0 < w[1].0), "{} {}", kind, order);
                prop_assert_eq!(entries.len(), dense.nnz());
            }
        }
    }

    #[test]
    fn prop_union_visits_every_non_zero((a, b) in vector_pair()) {
        let (sa, sb) = (SparseVector::from_dense(&a), SparseVector::from_dense(&b));
        let (na, nb) = (non_zeros(&a), non_zeros(&b));

        for function in [JoinFunction::ADD, JoinFunction::SUB] {
            let mut merged = sa.non_zero_iter().or_else(sb.non_zero_iter(), function, FillMode::Passthrough);
            let entries = collect_entries(&mut merged).unwrap();

            let positions: Vec<_> = entries.iter().map(|&(i, _)| i).collect();
            let mut expected: Vec<_> = na.keys().chain(nb.keys()).copied().collect();
            expected.sort_unstable();
            expected.dedup();
            prop_assert_eq!(positions, expected);

            for (i, value) in entries {
                let want = match (na.get(&i), nb.get(&i)) {
                    (Some(&x), Some(&y)) => function.apply(x, y),
                    (Some(&x), None) => x,
                    (None, Some(&y)) => y,
                    (None, None) => unreachable!(),
                };
                prop_assert_eq!(value, want);
            }
        }
    }

    #[test]
    fn prop_intersect_visits_shared_non_zeros((a, b) in vector_pair()) {
        let (sa, sb) = (SparseVector::from_dense(&a), SparseVector::from_dense(&b));
        let (na, nb) = (non_zeros(&a), non_zeros(&b));

        let mut merged = sa.non_zero_iter().and_also_mul(sb.non_zero_iter()).unwrap();
        let entries = collect_entries(&mut merged).unwrap();

        let expected: Vec<_> = na
            .iter()
            .filter_map(|(i, &x)| nb.get(i).map(|&y| (*i, x * y)))
            .collect();
        prop_assert_eq!(entries, expected);
    }

    #[test]
    fn prop_every_kind_pair_agrees_with_dense((rows, cols, a, b) in matrix_pair()) {
        let dispatcher = Dispatcher::standard(DispatchConfig::default());
        let da = DenseMatrix::from_row_major_vec(rows, cols, a).unwrap();
        let db = DenseMatrix::from_row_major_vec(rows, cols, b).unwrap();

        let dense_sum = dispatcher.add(&Matrix::Dense(da.clone()), &Matrix::Dense(db.clone())).unwrap().to_dense();
        let dense_diff = dispatcher.subtract(&Matrix::Dense(da.clone()), &Matrix::Dense(db.clone())).unwrap().to_dense();
        let dense_prod = dispatcher.hadamard_product(&Matrix::Dense(da.clone()), &Matrix::Dense(db.clone())).unwrap().to_dense();

        for left_kind in MatrixKind::ALL {
            for right_kind in MatrixKind::ALL {
                let (left, right) = (as_kind(&da, left_kind), as_kind(&db, right_kind));
                prop_assert_eq!(dispatcher.add(&left, &right).unwrap().to_dense(), dense_sum.clone());
                prop_assert_eq!(dispatcher.subtract(&left, &right).unwrap().to_dense(), dense_diff.clone());
                prop_assert_eq!(dispatcher.hadamard_product(&left, &right).unwrap().to_dense(), dense_prod.clone());
            }
        }
    }

    #[test]
    fn prop_linearization_roundtrips(rows in 1usize..50, cols in 1usize..50, seed in any::<usize>()) {
        let cell = Cell::new(seed % rows, (seed / rows) % cols);
        for order in [Order::RowMajor, Order::ColumnMajor] {
            let cursor = order.linearize(cell, rows, cols);
            prop_assert!(cursor < rows * cols);
            prop_assert_eq!(order.delinearize(cursor, rows, cols), Some(cell));
        }
    }

    #[test]
    fn prop_union_with_empty_is_identity((a, _) in vector_pair()) {
        let sa = SparseVector::from_dense(&a);
        let expected = collect_entries(&mut sa.non_zero_iter()).unwrap();

        for function in [JoinFunction::ADD, JoinFunction::SUB] {
            let nothing = VectorCursor::new(JoinTree::leaf("empty", empty()), a.len());
            let mut merged = sa.non_zero_iter().or_else(nothing, function, function.union_fill());
            prop_assert_eq!(collect_entries(&mut merged).unwrap(), expected.clone());
        }
    }
}
