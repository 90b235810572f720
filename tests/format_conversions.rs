//! Integration tests for format conversions, with sprs as an external reference

use sparsejoin::utils::{from_sprs_csc, from_sprs_csr, to_sprs_csc, to_sprs_csr};
use sparsejoin::{DispatchConfig, Dispatcher, Error, Matrix, SparseMatrixCSR};

/// Creates a test matrix with a specific pattern
fn create_test_matrix_csr() -> SparseMatrixCSR<f64> {
    // [ 1.0  0.0  2.0  0.0  0.0 ]
    // [ 0.0  3.0  0.0  0.0  4.0 ]
    // [ 0.0  0.0  5.0  0.0  0.0 ]
    // [ 6.0  0.0  0.0  7.0  0.0 ]
    // [ 0.0  0.0  8.0  0.0  9.0 ]
    SparseMatrixCSR::new(
        5, 5,
        vec![0, 2, 4, 5, 7, 9],
        vec![0, 2, 1, 4, 2, 0, 3, 2, 4],
        vec![1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0],
    )
}

/// Creates a tridiagonal matrix in CSR format
fn create_tridiagonal_csr(n: usize, diagonal: f64) -> SparseMatrixCSR<f64> {
    let mut row_ptr = Vec::with_capacity(n + 1);
    let mut col_idx = Vec::new();
    let mut values = Vec::new();

    row_ptr.push(0);

    for i in 0..n {
        // Lower diagonal
        if i > 0 {
            col_idx.push(i - 1);
            values.push(1.0f64);
        }

        // Diagonal
        col_idx.push(i);
        values.push(diagonal);

        // Upper diagonal
        if i < n - 1 {
            col_idx.push(i + 1);
            values.push(1.0f64);
        }

        row_ptr.push(col_idx.len());
    }

    SparseMatrixCSR::new(n, n, row_ptr, col_idx, values)
}

#[test]
fn test_csr_to_sprs_conversion() {
    let csr = create_test_matrix_csr();
    let sprs_mat = to_sprs_csr(&csr).unwrap();

    assert_eq!(sprs_mat.rows(), csr.n_rows);
    assert_eq!(sprs_mat.cols(), csr.n_cols);
    assert_eq!(sprs_mat.nnz(), csr.nnz());
    assert!(sprs_mat.is_csr());

    assert_eq!(sprs_mat.get(0, 2), Some(&2.0));
    assert_eq!(sprs_mat.get(3, 3), Some(&7.0));
    assert_eq!(sprs_mat.get(4, 4), Some(&9.0));

    // Check that zeros are really zeros
    assert_eq!(sprs_mat.get(0, 1), None);
    assert_eq!(sprs_mat.get(2, 3), None);
}

#[test]
fn test_sprs_to_csr_conversion() {
    let mut trip = sprs::TriMat::new((4, 4));
    trip.add_triplet(0, 0, 1.0);
    trip.add_triplet(0, 2, 2.0);
    trip.add_triplet(1, 1, 3.0);
    trip.add_triplet(2, 0, 4.0);
    trip.add_triplet(3, 3, 5.0);

    let csr = from_sprs_csr(trip.to_csr()).unwrap();

    assert_eq!((csr.n_rows, csr.n_cols), (4, 4));
    assert_eq!(csr.row_ptr, vec![0, 2, 3, 4, 5]);
    assert_eq!(csr.col_idx, vec![0, 2, 1, 0, 3]);
    assert_eq!(csr.values, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
}

#[test]
fn test_csc_conversions() {
    let csc = create_test_matrix_csr().to_csc();

    let sprs_csc = to_sprs_csc(&csc).unwrap();
    assert!(sprs_csc.is_csc());

    let roundtrip = from_sprs_csc(sprs_csc).unwrap();
    assert_eq!(roundtrip, csc);
}

#[test]
fn test_malformed_storage_is_reported() {
    let broken = SparseMatrixCSR {
        n_rows: 2,
        n_cols: 2,
        row_ptr: vec![0, 2, 1],
        col_idx: vec![0],
        values: vec![1.0f64],
    };

    let err = to_sprs_csr(&broken).unwrap_err();
    assert!(matches!(err, Error::InvalidStructure(_)));
}

#[test]
fn test_sparse_add_matches_sprs() {
    let a = create_tridiagonal_csr(50, 2.0);
    let b = create_test_matrix_csr();
    let b = {
        // Embed the 5x5 pattern in the top-left corner of a 50x50 matrix
        let mut row_ptr = b.row_ptr.clone();
        row_ptr.resize(51, b.nnz());
        SparseMatrixCSR::new(50, 50, row_ptr, b.col_idx.clone(), b.values.clone())
    };

    let reference = &to_sprs_csr(&a).unwrap() + &to_sprs_csr(&b).unwrap();
    let reference = from_sprs_csr(reference).unwrap();

    let dispatcher = Dispatcher::standard(DispatchConfig::default());
    let sum = dispatcher
        .add(&Matrix::from(a.clone()), &Matrix::from(b.to_csc()))
        .unwrap();

    assert_eq!(sum, Matrix::Csr(reference));
}

#[test]
fn test_large_banded_roundtrip() {
    let size = 1000;
    let a = create_tridiagonal_csr(size, 2.0);
    assert_eq!(a.nnz(), 3 * size - 2);

    let sprs_a = to_sprs_csr(&a).unwrap();
    assert_eq!(sprs_a.get(size / 2, size / 2 - 1), Some(&1.0));
    assert_eq!(sprs_a.get(size - 1, size - 1), Some(&2.0));

    let roundtrip = from_sprs_csr(sprs_a).unwrap();
    assert_eq!(roundtrip, a);
}
