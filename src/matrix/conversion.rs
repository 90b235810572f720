//! Conversion functions between matrix formats
//!
//! Every conversion drains a non-zero cursor of the source in the target's
//! natural order into the target's builder.

use crate::config::ZeroPolicy;
use crate::matrix::{DenseMatrix, SparseMatrixCSC, SparseMatrixCSR};
use crate::position::Order;
use crate::Scalar;

impl<T: Scalar> SparseMatrixCSR<T> {
    /// Converts this CSR matrix to CSC format
    pub fn to_csc(&self) -> SparseMatrixCSC<T> {
        let mut cursor = self.non_zero_iter(Order::ColumnMajor);
        match SparseMatrixCSC::from_column_major(&mut cursor, ZeroPolicy::KeepExplicitZeros) {
            Ok(matrix) => matrix,
            Err(err) => unreachable!("draining a guarded cursor cannot fail: {err}"),
        }
    }

    /// Converts this CSR matrix to a dense matrix
    pub fn to_dense(&self) -> DenseMatrix<T> {
        let mut dense = DenseMatrix::zeros(self.n_rows, self.n_cols);
        for i in 0..self.n_rows {
            for (j, &value) in self.row_iter(i) {
                dense.as_array_mut()[[i, j]] = value;
            }
        }
        dense
    }
}

impl<T: Scalar> SparseMatrixCSC<T> {
    /// Converts this CSC matrix to CSR format
    pub fn to_csr(&self) -> SparseMatrixCSR<T> {
        let mut cursor = self.non_zero_iter(Order::RowMajor);
        match SparseMatrixCSR::from_row_major(&mut cursor, ZeroPolicy::KeepExplicitZeros) {
            Ok(matrix) => matrix,
            Err(err) => unreachable!("draining a guarded cursor cannot fail: {err}"),
        }
    }

    /// Converts this CSC matrix to a dense matrix
    pub fn to_dense(&self) -> DenseMatrix<T> {
        let mut dense = DenseMatrix::zeros(self.n_rows, self.n_cols);
        for j in 0..self.n_cols {
            for (i, &value) in self.col_iter(j) {
                dense.as_array_mut()[[i, j]] = value;
            }
        }
        dense
    }
}

impl<T: Scalar> DenseMatrix<T> {
    /// Converts to CSR, dropping zero cells
    pub fn to_csr(&self) -> SparseMatrixCSR<T> {
        let mut cursor = self.non_zero_iter(Order::RowMajor);
        match SparseMatrixCSR::from_row_major(&mut cursor, ZeroPolicy::DropExplicitZeros) {
            Ok(matrix) => matrix,
            Err(err) => unreachable!("draining a guarded cursor cannot fail: {err}"),
        }
    }

    /// Converts to CSC, dropping zero cells
    pub fn to_csc(&self) -> SparseMatrixCSC<T> {
        let mut cursor = self.non_zero_iter(Order::ColumnMajor);
        match SparseMatrixCSC::from_column_major(&mut cursor, ZeroPolicy::DropExplicitZeros) {
            Ok(matrix) => matrix,
            Err(err) => unreachable!("draining a guarded cursor cannot fail: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_csr_to_csc_conversion() {
        // Create a CSR matrix
        //    [1 2 0]
        //    [0 3 0]
        //    [4 0 5]
        let csr = SparseMatrixCSR::new(
            3,
            3,
            vec![0, 2, 3, 5],
            vec![0, 1, 1, 0, 2],
            vec![1, 2, 3, 4, 5],
        );

        let csc = csr.to_csc();

        assert_eq!(csc.nnz(), 5);
        assert_eq!(csc.col_ptr, vec![0, 2, 4, 5]);

        let col0: Vec<_> = csc.col_iter(0).collect();
        assert_eq!(col0, vec![(0, &1), (2, &4)]);

        let col2: Vec<_> = csc.col_iter(2).collect();
        assert_eq!(col2, vec![(2, &5)]);
    }

    #[test]
    fn test_csc_to_csr_conversion() {
        let csc = SparseMatrixCSC::new(
            3,
            3,
            vec![0, 2, 4, 5],
            vec![0, 2, 0, 1, 2],
            vec![1, 4, 2, 3, 5],
        );

        let csr = csc.to_csr();

        assert_eq!(csr.row_ptr, vec![0, 2, 3, 5]);
        assert_eq!(csr.col_idx, vec![0, 1, 1, 0, 2]);
        assert_eq!(csr.values, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let original = SparseMatrixCSR::new(
            3,
            3,
            vec![0, 2, 3, 5],
            vec![0, 1, 1, 0, 2],
            vec![1, 2, 3, 4, 5],
        );

        assert_eq!(original.to_csc().to_csr(), original);
    }

    #[test]
    fn test_dense_conversions() {
        let dense = DenseMatrix::new(array![[1.0, 0.0], [0.0, 4.0]]);

        assert_eq!(dense.to_csr().to_dense(), dense);
        assert_eq!(dense.to_csc().to_dense(), dense);
        assert_eq!(dense.to_csr().nnz(), 2);
    }
}
