//! Utilities for converting between our matrix formats and sprs

use sprs::CsMat;

use crate::error::{Error, Result};
use crate::matrix::{SparseMatrixCSC, SparseMatrixCSR};
use crate::Scalar;

/// Converts our CSR matrix format to sprs CsMat format
pub fn to_sprs_csr<T: Scalar + Default>(matrix: &SparseMatrixCSR<T>) -> Result<CsMat<T>> {
    CsMat::try_new(
        (matrix.n_rows, matrix.n_cols),
        matrix.row_ptr.clone(),
        matrix.col_idx.clone(),
        matrix.values.clone(),
    )
    .map_err(|(_, _, _, err)| Error::InvalidStructure(err.to_string()))
}

/// Converts our CSC matrix format to sprs CsMat format (as CSC)
pub fn to_sprs_csc<T: Scalar + Default>(matrix: &SparseMatrixCSC<T>) -> Result<CsMat<T>> {
    CsMat::try_new_csc(
        (matrix.n_rows, matrix.n_cols),
        matrix.col_ptr.clone(),
        matrix.row_idx.clone(),
        matrix.values.clone(),
    )
    .map_err(|(_, _, _, err)| Error::InvalidStructure(err.to_string()))
}

/// Converts a sprs CsMat to our SparseMatrixCSR format
///
/// CSC input is converted to CSR first.
pub fn from_sprs_csr<T: Scalar + Default>(matrix: CsMat<T>) -> Result<SparseMatrixCSR<T>> {
    let matrix = if matrix.is_csr() { matrix } else { matrix.to_csr() };
    let (n_rows, n_cols) = matrix.shape();
    let (indptr, indices, data) = matrix.into_raw_storage();
    SparseMatrixCSR::try_new(n_rows, n_cols, indptr, indices, data)
}

/// Converts a sprs CsMat to our SparseMatrixCSC format
///
/// CSR input is converted to CSC first.
pub fn from_sprs_csc<T: Scalar + Default>(matrix: CsMat<T>) -> Result<SparseMatrixCSC<T>> {
    let matrix = if matrix.is_csc() { matrix } else { matrix.to_csc() };
    let (n_rows, n_cols) = matrix.shape();
    let (indptr, indices, data) = matrix.into_raw_storage();
    SparseMatrixCSC::try_new(n_rows, n_cols, indptr, indices, data)
}
