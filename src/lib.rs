//! # sparsejoin: sparse-aware binary operations on vectors and matrices
//!
//! Vectors and matrices come in interchangeable dense and sparse
//! representations. Binary operations (add, subtract, Hadamard product,
//! copy) run in time proportional to the number of non-zero entries when
//! both operands are sparse, and fall back to dense loops otherwise, without
//! the caller needing to know which representation it holds.
//!
//! ## Components
//!
//! 1. **Positions** ([`position`]): row-major and column-major orders over
//!    matrix cells, with exact linearization.
//!
//! 2. **Cursors** ([`iterator`]): forward-only cursors over non-zero cells,
//!    and the merge-join engine combining two cursors by union or
//!    intersection. Merged cursors are cursors themselves, so merges nest.
//!
//! 3. **Containers** ([`vector`], [`matrix`]): dense and sparse vectors;
//!    dense, CSR and CSC matrices.
//!
//! 4. **Dispatch** ([`dispatch`]): an explicit table from operation and
//!    operand kinds to the handler implementing that combination.
//!
//! ## Usage
//!
//! ```
//! use sparsejoin::{DispatchConfig, Dispatcher, Matrix, SparseMatrixCSC, SparseMatrixCSR};
//!
//! let a: Matrix<f64> = SparseMatrixCSR::new(2, 2, vec![0, 1, 2], vec![0, 1], vec![1.0, 4.0]).into();
//! let b: Matrix<f64> = SparseMatrixCSC::new(2, 2, vec![0, 1, 2], vec![1, 0], vec![3.0, 2.0]).into();
//!
//! let dispatcher = Dispatcher::standard(DispatchConfig::default());
//! let sum = dispatcher.add(&a, &b).unwrap();
//! assert_eq!(sum.nnz(), 4);
//! ```
//!
//! Merging cursors directly:
//!
//! ```
//! use sparsejoin::iterator::collect_entries;
//! use sparsejoin::SparseVector;
//!
//! let a = SparseVector::from_dense(&[2.0, 0.0, 5.0, 0.0, 2.0]);
//! let b = SparseVector::from_dense(&[0.0, 3.0, 5.0, 0.0, 0.0]);
//!
//! let mut product = a.non_zero_iter().and_also_mul(b.non_zero_iter()).unwrap();
//! assert_eq!(collect_entries(&mut product).unwrap(), vec![(2, 25.0)]);
//! ```

use std::fmt;

use num_traits::Num;

pub mod config;
pub mod dispatch;
pub mod error;
pub mod iterator;
pub mod matrix;
pub mod position;
pub mod utils;
pub mod vector;

// Re-export primary components
pub use config::{DispatchConfig, ZeroPolicy};
pub use dispatch::{Dispatcher, Handler, Operand, Operation};
pub use error::{Error, Result};
pub use iterator::{CursorIterator, CursorIteratorMut, FillMode, JoinFunction, JoinTree, MatrixCursor, VectorCursor};
pub use matrix::{CellAccess, DenseMatrix, Matrix, MatrixKind, SparseMatrixCSC, SparseMatrixCSR};
pub use position::{Cell, Order};
pub use utils::{from_sprs_csc, from_sprs_csr, to_sprs_csc, to_sprs_csr};
pub use vector::{DenseVector, SparseVector, Vector, VectorKind};

/// Element types the containers and the merge engine work with
pub trait Scalar: Copy + Num + PartialEq + fmt::Debug + 'static {}

impl<T> Scalar for T where T: Copy + Num + PartialEq + fmt::Debug + 'static {}

/// Version information for the sparsejoin library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
