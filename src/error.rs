//! Error types for sparsejoin

use thiserror::Error;

/// Result type alias using sparsejoin's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sparsejoin operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A cursor was advanced past its last cell
    #[error("Iterator exhausted: advance() called with no cells remaining")]
    IteratorExhausted,

    /// No handler, direct or mirrored, is registered for the kind pair
    #[error("Unsupported combination: no handler for {operation} on ({left}, {right})")]
    UnsupportedCombination {
        /// The requested operation
        operation: String,
        /// Kind of the left operand
        left: String,
        /// Kind of the right operand
        right: String,
    },

    /// Operand shapes disagree
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape
        got: Vec<usize>,
    },

    /// Raw compressed storage failed validation
    #[error("Invalid structure: {0}")]
    InvalidStructure(String),
}
