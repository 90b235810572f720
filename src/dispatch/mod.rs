//! Representation dispatch for binary operations
//!
//! A [`Dispatcher`] holds an explicit table from `(operation, left kind,
//! right kind)` to the handler implementing that combination. Out-of-place
//! operations may fall back to the handler registered for the mirrored kind
//! pair; in-place operations must be registered for every ordered pair.

pub mod matrix_ops;
pub mod vector_ops;

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use crate::config::DispatchConfig;
use crate::error::{Error, Result};
use crate::iterator::JoinFunction;

/// A value the dispatcher can route on: a vector or a matrix enum
pub trait Operand: Sized {
    /// The closed set of representation kinds
    type Kind: Copy + Eq + Hash + fmt::Debug + fmt::Display + 'static;

    fn kind(&self) -> Self::Kind;

    /// Every kind, for auditing the handler table
    fn kinds() -> &'static [Self::Kind];

    fn shape(&self) -> Vec<usize>;

    /// A zero operand of `kind` and `shape`
    fn blank(kind: Self::Kind, shape: &[usize]) -> Self;

    /// Registers the built-in handlers
    fn register_standard(dispatcher: &mut Dispatcher<Self>);
}

/// A binary operation the dispatcher can route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Subtract,
    HadamardProduct,
    /// Overwrites the destination with the source
    CopyInto,
    /// `destination += source`
    AddInPlace,
    /// `destination ∘= source`
    HadamardInPlace,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::Add,
        Operation::Subtract,
        Operation::HadamardProduct,
        Operation::CopyInto,
        Operation::AddInPlace,
        Operation::HadamardInPlace,
    ];

    /// In-place operations write into their right operand
    pub fn is_in_place(self) -> bool {
        matches!(
            self,
            Operation::CopyInto | Operation::AddInPlace | Operation::HadamardInPlace
        )
    }

    pub fn is_commutative(self) -> bool {
        matches!(self, Operation::Add | Operation::HadamardProduct)
    }

    /// The combining function of an arithmetic operation
    pub fn function(self) -> Option<JoinFunction> {
        match self {
            Operation::Add | Operation::AddInPlace => Some(JoinFunction::ADD),
            Operation::Subtract => Some(JoinFunction::SUB),
            Operation::HadamardProduct | Operation::HadamardInPlace => Some(JoinFunction::MUL),
            Operation::CopyInto => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::HadamardProduct => "hadamard_product",
            Operation::CopyInto => "copy_into",
            Operation::AddInPlace => "add_in_place",
            Operation::HadamardInPlace => "hadamard_in_place",
        };
        write!(f, "{name}")
    }
}

/// Builds a fresh result from `(left, right)` under a combining function
pub type OutOfPlaceFn<O> = fn(&O, &O, JoinFunction, &DispatchConfig) -> Result<O>;

/// Mutates the destination (second argument) using the source (first)
pub type InPlaceFn<O> = fn(&O, &mut O, &DispatchConfig) -> Result<()>;

/// A registered implementation for one kind pair
pub enum Handler<O> {
    OutOfPlace(OutOfPlaceFn<O>),
    InPlace(InPlaceFn<O>),
}

impl<O> Clone for Handler<O> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<O> Copy for Handler<O> {}

impl<O> fmt::Debug for Handler<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::OutOfPlace(_) => write!(f, "Handler::OutOfPlace"),
            Handler::InPlace(_) => write!(f, "Handler::InPlace"),
        }
    }
}

/// Routes operations to the handler registered for the operands' kinds
pub struct Dispatcher<O: Operand> {
    config: DispatchConfig,
    handlers: HashMap<(Operation, O::Kind, O::Kind), Handler<O>>,
}

impl<O: Operand> Dispatcher<O> {
    /// An empty dispatcher with no handlers
    pub fn new(config: DispatchConfig) -> Self {
        Self {
            config,
            handlers: HashMap::new(),
        }
    }

    /// A dispatcher with every built-in handler registered
    pub fn standard(config: DispatchConfig) -> Self {
        let mut dispatcher = Self::new(config);
        O::register_standard(&mut dispatcher);
        dispatcher
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Registers a handler, returning the one it replaces
    ///
    /// # Panics
    ///
    /// Panics if the handler's flavour does not match the operation.
    pub fn register(
        &mut self,
        operation: Operation,
        left: O::Kind,
        right: O::Kind,
        handler: Handler<O>,
    ) -> Option<Handler<O>> {
        let in_place_handler = matches!(handler, Handler::InPlace(_));
        assert_eq!(
            operation.is_in_place(),
            in_place_handler,
            "{operation} needs an {} handler",
            if operation.is_in_place() { "in-place" } else { "out-of-place" }
        );
        self.handlers.insert((operation, left, right), handler)
    }

    pub fn is_registered(&self, operation: Operation, left: O::Kind, right: O::Kind) -> bool {
        self.handlers.contains_key(&(operation, left, right))
    }

    /// Whether a call with these kinds would find a handler
    pub fn supports(&self, operation: Operation, left: O::Kind, right: O::Kind) -> bool {
        self.is_registered(operation, left, right)
            || (self.mirroring_allowed(operation) && self.is_registered(operation, right, left))
    }

    /// Every `(operation, left, right)` that would fail with
    /// [`Error::UnsupportedCombination`]
    pub fn missing_combinations(&self) -> Vec<(Operation, O::Kind, O::Kind)> {
        let mut missing = Vec::new();
        for operation in Operation::ALL {
            for &left in O::kinds() {
                for &right in O::kinds() {
                    if !self.supports(operation, left, right) {
                        missing.push((operation, left, right));
                    }
                }
            }
        }
        missing
    }

    /// Runs an out-of-place operation without validating shapes
    ///
    /// # Panics
    ///
    /// Panics if `operation` is in-place.
    pub fn apply(&self, operation: Operation, left: &O, right: &O) -> Result<O> {
        let function = match (operation.is_in_place(), operation.function()) {
            (false, Some(function)) => function,
            _ => panic!("{operation} mutates its destination; use apply_in_place"),
        };
        let (left_kind, right_kind) = (left.kind(), right.kind());

        if let Some(Handler::OutOfPlace(handler)) = self.handlers.get(&(operation, left_kind, right_kind)) {
            tracing::debug!(%operation, left = %left_kind, right = %right_kind, "direct handler");
            return handler(left, right, function, &self.config);
        }

        if self.mirroring_allowed(operation) {
            if let Some(Handler::OutOfPlace(handler)) = self.handlers.get(&(operation, right_kind, left_kind)) {
                let function = if operation.is_commutative() {
                    function
                } else {
                    function.reverse()
                };
                tracing::debug!(
                    %operation,
                    left = %left_kind,
                    right = %right_kind,
                    %function,
                    "mirrored handler"
                );
                return handler(right, left, function, &self.config);
            }
        }

        Err(unsupported(operation, left_kind, right_kind))
    }

    /// Runs an in-place operation on `destination` without validating shapes
    ///
    /// # Panics
    ///
    /// Panics if `operation` is out-of-place.
    pub fn apply_in_place(&self, operation: Operation, source: &O, destination: &mut O) -> Result<()> {
        assert!(
            operation.is_in_place(),
            "{operation} builds a fresh result; use apply"
        );
        let (source_kind, destination_kind) = (source.kind(), destination.kind());

        match self.handlers.get(&(operation, source_kind, destination_kind)) {
            Some(Handler::InPlace(handler)) => {
                tracing::debug!(
                    %operation,
                    source = %source_kind,
                    destination = %destination_kind,
                    "in-place handler"
                );
                handler(source, destination, &self.config)
            }
            _ => Err(unsupported(operation, source_kind, destination_kind)),
        }
    }

    pub fn add(&self, left: &O, right: &O) -> Result<O> {
        self.checked(Operation::Add, left, right)
    }

    pub fn subtract(&self, left: &O, right: &O) -> Result<O> {
        self.checked(Operation::Subtract, left, right)
    }

    /// Element-wise product
    pub fn hadamard_product(&self, left: &O, right: &O) -> Result<O> {
        self.checked(Operation::HadamardProduct, left, right)
    }

    /// Overwrites `destination` with `source`, keeping the destination's kind
    pub fn copy_into(&self, source: &O, destination: &mut O) -> Result<()> {
        self.checked_in_place(Operation::CopyInto, source, destination)
    }

    pub fn add_in_place(&self, source: &O, destination: &mut O) -> Result<()> {
        self.checked_in_place(Operation::AddInPlace, source, destination)
    }

    pub fn hadamard_in_place(&self, source: &O, destination: &mut O) -> Result<()> {
        self.checked_in_place(Operation::HadamardInPlace, source, destination)
    }

    fn checked(&self, operation: Operation, left: &O, right: &O) -> Result<O> {
        let shape = check_shapes(left, right)?;
        if shape.contains(&0) {
            tracing::debug!(%operation, ?shape, "empty operands, returning blank");
            return Ok(O::blank(left.kind(), &shape));
        }
        self.apply(operation, left, right)
    }

    fn checked_in_place(&self, operation: Operation, source: &O, destination: &mut O) -> Result<()> {
        let shape = check_shapes(source, destination)?;
        if shape.contains(&0) {
            tracing::debug!(%operation, ?shape, "empty operands, nothing to do");
            return Ok(());
        }
        self.apply_in_place(operation, source, destination)
    }

    fn mirroring_allowed(&self, operation: Operation) -> bool {
        self.config.allow_mirrored && !operation.is_in_place()
    }
}

impl<O: Operand> fmt::Debug for Dispatcher<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.config)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

fn check_shapes<O: Operand>(left: &O, right: &O) -> Result<Vec<usize>> {
    let (expected, got) = (left.shape(), right.shape());
    if expected != got {
        return Err(Error::ShapeMismatch { expected, got });
    }
    Ok(expected)
}

fn unsupported<K: fmt::Display>(operation: Operation, left: K, right: K) -> Error {
    Error::UnsupportedCombination {
        operation: operation.to_string(),
        left: left.to_string(),
        right: right.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{Matrix, MatrixKind};

    #[test]
    fn test_operation_flags() {
        assert!(Operation::Add.is_commutative());
        assert!(!Operation::Subtract.is_commutative());
        assert!(Operation::CopyInto.is_in_place());
        assert_eq!(Operation::CopyInto.function(), None);
        assert_eq!(Operation::HadamardInPlace.function(), Some(JoinFunction::MUL));
    }

    #[test]
    fn test_empty_dispatcher_reports_everything_missing() {
        let dispatcher = Dispatcher::<Matrix<f64>>::new(DispatchConfig::default());
        assert_eq!(dispatcher.missing_combinations().len(), Operation::ALL.len() * 9);

        let a = Matrix::blank(MatrixKind::Dense, 1, 1);
        let b = Matrix::blank(MatrixKind::SparseRowMajor, 1, 1);
        let err = dispatcher.apply(Operation::Add, &a, &b).unwrap_err();
        assert_eq!(
            err,
            Error::UnsupportedCombination {
                operation: "add".to_string(),
                left: "dense".to_string(),
                right: "csr".to_string(),
            }
        );
    }

    #[test]
    #[should_panic(expected = "needs an in-place handler")]
    fn test_register_rejects_wrong_flavour() {
        fn noop(_: &Matrix<f64>, _: &Matrix<f64>, _: JoinFunction, _: &DispatchConfig) -> Result<Matrix<f64>> {
            Ok(Matrix::blank(MatrixKind::Dense, 0, 0))
        }
        let mut dispatcher = Dispatcher::<Matrix<f64>>::new(DispatchConfig::default());
        dispatcher.register(
            Operation::CopyInto,
            MatrixKind::Dense,
            MatrixKind::Dense,
            Handler::OutOfPlace(noop),
        );
    }

    #[test]
    fn test_mirroring_never_applies_in_place() {
        let dispatcher = Dispatcher::<Matrix<f64>>::standard(DispatchConfig::default());
        for (operation, _, _) in dispatcher.missing_combinations() {
            assert!(!operation.is_in_place());
        }
        assert!(dispatcher.missing_combinations().is_empty());
    }
}
