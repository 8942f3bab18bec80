//! Matrix operators consumed by the eigensolvers.
//!
//! The solvers never see matrices directly.  They interact only with
//! objects implementing the operator traits defined here:
//!
//! * [`MatProd`] : the product `y = B*x` with a symmetric matrix,
//! * [`ShiftSolve`] : the solve `y = (A - σB)⁻¹x` for a shift `σ` fixed
//!   once by [`set_shift`](ShiftSolve::set_shift),
//! * [`LinearOperator`] : the operator `OP` the Krylov iteration is run on.
//!
//! Dense and sparse implementations of the first two are provided, along
//! with the composite shift-and-invert operator
//! [`ShiftInvertOp`] `= (A - σB)⁻¹B`.

use crate::algebra::{FloatT, SparseFormatError};
use thiserror::Error;

mod dense;
mod identity;
mod shift_invert;
mod shift_solve;
mod sparse;

pub use dense::*;
pub use identity::*;
pub use shift_invert::*;
pub use shift_solve::*;
pub use sparse::*;

/// Error type returned by operator construction and application.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OperatorError {
    #[error("Operator dimension mismatch: expected {expected}, found {found}")]
    /// Operand length or operator dimensions do not agree
    IncompatibleDimension { expected: usize, found: usize },
    #[error("Shift-solve operator applied before a shift was set")]
    /// [`ShiftSolve::apply`] was called before [`ShiftSolve::set_shift`]
    ShiftNotSet,
    #[error("Shifted matrix is singular (zero pivot at column {column})")]
    /// The shift coincides (numerically) with an eigenvalue
    SingularShift { column: usize },
    #[error("Sparse LDL factorization without pivoting broke down at column {column}")]
    /// A zero pivot in the unpivoted sparse factorization, which need not
    /// mean that the shifted matrix is singular
    PivotBreakdown { column: usize },
    #[error("Sparse LDL factorization requires sparse matrix inputs")]
    /// A sparse factorization was requested for dense data
    SparseInputRequired,
    #[error("Bad matrix format: {0}")]
    /// Sparse input data is malformed or not upper triangular
    Format(#[from] SparseFormatError),
    #[error("Factorization failed: {0}")]
    /// Any other failure of the underlying factorization
    Factorization(String),
    #[error("Operator failure: {0}")]
    /// Failure reported by a user supplied operator
    Failure(String),
}

/// Product `y = B*x` with a symmetric matrix `B`.
pub trait MatProd<T: FloatT> {
    /// dimension `n` of the (square) operator
    fn dim(&self) -> usize;

    /// Computes `y = B*x`.  Both slices have length `dim()`.
    fn apply(&self, x: &[T], y: &mut [T]) -> Result<(), OperatorError>;
}

impl<T: FloatT, M: MatProd<T> + ?Sized> MatProd<T> for &M {
    fn dim(&self) -> usize {
        (**self).dim()
    }
    fn apply(&self, x: &[T], y: &mut [T]) -> Result<(), OperatorError> {
        (**self).apply(x, y)
    }
}

/// Solve `y = (A - σB)⁻¹x` for a shift `σ` fixed by `set_shift`.
///
/// Implementations typically factor `A - σB` once in `set_shift` and
/// reuse the factors in every `apply`.  Calling `apply` before `set_shift`
/// must fail with [`OperatorError::ShiftNotSet`].
pub trait ShiftSolve<T: FloatT> {
    /// dimension `n` of the (square) operator
    fn dim(&self) -> usize;

    /// Fixes the shift `σ`.  Fails if `A - σB` can not be factored.
    fn set_shift(&mut self, sigma: T) -> Result<(), OperatorError>;

    /// Computes `y = (A - σB)⁻¹x`
    fn apply(&mut self, x: &[T], y: &mut [T]) -> Result<(), OperatorError>;
}

/// The operator `OP` a Krylov eigensolver iterates on.
pub trait LinearOperator<T: FloatT> {
    fn dim(&self) -> usize;

    /// Computes `y = OP*x`
    fn apply(&mut self, x: &[T], y: &mut [T]) -> Result<(), OperatorError>;
}

#[inline]
pub(crate) fn check_operand_dims<T>(n: usize, x: &[T], y: &[T]) -> Result<(), OperatorError> {
    for len in [x.len(), y.len()] {
        if len != n {
            return Err(OperatorError::IncompatibleDimension {
                expected: n,
                found: len,
            });
        }
    }
    Ok(())
}
