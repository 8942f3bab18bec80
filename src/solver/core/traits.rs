//! Traits shared by the generalized eigensolvers.

use super::{EigsError, EigsInfo, EigsStatus, SortRule};
use crate::algebra::*;

/// Spectral transformation used by a generalized eigensolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum GEigsMode {
    /// iterate on `(A - σB)⁻¹B`
    ShiftInvert,
}

impl std::fmt::Display for GEigsMode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Common interface of solvers for the symmetric generalized
/// eigenproblem `A·x = λ·B·x`.
pub trait GeneralizedEigensolver<T: FloatT> {
    /// The spectral transformation this solver iterates with
    fn mode(&self) -> GEigsMode;

    /// Initialize with a deterministic pseudo-random start vector
    fn init(&mut self) -> Result<(), EigsError>;

    /// Initialize with a user supplied start vector
    fn init_with(&mut self, v0: &[T]) -> Result<(), EigsError>;

    /// Compute eigenpairs ranked by `rule`, returning the number
    /// that converged
    fn compute(&mut self, rule: SortRule<T>) -> Result<usize, EigsError>;

    /// Converged eigenvalues, in the final sorted order
    fn eigenvalues(&self) -> Vec<T>;

    /// Converged eigenvectors, one per column, B-orthonormal
    fn eigenvectors(&self) -> Matrix<T>;

    fn status(&self) -> EigsStatus;

    fn info(&self) -> &EigsInfo<T>;
}

/// Reading and writing of problem data in JSON format
#[cfg(feature = "serde")]
pub trait ProblemJSONReadWrite: Sized {
    fn write_to_file(&self, file: &mut std::fs::File) -> Result<(), std::io::Error>;
    fn read_from_file(file: &mut std::fs::File) -> Result<Self, std::io::Error>;
}
