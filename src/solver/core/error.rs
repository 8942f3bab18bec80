use super::SettingsError;
use crate::algebra::DenseFactorizationError;
use crate::operators::OperatorError;
use thiserror::Error;

/// Error type returned on solver construction when the problem
/// dimensions are inconsistent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Operator has dimension {op} but the B product has dimension {mult}")]
    /// The two operators do not act on the same space
    DimensionMismatch { op: usize, mult: usize },
    #[error("nev must satisfy 1 <= nev <= n - 1 (nev = {nev}, n = {n})")]
    /// Requested number of eigenvalues is out of range
    BadNev { nev: usize, n: usize },
    #[error("ncv must satisfy nev < ncv <= n (nev = {nev}, ncv = {ncv}, n = {n})")]
    /// Krylov subspace dimension is out of range
    BadNcv { nev: usize, ncv: usize, n: usize },
    #[error("Initial vector has length {found}, expected {expected}")]
    /// A user supplied initial vector has the wrong length
    InitialVectorLength { expected: usize, found: usize },
}

/// Error type returned by the eigensolvers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EigsError {
    #[error("Bad configuration: {0}")]
    Configuration(#[from] ConfigError),
    #[error("Bad settings: {0}")]
    Settings(#[from] SettingsError),
    #[error("{0}")]
    Operator(#[from] OperatorError),
    #[error("Solver must be initialized before compute")]
    NotInitialized,
    #[error("Solver has already computed its eigenpairs")]
    AlreadyComputed,
    #[error("Initial vector has zero B-norm")]
    BadInitialVector,
    #[error("Failed to expand the Krylov basis past an invariant subspace")]
    BasisExpansion,
    #[error("Eigendecomposition of the Lanczos matrix failed: {0}")]
    TridiagonalEigen(#[from] DenseFactorizationError),
}
