use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Error type returned by sparse matrix assembly operations.
pub enum SparseFormatError {
    /// Matrix dimension fields and/or array lengths are incompatible
    #[error("Matrix dimension fields and/or array lengths are incompatible")]
    IncompatibleDimension,
    /// Data is not sorted by row index within each column
    #[error("Data is not sorted by row index within each column")]
    BadRowOrdering,
    #[error("Row value exceeds the matrix row dimension")]
    /// Row value exceeds the matrix row dimension
    BadRowval,
    #[error("Bad column pointer values")]
    /// Matrix column pointer values are defective
    BadColptr,
    #[error("Matrix has entries below the diagonal")]
    /// Matrix was expected to hold the upper triangle only
    NotUpperTriangular,
}

/// Error type returned by dense factorization and eigendecomposition routines.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DenseFactorizationError {
    #[error("Matrix dimension fields and/or array lengths are incompatible")]
    /// Inputs have incompatible dimensions
    IncompatibleDimension,
    #[error("LU factorization encountered a singular pivot in column {0}")]
    /// Numerically zero pivot at the given column
    Singular(usize),
    #[error("Tridiagonal eigendecomposition failed to converge after {0} sweeps")]
    /// Implicit QR did not deflate within the sweep limit
    Eigen(usize),
}
