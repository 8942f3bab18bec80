//! Sparse $LDL^T$ factorization for symmetric indefinite matrices.
//!
//! Used by the sparse shift-solve operator to factor `A - σB` once per
//! shift.  The factorization uses an AMD fill reducing ordering followed
//! by an up-looking numeric phase with no pivoting.

mod ldl;
pub use ldl::*;
