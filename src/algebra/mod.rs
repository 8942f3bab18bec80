//! __geigs__ linear algebra module.
//!
//! All vector and matrix arithmetic used by the eigensolver is implemented
//! here on types implementing the [`FloatT`](crate::algebra::FloatT) trait.
//!
//! Symmetric sparse matrices are held as [`CscMatrix`] data containing the
//! upper triangle only.  Small dense work (the Krylov subspace projections,
//! dense shifted factorizations) uses the column major [`Matrix`] type.

mod csc;
mod dense;
mod error_types;
mod floats;
mod math_traits;
mod matrix_traits;
mod vecmath;

pub use csc::*;
pub use dense::*;
pub use error_types::*;
pub use floats::*;
pub use math_traits::*;
pub use matrix_traits::*;
