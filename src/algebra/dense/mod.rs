mod core;
mod lu;
mod tridiag;
pub use self::core::*;
pub use self::lu::*;
pub use self::tridiag::*;
