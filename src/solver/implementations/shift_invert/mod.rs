//! Symmetric generalized eigensolver in shift-and-invert mode.

mod problem;
mod solver;

pub use problem::*;
pub use solver::*;

cfg_if::cfg_if! {
    if #[cfg(feature = "serde")] {
        mod json;
    }
}
