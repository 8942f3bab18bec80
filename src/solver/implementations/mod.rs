//! Generalized eigensolvers built on the core Lanczos engine.

pub mod shift_invert;
