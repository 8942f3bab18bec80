//! geigs solver main module.
//!
//! This module contains the eigensolvers and the types used to configure
//! them and to inspect their results.
//!
//! The main entry point is [`SymGEigsShiftSolver`], which solves the
//! symmetric generalized eigenproblem `A·x = λ·B·x` for the eigenvalues
//! closest to a shift `σ`.  For sparse problems held in memory,
//! [`SparseGEigsProblem`] wraps the construction of the operators and
//! the solver in a single call.
//!
//! Both are built on the restarted Lanczos engine [`SymEigsBase`], which
//! can also be used directly for the standard problem through
//! [`SymEigsSolver`], or with a custom [`RitzValueTransform`].

// internal module structure
pub(crate) mod core;
pub mod implementations;

//Here we expose only part of the solver internals
//and rearrange public modules a bit to give a more
//user friendly API

//settings, status and errors
pub use crate::solver::core::{
    ConfigError, EigsError, EigsInfo, EigsSettings, EigsSettingsBuilder,
    EigsSettingsBuilderError, EigsStatus, SettingsError, SortRule,
};

//the Lanczos engine and its Ritz value hooks
pub use crate::solver::core::{
    NoTransform, RitzValueTransform, ShiftInvertTransform, SymEigsBase, SymEigsSolver,
};

//user facing traits
pub use crate::solver::core::traits;
pub use crate::solver::core::traits::{GEigsMode, GeneralizedEigensolver};

pub use crate::solver::implementations::shift_invert;
pub use crate::solver::implementations::shift_invert::*;

#[cfg(feature = "serde")]
pub use crate::solver::core::traits::ProblemJSONReadWrite;
