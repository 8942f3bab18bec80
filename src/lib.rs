//! __geigs__ is a Rust implementation of a shift-and-invert eigensolver
//! for the symmetric generalized eigenvalue problem
//!
//! $$
//! A x = \lambda B x
//! $$
//!
//! with $A$ symmetric and $B$ symmetric positive definite.
//!
//! Eigenvalues of the pencil $(A, B)$ closest to a shift $\sigma$ are
//! found by running a restarted Lanczos iteration, in the $B$-inner
//! product, on the operator
//!
//! $$
//! \text{OP} = (A - \sigma B)^{-1} B,
//! $$
//!
//! whose eigenvalues $\nu = 1/(\lambda - \sigma)$ are largest in magnitude
//! exactly where $\lambda$ is close to $\sigma$.  Converged values are
//! mapped back through $\lambda = 1/\nu + \sigma$ before being returned.
//!
//! ## Features
//!
//! * __Operator based__: the solver sees only a shifted linear solve and a
//! product with $B$, supplied through the traits in [`operators`].  Dense
//! LU and sparse $LDL^T$ implementations are provided.
//!
//! * __Sparse__: symmetric matrices are stored in compressed sparse column
//! format, upper triangle only.  The sparse factorization reports the
//! inertia of $A - \sigma B$, and hence the number of eigenvalues below the
//! shift.
//!
//! * __Deterministic__: the default start vector is drawn from a seeded
//! generator, so repeated solves give identical results.
//!
//! # Example
//!
//! ```
//! use geigs::algebra::*;
//! use geigs::solver::*;
//!
//! // pencil eigenvalues 0.5, 1.0, ..., 3.0
//! let A = CscMatrix::<f64>::from_diagonal(&[1., 2., 3., 4., 5., 6.]);
//! let B = CscMatrix::<f64>::from_diagonal(&[2.; 6]);
//!
//! let problem = SparseGEigsProblem::new(A, B, 1.3, 2, EigsSettings::default()).unwrap();
//! let solution = problem.solve().unwrap();
//!
//! assert_eq!(solution.status, EigsStatus::Converged);
//! assert!((solution.eigenvalues[0] - 1.5).abs() < 1e-8);
//! ```
//!
//! # License
//!
//! Licensed under Apache License, Version 2.0.

//Rust hates greek characters
#![allow(confusable_idents)]

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod algebra;
pub mod io;
pub mod ldl;
pub mod operators;
pub mod solver;
pub(crate) mod timers;
