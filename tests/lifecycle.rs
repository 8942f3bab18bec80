#![allow(non_snake_case)]

use geigs::{algebra::*, operators::*, solver::*};

#[test]
fn test_compute_before_init() {
    let A = CscMatrix::from_diagonal(&[1., 2., 3., 4., 5., 6.]);
    let B = CscMatrix::<f64>::identity(6);
    let mut solve = SymShiftInvert::new(&A, &B, ShiftFactorizationMethod::Auto).unwrap();
    let mult = SparseSymMatProd::new(&B).unwrap();

    let mut solver =
        SymGEigsShiftSolver::new(&mut solve, &mult, 2, 4, 3.7, EigsSettings::default()).unwrap();

    assert_eq!(
        solver.compute(SortRule::ClosestTo(3.7)),
        Err(EigsError::NotInitialized)
    );
    assert_eq!(solver.state(), SolverState::Constructed);
    assert_eq!(solver.status(), EigsStatus::Unsolved);
    assert!(solver.eigenvalues().is_empty());
    assert_eq!(solver.eigenvectors().ncols(), 0);
}

#[test]
fn test_compute_twice() {
    let A = CscMatrix::from_diagonal(&[1., 2., 3., 4., 5., 6.]);
    let B = CscMatrix::<f64>::identity(6);
    let mut solve = SymShiftInvert::new(&A, &B, ShiftFactorizationMethod::Auto).unwrap();
    let mult = SparseSymMatProd::new(&B).unwrap();

    let mut solver =
        SymGEigsShiftSolver::new(&mut solve, &mult, 2, 4, 3.7, EigsSettings::default()).unwrap();
    solver.init().unwrap();
    solver.compute(SortRule::ClosestTo(3.7)).unwrap();
    let values = solver.eigenvalues();
    assert!(values.norm_inf_diff(&[4., 3.]) < 1e-8);

    // single use, results are kept
    assert_eq!(
        solver.compute(SortRule::ClosestTo(3.7)),
        Err(EigsError::AlreadyComputed)
    );
    assert_eq!(solver.init(), Err(EigsError::AlreadyComputed));
    assert_eq!(solver.state(), SolverState::Converged);
    assert_eq!(solver.eigenvalues(), values);
}

#[test]
fn test_shift_on_eigenvalue() {
    // A - 3I is exactly singular
    let A = CscMatrix::from_diagonal(&[1., 2., 3., 4., 5.]);
    let B = CscMatrix::<f64>::identity(5);
    let mut solve = SymShiftInvert::new(&A, &B, ShiftFactorizationMethod::Auto).unwrap();
    let mult = SparseSymMatProd::new(&B).unwrap();

    // construction succeeds, the failure is reported on first use
    let mut solver =
        SymGEigsShiftSolver::new(&mut solve, &mult, 2, 4, 3.0, EigsSettings::default()).unwrap();

    let err = solver.init().unwrap_err();
    assert!(matches!(
        err,
        EigsError::Operator(OperatorError::SingularShift { .. })
    ));
    assert_eq!(solver.state(), SolverState::Failed);
    assert_eq!(solver.status(), EigsStatus::NumericalError);

    // and again on every later call
    assert_eq!(solver.compute(SortRule::ClosestTo(3.0)), Err(err));
    assert_eq!(solver.state(), SolverState::Failed);
    assert_ne!(solver.status(), EigsStatus::Converged);
    assert!(solver.eigenvalues().is_empty());
}

#[test]
fn test_partial_convergence() {
    let n = 200;
    let A = CscMatrix::tridiagonal_triu(&vec![2.; n], &vec![-1.; n - 1]);
    let B = CscMatrix::<f64>::identity(n);
    let mut solve = SymShiftInvert::new(&A, &B, ShiftFactorizationMethod::Auto).unwrap();
    let mult = SparseSymMatProd::new(&B).unwrap();

    // interior shift in a dense part of the spectrum, one restart
    let settings = EigsSettingsBuilder::default()
        .max_iter(1)
        .tol(1e-14)
        .build()
        .unwrap();
    let mut solver = SymGEigsShiftSolver::new(&mut solve, &mult, 4, 6, 2.0, settings).unwrap();
    solver.init().unwrap();
    let nconv = solver.compute(SortRule::ClosestTo(2.0)).unwrap();

    assert!(nconv < 4);
    assert_eq!(solver.state(), SolverState::PartiallyConverged);
    assert_eq!(solver.status(), EigsStatus::MaxIterations);
    assert_eq!(solver.eigenvalues().len(), nconv);
    assert_eq!(solver.info().iterations, 1);
    drop(solver);

    // A - 2I has a zero diagonal, so the sparse LDL was replaced
    assert_eq!(solve.factorization(), Some(ShiftFactorizationMethod::DenseLU));
}

#[test]
fn test_generalized_eigensolver_trait() {
    fn run<S: GeneralizedEigensolver<f64>>(solver: &mut S, rule: SortRule<f64>) -> Vec<f64> {
        assert_eq!(solver.mode(), GEigsMode::ShiftInvert);
        solver.init().unwrap();
        solver.compute(rule).unwrap();
        assert_eq!(solver.status(), EigsStatus::Converged);
        solver.eigenvalues()
    }

    let A = CscMatrix::from_diagonal(&[1., 2., 3., 4., 5., 6., 7.]);
    let B = CscMatrix::from_diagonal(&[1., 1., 1., 1., 1., 1., 1.]);
    let mut solve = SymShiftInvert::new(&A, &B, ShiftFactorizationMethod::Auto).unwrap();
    let mult = SparseSymMatProd::new(&B).unwrap();
    let mut solver =
        SymGEigsShiftSolver::new(&mut solve, &mult, 3, 6, 0.2, EigsSettings::default()).unwrap();

    // selects the smallest ν = 1/(λ - σ), i.e. the largest λ
    let values = run(&mut solver, SortRule::SmallestAlge);
    assert!(values.norm_inf_diff(&[5., 6., 7.]) < 1e-8);
    assert_eq!(solver.info().sigma, Some(0.2));
}
