#![allow(non_snake_case)]

use geigs::{algebra::*, operators::*, solver::*};
use std::f64::consts::PI;

fn pencil(n: usize) -> (CscMatrix<f64>, CscMatrix<f64>) {
    // tridiagonal A, diagonally dominant banded B
    let A = CscMatrix::tridiagonal_triu(
        &(0..n).map(|i| 1. + i as f64).collect::<Vec<_>>(),
        &vec![0.3; n - 1],
    );
    let B = CscMatrix::tridiagonal_triu(&vec![2.; n], &vec![0.5; n - 1]);
    (A, B)
}

fn solve_with<S, M>(solve: &mut S, mult: &M, sigma: f64) -> Vec<f64>
where
    S: ShiftSolve<f64>,
    M: MatProd<f64>,
{
    let mut solver =
        SymGEigsShiftSolver::new(solve, mult, 3, 8, sigma, EigsSettings::default()).unwrap();
    solver.init().unwrap();
    assert_eq!(solver.compute(SortRule::ClosestTo(sigma)).unwrap(), 3);
    solver.eigenvalues()
}

#[test]
fn test_dense_and_sparse_agree() {
    let n = 16;
    let sigma = 3.3;
    let (A, B) = pencil(n);
    let Ad = Matrix::from_csc_sym(&A).unwrap();
    let Bd = Matrix::from_csc_sym(&B).unwrap();

    let mut sparse_solve = SymShiftInvert::new(&A, &B, ShiftFactorizationMethod::Auto).unwrap();
    let sparse_mult = SparseSymMatProd::new(&B).unwrap();
    let sparse = solve_with(&mut sparse_solve, &sparse_mult, sigma);

    let mut dense_solve = SymShiftInvert::new(&Ad, &Bd, ShiftFactorizationMethod::Auto).unwrap();
    assert_eq!(dense_solve.method(), ShiftFactorizationMethod::DenseLU);
    let dense_mult = DenseSymMatProd::new(&Bd).unwrap();
    let dense = solve_with(&mut dense_solve, &dense_mult, sigma);

    assert!(sparse.norm_inf_diff(&dense) < 1e-8);
}

#[test]
fn test_ldl_and_lu_agree() {
    let n = 25;
    let sigma = 7.1;
    let (A, B) = pencil(n);
    let mult = SparseSymMatProd::new(&B).unwrap();

    let mut ldl = SymShiftInvert::new(&A, &B, ShiftFactorizationMethod::SparseLDL).unwrap();
    let mut lu = SymShiftInvert::new(&A, &B, ShiftFactorizationMethod::DenseLU).unwrap();

    let by_ldl = solve_with(&mut ldl, &mult, sigma);
    let by_lu = solve_with(&mut lu, &mult, sigma);
    assert!(by_ldl.norm_inf_diff(&by_lu) < 1e-8);

    // inertia is only known to the sparse factorization
    assert!(ldl.num_eigenvalues_below_shift().is_some());
    assert_eq!(lu.num_eigenvalues_below_shift(), None);
}

#[test]
fn test_ldl_requires_sparse() {
    let (A, B) = pencil(4);
    let Ad = Matrix::from_csc_sym(&A).unwrap();
    assert_eq!(
        SymShiftInvert::new(&Ad, &B, ShiftFactorizationMethod::SparseLDL).err(),
        Some(OperatorError::SparseInputRequired)
    );
    assert_eq!(
        "ldl".parse::<ShiftFactorizationMethod>(),
        Ok(ShiftFactorizationMethod::SparseLDL)
    );
    assert!("qr".parse::<ShiftFactorizationMethod>().is_err());
}

#[test]
fn test_problem_solve_methods() {
    let (A, B) = pencil(20);
    let sigma = 4.4;

    let solve = |method: &str| {
        let settings = EigsSettingsBuilder::default()
            .shift_solve_method(method.to_string())
            .build()
            .unwrap();
        SparseGEigsProblem::new(A.clone(), B.clone(), sigma, 3, settings)
            .unwrap()
            .solve()
            .unwrap()
    };

    let auto = solve("auto");
    let lu = solve("lu");
    assert_eq!(auto.status, EigsStatus::Converged);
    assert_eq!(lu.status, EigsStatus::Converged);
    assert!(auto.eigenvalues.norm_inf_diff(&lu.eigenvalues) < 1e-8);
    assert!(auto.num_below_shift.is_some());
    assert_eq!(lu.num_below_shift, None);
    assert!(auto.operations > 0);
}

// dense Laplacian with B = 2I, pencil eigenvalues 1 - cos(kπ/(n+1))
fn dense_laplacian_pencil(n: usize) -> (Matrix<f64>, Matrix<f64>, Vec<f64>) {
    let A = CscMatrix::tridiagonal_triu(&vec![2.; n], &vec![-1.; n - 1]);
    let B = CscMatrix::from_diagonal(&vec![2.; n]);
    let exact = (1..=n)
        .map(|k| 1. - f64::cos(k as f64 * PI / (n as f64 + 1.)))
        .collect();
    (
        Matrix::from_csc_sym(&A).unwrap(),
        Matrix::from_csc_sym(&B).unwrap(),
        exact,
    )
}

fn dense_smallest(nev: usize, ncv: usize) {
    let n = 12;
    let (A, B, exact) = dense_laplacian_pencil(n);

    let mut solve = SymShiftInvert::new(&A, &B, ShiftFactorizationMethod::Auto).unwrap();
    assert_eq!(solve.method(), ShiftFactorizationMethod::DenseLU);
    let mult = DenseSymMatProd::new(&B).unwrap();

    let mut solver =
        SymGEigsShiftSolver::new(&mut solve, &mult, nev, ncv, 0.0, EigsSettings::default())
            .unwrap();
    solver.init().unwrap();
    assert_eq!(solver.compute(SortRule::ClosestTo(0.0)).unwrap(), nev);
    assert_eq!(solver.status(), EigsStatus::Converged);

    let values = solver.eigenvalues();
    assert_eq!(values.len(), nev);
    assert!(values.norm_inf_diff(&exact[..nev]) < 1e-8);
    assert_eq!(solver.eigenvectors().ncols(), nev);
}

#[test]
fn test_dense_single_eigenvalue() {
    dense_smallest(1, 6);
}

#[test]
fn test_dense_nev_one_below_ncv() {
    dense_smallest(9, 10);
}
