#![allow(non_snake_case)]

use geigs::{algebra::*, operators::*, solver::*};

fn diagonal(n: usize) -> CscMatrix<f64> {
    CscMatrix::from_diagonal(&(1..=n).map(|i| i as f64).collect::<Vec<_>>())
}

fn construct(n: usize, nmult: usize, nev: usize, ncv: usize) -> Option<EigsError> {
    let A = diagonal(n);
    let B = CscMatrix::<f64>::identity(n);
    let M = CscMatrix::<f64>::identity(nmult);

    let mut solve = SymShiftInvert::new(&A, &B, ShiftFactorizationMethod::Auto).unwrap();
    let mult = SparseSymMatProd::new(&M).unwrap();
    SymGEigsShiftSolver::new(&mut solve, &mult, nev, ncv, 0.5, EigsSettings::default()).err()
}

#[test]
fn api_dim_check_working() {
    assert_eq!(construct(6, 6, 2, 4), None);
    assert_eq!(construct(6, 6, 5, 6), None);
    assert_eq!(construct(6, 6, 1, 2), None);
}

#[test]
fn api_dim_check_bad_mult() {
    assert_eq!(
        construct(6, 5, 2, 4),
        Some(EigsError::Configuration(ConfigError::DimensionMismatch {
            op: 6,
            mult: 5
        }))
    );
}

#[test]
fn api_dim_check_bad_nev() {
    assert_eq!(
        construct(6, 6, 0, 4),
        Some(EigsError::Configuration(ConfigError::BadNev { nev: 0, n: 6 }))
    );
    assert_eq!(
        construct(6, 6, 6, 6),
        Some(EigsError::Configuration(ConfigError::BadNev { nev: 6, n: 6 }))
    );
}

#[test]
fn api_dim_check_bad_ncv() {
    assert_eq!(
        construct(6, 6, 3, 3),
        Some(EigsError::Configuration(ConfigError::BadNcv {
            nev: 3,
            ncv: 3,
            n: 6
        }))
    );
    assert_eq!(
        construct(6, 6, 3, 7),
        Some(EigsError::Configuration(ConfigError::BadNcv {
            nev: 3,
            ncv: 7,
            n: 6
        }))
    );
}

#[test]
fn api_dim_check_start_vector() {
    let A = diagonal(6);
    let B = CscMatrix::<f64>::identity(6);
    let mut solve = SymShiftInvert::new(&A, &B, ShiftFactorizationMethod::Auto).unwrap();
    let mult = SparseSymMatProd::new(&B).unwrap();
    let mut solver =
        SymGEigsShiftSolver::new(&mut solve, &mult, 2, 4, 0.5, EigsSettings::default()).unwrap();

    assert_eq!(
        solver.init_with(&[1.; 5]),
        Err(EigsError::Configuration(ConfigError::InitialVectorLength {
            expected: 6,
            found: 5
        }))
    );
    assert_eq!(solver.state(), SolverState::Constructed);

    assert_eq!(solver.init_with(&[0.; 6]), Err(EigsError::BadInitialVector));
    assert_eq!(solver.state(), SolverState::Constructed);

    // recovers with a usable vector
    solver.init_with(&[1.; 6]).unwrap();
    assert_eq!(solver.state(), SolverState::Initialized);
}

#[test]
fn api_bad_settings() {
    let A = diagonal(4);
    let B = CscMatrix::<f64>::identity(4);
    let mut solve = SymShiftInvert::new(&A, &B, ShiftFactorizationMethod::Auto).unwrap();
    let mult = SparseSymMatProd::new(&B).unwrap();

    let mut settings = EigsSettings::default();
    settings.tol = -1.;
    assert_eq!(
        SymGEigsShiftSolver::new(&mut solve, &mult, 1, 3, 0.5, settings).err(),
        Some(EigsError::Settings(SettingsError::BadFieldValue("tol")))
    );

    // the builder validates too
    assert!(EigsSettingsBuilder::<f64>::default()
        .max_iter(0)
        .build()
        .is_err());
}
