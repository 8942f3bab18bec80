use super::*;
use crate::algebra::{CscMatrix, FloatT};

fn test_matrix_4x4() -> CscMatrix<f64> {
    // A =
    //[ 8.0  -3.0   2.0    ⋅ ]
    //[  ⋅    8.0  -1.0    ⋅ ]
    //[  ⋅     ⋅    8.0  -1.0]
    //[  ⋅     ⋅     ⋅    1.0]
    let Ap = vec![0, 1, 3, 6, 8];
    let Ai = vec![0, 0, 1, 0, 1, 2, 2, 3];
    let Ax = vec![8., -3., 8., 2., -1., 8., -1., 1.];
    CscMatrix::new(4, 4, Ap, Ai, Ax)
}

// upper triangle of A - sigma*I for the 1D laplacian
fn shifted_laplacian(n: usize, sigma: f64) -> CscMatrix<f64> {
    CscMatrix::tridiagonal_triu(&vec![2.0 - sigma; n], &vec![-1.0; n - 1])
}

fn inf_norm_diff<T: FloatT>(a: &[T], b: &[T]) -> T {
    zip(a, b).fold(T::zero(), |acc, (x, y)| T::max(acc, T::abs(*x - *y)))
}

#[test]
fn test_invperm() {
    let perm = vec![3, 0, 2, 1];
    assert_eq!(invperm(&perm).unwrap(), vec![1, 3, 2, 0]);

    // repeated index
    assert_eq!(invperm(&[3, 0, 2, 0]), Err(LdlError::InvalidPermutation));
    // index too big
    assert_eq!(invperm(&[4, 0, 2, 1]), Err(LdlError::InvalidPermutation));
}

#[test]
fn test_permute_symmetric() {
    let A = test_matrix_4x4();
    let perm = vec![3, 2, 1, 0];
    let iperm = invperm(&perm).unwrap();
    let P = permute_symmetric(&A, &iperm);

    assert!(P.is_triu());
    assert_eq!(P.nnz(), A.nnz());

    // reversal maps (0,2) -> (1,3) and (3,3) -> (0,0)
    let find = |r: usize, c: usize| {
        (P.colptr[c]..P.colptr[c + 1])
            .find(|&p| P.rowval[p] == r)
            .map(|p| P.nzval[p])
    };
    assert_eq!(find(1, 3), Some(2.));
    assert_eq!(find(0, 0), Some(1.));
    assert_eq!(find(0, 1), Some(-1.));
}

#[test]
fn test_ldl_solve_4x4() {
    let A = test_matrix_4x4();
    let mut ldl = LdlFactorization::new(&A, None).unwrap();

    let xtrue = vec![1., -2., 3., 0.5];
    let mut b = vec![0.; 4];
    A.symv(&mut b, &xtrue, 1., 0.);

    ldl.solve(&mut b);
    assert!(inf_norm_diff(&b, &xtrue) < 1e-12);
    assert_eq!(ldl.inertia(), (4, 0));
}

#[test]
fn test_ldl_user_permutation() {
    let A = test_matrix_4x4();
    let opts = LdlSettingsBuilder::default()
        .perm(vec![2, 0, 3, 1])
        .build()
        .unwrap();
    let mut ldl = LdlFactorization::new(&A, Some(opts)).unwrap();
    assert_eq!(ldl.perm(), &[2, 0, 3, 1]);
    assert_eq!(ldl.iperm(), &[1, 3, 0, 2]);

    let mut b = vec![1., 1., 1., 1.];
    let b0 = b.clone();
    ldl.solve(&mut b);

    let mut r = vec![0.; 4];
    A.symv(&mut r, &b, 1., 0.);
    assert!(inf_norm_diff(&r, &b0) < 1e-12);
}

#[test]
fn test_ldl_indefinite_inertia() {
    // shift sits between the 3rd and 4th eigenvalues
    // of the laplacian, so 3 negative pivots are expected
    let n = 10;
    let eig = |k: usize| 2.0 - 2.0 * f64::cos(k as f64 * std::f64::consts::PI / (n as f64 + 1.0));
    let sigma = 0.5 * (eig(3) + eig(4));

    let A = shifted_laplacian(n, sigma);
    let mut ldl = LdlFactorization::new(&A, None).unwrap();
    assert_eq!(ldl.inertia(), (n - 3, 3));

    let xtrue: Vec<f64> = (0..n).map(|i| (i as f64).sin()).collect();
    let mut b = vec![0.; n];
    A.symv(&mut b, &xtrue, 1., 0.);
    ldl.solve(&mut b);
    assert!(inf_norm_diff(&b, &xtrue) < 1e-9);
}

#[test]
fn test_ldl_zero_pivot() {
    // diag(1,2,3) - 2I is exactly singular
    let A = CscMatrix::from_diagonal(&[-1., 0., 1.]);
    let opts = LdlSettingsBuilder::default()
        .perm(vec![0, 1, 2])
        .build()
        .unwrap();
    assert_eq!(
        LdlFactorization::new(&A, Some(opts)).err(),
        Some(LdlError::ZeroPivot(1))
    );
}

#[test]
fn test_ldl_bad_structure() {
    let A = CscMatrix::new(2, 2, vec![0, 2, 3], vec![0, 1, 1], vec![1., 2., 3.]);
    assert_eq!(
        LdlFactorization::new(&A, None).err(),
        Some(LdlError::NotUpperTriangular)
    );

    let A = CscMatrix::<f64>::spalloc(2, 3, 0);
    assert_eq!(
        LdlFactorization::new(&A, None).err(),
        Some(LdlError::IncompatibleDimension)
    );
}
