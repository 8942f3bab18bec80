#![allow(non_snake_case)]

use crate::algebra::{DenseFactorizationError, FloatT, Matrix};

/// Eigendecomposition of a real symmetric tridiagonal matrix.
///
/// Eigenvalues are returned in ascending order, with eigenvectors as the
/// corresponding columns of `vectors`.
#[derive(Debug, Clone)]
pub struct SymTridiagEigen<T> {
    pub values: Vec<T>,
    pub vectors: Matrix<T>,
}

// sweeps allowed per eigenvalue before giving up
const MAX_SWEEPS_PER_VALUE: usize = 30;

impl<T> SymTridiagEigen<T>
where
    T: FloatT,
{
    /// Decompose the matrix with diagonal `diag` and sub/super diagonal `offdiag`.
    pub fn new(diag: &[T], offdiag: &[T]) -> Result<Self, DenseFactorizationError> {
        let n = diag.len();
        if n > 0 && offdiag.len() + 1 != n {
            return Err(DenseFactorizationError::IncompatibleDimension);
        }

        let mut d = diag.to_vec();
        let mut e = offdiag.to_vec();
        let mut q = Matrix::identity(n);

        implicit_qr(&mut d, &mut e, &mut q, MAX_SWEEPS_PER_VALUE * n.max(1))?;

        // ascending order, columns permuted to match
        let mut perm: Vec<usize> = (0..n).collect();
        perm.sort_by(|&i, &j| d[i].partial_cmp(&d[j]).unwrap_or(std::cmp::Ordering::Equal));

        let values = perm.iter().map(|&i| d[i]).collect();
        let vectors = q.select_columns(&perm);

        Ok(Self { values, vectors })
    }

    /// Build from the diagonal and first subdiagonal of a dense
    /// (symmetric tridiagonal) matrix.
    pub fn from_matrix(H: &Matrix<T>) -> Result<Self, DenseFactorizationError> {
        if H.m != H.n {
            return Err(DenseFactorizationError::IncompatibleDimension);
        }
        let n = H.n;
        let diag: Vec<T> = (0..n).map(|i| H[(i, i)]).collect();
        let offdiag: Vec<T> = (1..n).map(|i| H[(i, i - 1)]).collect();
        Self::new(&diag, &offdiag)
    }
}

/// Computes `(c, s)` such that `[c s; -s c] * [a; b] = [r; 0]`.
#[inline]
pub(crate) fn givens<T: FloatT>(a: T, b: T) -> (T, T) {
    if b == T::zero() {
        (T::one(), T::zero())
    } else if b.abs() > a.abs() {
        let t = a / b;
        let s = T::one() / (T::one() + t * t).sqrt();
        (s * t, s)
    } else {
        let t = b / a;
        let c = T::one() / (T::one() + t * t).sqrt();
        (c, c * t)
    }
}

// Wilkinson-shifted implicit QR on the unreduced trailing block,
// with rotations accumulated into the columns of q.
fn implicit_qr<T: FloatT>(
    d: &mut [T],
    e: &mut [T],
    q: &mut Matrix<T>,
    max_sweeps: usize,
) -> Result<(), DenseFactorizationError> {
    let n = d.len();
    if n <= 1 {
        return Ok(());
    }

    let eps = T::epsilon();
    let two = T::one() + T::one();
    let mut sweeps = 0;
    let mut hi = n - 1;

    while hi > 0 {
        // find the top of the unreduced block ending at hi
        let mut lo = hi;
        while lo > 0 {
            let thresh = eps * (d[lo - 1].abs() + d[lo].abs());
            if e[lo - 1].abs() <= thresh || e[lo - 1].abs() < T::min_positive_value() {
                e[lo - 1] = T::zero();
                break;
            }
            lo -= 1;
        }

        if lo == hi {
            hi -= 1;
            continue;
        }

        sweeps += 1;
        if sweeps > max_sweeps {
            return Err(DenseFactorizationError::Eigen(sweeps - 1));
        }

        let dd = (d[hi - 1] - d[hi]) / two;
        let ee = e[hi - 1];
        let r = dd.hypot(ee);
        let shift = d[hi] - ee * ee / (dd + if dd >= T::zero() { r } else { -r });

        let mut x = d[lo] - shift;
        let mut z = e[lo];

        for k in lo..hi {
            let (c, s) = givens(x, z);
            if k > lo {
                e[k - 1] = c * x + s * z;
            }

            let (dk, dk1, ek) = (d[k], d[k + 1], e[k]);
            d[k] = c * c * dk + two * c * s * ek + s * s * dk1;
            d[k + 1] = s * s * dk - two * c * s * ek + c * c * dk1;
            e[k] = c * s * (dk1 - dk) + (c * c - s * s) * ek;

            // chase the bulge one row down
            if k + 1 < hi {
                let enext = e[k + 1];
                x = e[k];
                z = s * enext;
                e[k + 1] = c * enext;
            }

            rotate_columns(q, k, c, s);
        }
    }
    Ok(())
}

// q <- q * G' for the rotation G acting on coordinates (k, k+1)
#[inline]
fn rotate_columns<T: FloatT>(q: &mut Matrix<T>, k: usize, c: T, s: T) {
    for i in 0..q.m {
        let (qk, qk1) = (q[(i, k)], q[(i, k + 1)]);
        q[(i, k)] = c * qk + s * qk1;
        q[(i, k + 1)] = c * qk1 - s * qk;
    }
}

/// One explicitly shifted QR step on a symmetric tridiagonal matrix.
///
/// Factors `H - mu*I = Q*R` with Givens rotations, overwrites `(diag, offdiag)`
/// with `R*Q + mu*I = Q'*H*Q` and accumulates `Qacc <- Qacc * Q`.
pub fn tridiag_shifted_qr_step<T: FloatT>(
    diag: &mut [T],
    offdiag: &mut [T],
    mu: T,
    Qacc: &mut Matrix<T>,
) {
    let n = diag.len();
    if n < 2 {
        return;
    }
    assert_eq!(offdiag.len() + 1, n);
    assert_eq!(Qacc.n, n);

    // R has at most two superdiagonals; keep it dense since n is
    // the (small) Krylov subspace dimension
    let mut R = Matrix::zeros((n, n));
    for i in 0..n {
        R[(i, i)] = diag[i] - mu;
        if i + 1 < n {
            R[(i + 1, i)] = offdiag[i];
            R[(i, i + 1)] = offdiag[i];
        }
    }

    let mut rots = Vec::with_capacity(n - 1);
    for k in 0..(n - 1) {
        let (c, s) = givens(R[(k, k)], R[(k + 1, k)]);
        for j in k..usize::min(k + 3, n) {
            let (rk, rk1) = (R[(k, j)], R[(k + 1, j)]);
            R[(k, j)] = c * rk + s * rk1;
            R[(k + 1, j)] = c * rk1 - s * rk;
        }
        R[(k + 1, k)] = T::zero();
        rots.push((c, s));
    }

    // R*Q, where Q = G_0' * G_1' * ...
    for (k, &(c, s)) in rots.iter().enumerate() {
        rotate_columns(&mut R, k, c, s);
        rotate_columns(Qacc, k, c, s);
    }

    // result is symmetric tridiagonal up to rounding
    for i in 0..n {
        diag[i] = R[(i, i)] + mu;
        if i + 1 < n {
            offdiag[i] = R[(i + 1, i)];
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::algebra::VectorMath;

    fn laplacian_eigs(n: usize) -> Vec<f64> {
        // 2 - 2cos(k pi / (n+1)), ascending
        (1..=n)
            .map(|k| 2.0 - 2.0 * f64::cos(k as f64 * std::f64::consts::PI / (n as f64 + 1.0)))
            .collect()
    }

    #[test]
    fn test_tridiag_eigen_laplacian() {
        let n = 8;
        let eig = SymTridiagEigen::new(&vec![2.0; n], &vec![-1.0; n - 1]).unwrap();
        assert!(eig.values.norm_inf_diff(&laplacian_eigs(n)) < 1e-12);

        // check T*v = lambda*v for every pair
        for (j, &lam) in eig.values.iter().enumerate() {
            let v = eig.vectors.col_slice(j);
            for i in 0..n {
                let mut tv = 2.0 * v[i];
                if i > 0 {
                    tv -= v[i - 1];
                }
                if i + 1 < n {
                    tv -= v[i + 1];
                }
                assert!((tv - lam * v[i]).abs() < 1e-12);
            }
            assert!((v.norm() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_tridiag_eigen_diagonal_and_trivial() {
        let eig = SymTridiagEigen::new(&[3.0, -1.0, 2.0], &[0.0, 0.0]).unwrap();
        assert_eq!(eig.values, vec![-1.0, 2.0, 3.0]);
        assert_eq!(eig.vectors.col_slice(0), &[0.0, 1.0, 0.0]);

        let eig = SymTridiagEigen::new(&[5.0], &[]).unwrap();
        assert_eq!(eig.values, vec![5.0]);

        assert!(SymTridiagEigen::new(&[1.0, 2.0], &[]).is_err());
    }

    #[test]
    fn test_shifted_qr_step_similarity() {
        let n = 6;
        let mut d = vec![2.0; n];
        let mut e = vec![-1.0; n - 1];
        let mut Q = Matrix::identity(n);

        // exact shift at an eigenvalue deflates the last subdiagonal
        let mu = laplacian_eigs(n)[2];
        tridiag_shifted_qr_step(&mut d, &mut e, mu, &mut Q);
        assert!(e[n - 2].abs() < 1e-10);

        // spectrum is preserved
        let eig = SymTridiagEigen::new(&d, &e).unwrap();
        assert!(eig.values.norm_inf_diff(&laplacian_eigs(n)) < 1e-12);

        // Q stays orthogonal
        for i in 0..n {
            for j in 0..n {
                let qij = Q.col_slice(i).dot(Q.col_slice(j));
                let target = if i == j { 1.0 } else { 0.0 };
                assert!((qij - target).abs() < 1e-12);
            }
        }
    }
}
