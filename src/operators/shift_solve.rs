#![allow(non_snake_case)]

use super::*;
use crate::algebra::{
    CscMatrix, DenseFactorizationError, DenseLU, Matrix, ShapedMatrix, SparseFormatError,
    SymMatrixVectorMultiply, VectorMath,
};
use crate::ldl::{LdlError, LdlFactorization, LdlSettings};
use enum_dispatch::*;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A borrowed symmetric matrix, either dense (full storage) or sparse
/// (upper triangle).
#[derive(Debug, Clone, Copy)]
pub enum SymMatrix<'a, T> {
    Dense(&'a Matrix<T>),
    Sparse(&'a CscMatrix<T>),
}

impl<'a, T> From<&'a Matrix<T>> for SymMatrix<'a, T> {
    fn from(mat: &'a Matrix<T>) -> Self {
        SymMatrix::Dense(mat)
    }
}

impl<'a, T> From<&'a CscMatrix<T>> for SymMatrix<'a, T> {
    fn from(mat: &'a CscMatrix<T>) -> Self {
        SymMatrix::Sparse(mat)
    }
}

impl<'a, T> SymMatrix<'a, T>
where
    T: FloatT,
{
    pub fn dim(&self) -> usize {
        match self {
            SymMatrix::Dense(M) => M.nrows(),
            SymMatrix::Sparse(M) => M.nrows(),
        }
    }

    pub fn is_sparse(&self) -> bool {
        matches!(self, SymMatrix::Sparse(_))
    }

    fn check(&self) -> Result<(), OperatorError> {
        match self {
            SymMatrix::Dense(M) if !M.is_square() => Err(OperatorError::IncompatibleDimension {
                expected: M.nrows(),
                found: M.ncols(),
            }),
            SymMatrix::Dense(_) => Ok(()),
            SymMatrix::Sparse(M) => Ok(M.check_symmetric_triu()?),
        }
    }

    fn to_dense(self) -> Result<Matrix<T>, SparseFormatError> {
        match self {
            SymMatrix::Dense(M) => Ok(M.clone()),
            SymMatrix::Sparse(M) => Matrix::from_csc_sym(M),
        }
    }
}

/// Factorization used by [`SymShiftInvert`] for `A - σB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ShiftFactorizationMethod {
    /// sparse LDL when both matrices are sparse, dense LU otherwise.
    /// Falls back to dense LU if the sparse factorization breaks down.
    #[default]
    Auto,
    /// dense LU with partial pivoting
    DenseLU,
    /// sparse LDL with AMD ordering
    SparseLDL,
}

impl FromStr for ShiftFactorizationMethod {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(ShiftFactorizationMethod::Auto),
            "lu" => Ok(ShiftFactorizationMethod::DenseLU),
            "ldl" => Ok(ShiftFactorizationMethod::SparseLDL),
            _ => Err(format!("unknown shift factorization method \"{}\"", s)),
        }
    }
}

#[enum_dispatch]
pub(crate) trait ShiftFactorization<T>
where
    T: FloatT,
{
    fn solve_into(&mut self, b: &[T], x: &mut [T]);
    fn inertia(&self) -> Option<(usize, usize)>;
}

impl<T: FloatT> ShiftFactorization<T> for DenseLU<T> {
    fn solve_into(&mut self, b: &[T], x: &mut [T]) {
        DenseLU::solve(self, b, x);
    }
    fn inertia(&self) -> Option<(usize, usize)> {
        None
    }
}

impl<T: FloatT> ShiftFactorization<T> for LdlFactorization<T> {
    fn solve_into(&mut self, b: &[T], x: &mut [T]) {
        x.copy_from(b);
        LdlFactorization::solve(self, x);
    }
    fn inertia(&self) -> Option<(usize, usize)> {
        Some(LdlFactorization::inertia(self))
    }
}

#[enum_dispatch(ShiftFactorization<T>)]
#[derive(Debug)]
enum ShiftFactors<T>
where
    T: FloatT,
{
    DenseLU(DenseLU<T>),
    SparseLDL(LdlFactorization<T>),
}

/// Shift-solve operator `y = (A - σB)⁻¹x` for symmetric `A` and `B`.
///
/// Holds `A` and `B` by reference.  Each call to
/// [`set_shift`](ShiftSolve::set_shift) assembles and factors `A - σB`,
/// after which [`apply`](ShiftSolve::apply) is a pair of triangular solves.
///
/// __Example usage__ :
///
/// ```no_run
/// use geigs::algebra::CscMatrix;
/// use geigs::operators::*;
///
/// let A = CscMatrix::<f64>::from_diagonal(&[1., 2., 3., 4.]);
/// let B = CscMatrix::<f64>::identity(4);
/// let mut op = SymShiftInvert::new(&A, &B, ShiftFactorizationMethod::Auto).unwrap();
/// op.set_shift(2.5).unwrap();
///
/// let mut y = vec![0.; 4];
/// op.apply(&[1., 1., 1., 1.], &mut y).unwrap();
/// ```
#[derive(Debug)]
pub struct SymShiftInvert<'a, T>
where
    T: FloatT,
{
    A: SymMatrix<'a, T>,
    B: SymMatrix<'a, T>,
    method: ShiftFactorizationMethod,
    // dense LU replaces a failed sparse LDL
    fallback: bool,
    sigma: Option<T>,
    factors: Option<ShiftFactors<T>>,
}

impl<'a, T> SymShiftInvert<'a, T>
where
    T: FloatT,
{
    pub fn new(
        A: impl Into<SymMatrix<'a, T>>,
        B: impl Into<SymMatrix<'a, T>>,
        method: ShiftFactorizationMethod,
    ) -> Result<Self, OperatorError> {
        let (A, B) = (A.into(), B.into());
        A.check()?;
        B.check()?;
        if A.dim() != B.dim() {
            return Err(OperatorError::IncompatibleDimension {
                expected: A.dim(),
                found: B.dim(),
            });
        }

        let both_sparse = A.is_sparse() && B.is_sparse();
        let fallback = method == ShiftFactorizationMethod::Auto;
        let method = match method {
            ShiftFactorizationMethod::Auto if both_sparse => ShiftFactorizationMethod::SparseLDL,
            ShiftFactorizationMethod::Auto => ShiftFactorizationMethod::DenseLU,
            ShiftFactorizationMethod::SparseLDL if !both_sparse => {
                return Err(OperatorError::SparseInputRequired)
            }
            m => m,
        };

        Ok(Self {
            A,
            B,
            method,
            fallback,
            sigma: None,
            factors: None,
        })
    }

    /// the factorization method in use, with `Auto` resolved
    pub fn method(&self) -> ShiftFactorizationMethod {
        self.method
    }

    /// The factorization of `A - σB` currently held, if any.
    ///
    /// Differs from [`method`](Self::method) when `Auto` had to fall back
    /// from sparse LDL to dense LU at the current shift.
    pub fn factorization(&self) -> Option<ShiftFactorizationMethod> {
        self.factors.as_ref().map(|f| match f {
            ShiftFactors::DenseLU(_) => ShiftFactorizationMethod::DenseLU,
            ShiftFactors::SparseLDL(_) => ShiftFactorizationMethod::SparseLDL,
        })
    }

    /// the current shift, if one has been set
    pub fn shift(&self) -> Option<T> {
        self.sigma
    }

    /// Number of eigenvalues of the pencil `(A, B)` smaller than the shift.
    ///
    /// Follows from the inertia of `A - σB` when `B` is positive
    /// definite.  Only available while the sparse LDL factorization is in
    /// use, so not after a fallback to dense LU.
    pub fn num_eigenvalues_below_shift(&self) -> Option<usize> {
        self.factors
            .as_ref()
            .and_then(|f| f.inertia())
            .map(|(_pos, neg)| neg)
    }

    fn factor(&self, sigma: T) -> Result<ShiftFactors<T>, OperatorError> {
        match (self.method, self.A, self.B) {
            (ShiftFactorizationMethod::SparseLDL, SymMatrix::Sparse(A), SymMatrix::Sparse(B)) => {
                let C = A.sub_scaled(sigma, B)?;
                match factor_sparse(&C) {
                    Ok(mut ldl) => {
                        if self.fallback && !is_backward_stable(&C, &mut ldl) {
                            return self.factor_dense(sigma);
                        }
                        Ok(ShiftFactors::SparseLDL(ldl))
                    }
                    Err(OperatorError::PivotBreakdown { .. }) if self.fallback => {
                        self.factor_dense(sigma)
                    }
                    Err(e) => Err(e),
                }
            }
            (ShiftFactorizationMethod::SparseLDL, _, _) => Err(OperatorError::SparseInputRequired),
            _ => self.factor_dense(sigma),
        }
    }

    fn factor_dense(&self, sigma: T) -> Result<ShiftFactors<T>, OperatorError> {
        let mut C = self.A.to_dense()?;
        let Bd = self.B.to_dense()?;
        C.data_mut().axpby(-sigma, Bd.data(), T::one());
        let lu = DenseLU::factor(&C).map_err(|e| match e {
            DenseFactorizationError::Singular(column) => OperatorError::SingularShift { column },
            e => OperatorError::Factorization(e.to_string()),
        })?;
        Ok(ShiftFactors::DenseLU(lu))
    }
}

fn factor_sparse<T: FloatT>(C: &CscMatrix<T>) -> Result<LdlFactorization<T>, OperatorError> {
    LdlFactorization::new(C, Some(LdlSettings::default())).map_err(|e| match e {
        LdlError::ZeroPivot(column) => OperatorError::PivotBreakdown { column },
        e => OperatorError::Factorization(e.to_string()),
    })
}

// Backward error of the solve C x = 1, relative to ‖|C|‖∞‖x‖∞ + 1.
// Small pivots without pivoting show up here as element growth.
fn is_backward_stable<T: FloatT>(C: &CscMatrix<T>, ldl: &mut LdlFactorization<T>) -> bool {
    let n = C.nrows();
    let b = vec![T::one(); n];
    let mut x = b.clone();
    ldl.solve(&mut x);

    // r = C x - b
    let mut r = b;
    C.symv(&mut r, &x, T::one(), -T::one());

    let mut rowsum = vec![T::zero(); n];
    for col in 0..n {
        for p in C.colptr[col]..C.colptr[col + 1] {
            let (row, v) = (C.rowval[p], C.nzval[p].abs());
            rowsum[row] += v;
            if row != col {
                rowsum[col] += v;
            }
        }
    }

    let eta = r.norm_inf() / (rowsum.norm_inf() * x.norm_inf() + T::one());
    eta.is_finite() && eta <= T::epsilon().sqrt()
}

impl<'a, T> ShiftSolve<T> for SymShiftInvert<'a, T>
where
    T: FloatT,
{
    fn dim(&self) -> usize {
        self.A.dim()
    }

    fn set_shift(&mut self, sigma: T) -> Result<(), OperatorError> {
        // a failed refactorization leaves no stale factors behind
        self.factors = None;
        self.sigma = None;

        self.factors = Some(self.factor(sigma)?);
        self.sigma = Some(sigma);
        Ok(())
    }

    fn apply(&mut self, x: &[T], y: &mut [T]) -> Result<(), OperatorError> {
        check_operand_dims(self.A.dim(), x, y)?;
        let factors = self.factors.as_mut().ok_or(OperatorError::ShiftNotSet)?;
        factors.solve_into(x, y);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn laplacian_triu(n: usize) -> CscMatrix<f64> {
        CscMatrix::tridiagonal_triu(&vec![2.0; n], &vec![-1.0; n - 1])
    }

    #[test]
    fn test_shift_solve_dense_and_sparse_agree() {
        let n = 7;
        let A = laplacian_triu(n);
        let B = CscMatrix::from_diagonal(&vec![2.0; n]);
        let Ad = Matrix::from_csc_sym(&A).unwrap();
        let sigma = 0.3;

        let mut sparse = SymShiftInvert::new(&A, &B, ShiftFactorizationMethod::Auto).unwrap();
        let mut dense = SymShiftInvert::new(&Ad, &B, ShiftFactorizationMethod::Auto).unwrap();
        assert_eq!(sparse.method(), ShiftFactorizationMethod::SparseLDL);
        assert_eq!(dense.method(), ShiftFactorizationMethod::DenseLU);

        sparse.set_shift(sigma).unwrap();
        dense.set_shift(sigma).unwrap();
        assert_eq!(sparse.shift(), Some(sigma));

        let x: Vec<f64> = (0..n).map(|i| 1.0 + i as f64).collect();
        let (mut ys, mut yd) = (vec![0.; n], vec![0.; n]);
        sparse.apply(&x, &mut ys).unwrap();
        dense.apply(&x, &mut yd).unwrap();
        assert!(ys.norm_inf_diff(&yd) < 1e-10);

        // (A - σB) y = x
        let mut r = vec![0.; n];
        Ad.gemv(&mut r, &ys, 1., 0.);
        r.axpby(-2.0 * sigma, &ys, 1.0);
        assert!(r.norm_inf_diff(&x) < 1e-10);
    }

    #[test]
    fn test_shift_solve_not_set() {
        let A = laplacian_triu(3);
        let B = CscMatrix::identity(3);
        let mut op = SymShiftInvert::new(&A, &B, ShiftFactorizationMethod::DenseLU).unwrap();
        let mut y = vec![0.; 3];
        assert_eq!(
            op.apply(&[1., 1., 1.], &mut y),
            Err(OperatorError::ShiftNotSet)
        );
    }

    #[test]
    fn test_shift_solve_singular_shift() {
        let A = CscMatrix::from_diagonal(&[1., 2., 3., 4., 5.]);
        let B = CscMatrix::identity(5);

        for method in [
            ShiftFactorizationMethod::Auto,
            ShiftFactorizationMethod::DenseLU,
        ] {
            let mut op = SymShiftInvert::new(&A, &B, method).unwrap();
            let err = op.set_shift(2.0).unwrap_err();
            assert!(matches!(err, OperatorError::SingularShift { .. }));
            assert_eq!(op.shift(), None);
            assert_eq!(op.factorization(), None);

            // a failed shift leaves the operator unusable
            let mut y = vec![0.; 5];
            assert_eq!(
                op.apply(&[1.; 5], &mut y),
                Err(OperatorError::ShiftNotSet)
            );
        }
    }

    #[test]
    fn test_shift_solve_ldl_breakdown() {
        // A - 2.5I = [0 1 1; 1 0 1; 1 1 0] is nonsingular with eigenvalues
        // 2, -1, -1, but every diagonal pivot is zero
        let A = CscMatrix::new(
            3,
            3,
            vec![0, 1, 3, 6],
            vec![0, 0, 1, 0, 1, 2],
            vec![2.5, 1., 2.5, 1., 1., 2.5],
        );
        let B = CscMatrix::identity(3);
        let sigma = 2.5;

        let mut ldl = SymShiftInvert::new(&A, &B, ShiftFactorizationMethod::SparseLDL).unwrap();
        assert!(matches!(
            ldl.set_shift(sigma),
            Err(OperatorError::PivotBreakdown { .. })
        ));

        let mut op = SymShiftInvert::new(&A, &B, ShiftFactorizationMethod::Auto).unwrap();
        assert_eq!(op.method(), ShiftFactorizationMethod::SparseLDL);
        op.set_shift(sigma).unwrap();
        assert_eq!(op.factorization(), Some(ShiftFactorizationMethod::DenseLU));
        assert_eq!(op.num_eigenvalues_below_shift(), None);

        // (A - σI)⁻¹ [2, 2, 2] = [1, 1, 1]
        let mut y = vec![0.; 3];
        op.apply(&[2., 2., 2.], &mut y).unwrap();
        assert!(y.norm_inf_diff(&[1., 1., 1.]) < 1e-14);

        // a regular shift moves back to the sparse factorization
        op.set_shift(0.5).unwrap();
        assert_eq!(op.factorization(), Some(ShiftFactorizationMethod::SparseLDL));
        assert!(op.num_eigenvalues_below_shift().is_some());
    }

    #[test]
    fn test_shift_solve_small_pivots() {
        // a shift just off the middle of the spectrum leaves tiny
        // pivots in the unpivoted factorization of A - σI
        let n = 40;
        let A = laplacian_triu(n);
        let B = CscMatrix::identity(n);
        let sigma = 2.0 + 1e-9;

        let mut op = SymShiftInvert::new(&A, &B, ShiftFactorizationMethod::Auto).unwrap();
        op.set_shift(sigma).unwrap();

        let x: Vec<f64> = (0..n).map(|i| 1.0 + (i % 3) as f64).collect();
        let mut y = vec![0.; n];
        op.apply(&x, &mut y).unwrap();

        // (A - σI) y = x, whichever factorization was kept
        let mut r = x.clone();
        A.symv(&mut r, &y, 1., -1.);
        r.axpby(-sigma, &y, 1.);
        assert!(r.norm_inf() <= 1e-6 * (1. + y.norm_inf()));
    }

    #[test]
    fn test_shift_solve_inertia() {
        let A = CscMatrix::from_diagonal(&[1., 2., 3., 4., 5.]);
        let B = CscMatrix::identity(5);
        let mut op = SymShiftInvert::new(&A, &B, ShiftFactorizationMethod::Auto).unwrap();
        assert_eq!(op.num_eigenvalues_below_shift(), None);
        op.set_shift(3.5).unwrap();
        assert_eq!(op.num_eigenvalues_below_shift(), Some(3));
    }

    #[test]
    fn test_shift_solve_bad_inputs() {
        let A = laplacian_triu(4);
        let B = CscMatrix::identity(3);
        assert!(matches!(
            SymShiftInvert::new(&A, &B, ShiftFactorizationMethod::Auto),
            Err(OperatorError::IncompatibleDimension { .. })
        ));

        let Bd = Matrix::identity(4);
        assert!(matches!(
            SymShiftInvert::new(&A, &Bd, ShiftFactorizationMethod::SparseLDL),
            Err(OperatorError::SparseInputRequired)
        ));

        assert_eq!(
            "ldl".parse::<ShiftFactorizationMethod>(),
            Ok(ShiftFactorizationMethod::SparseLDL)
        );
        assert!("qdldl".parse::<ShiftFactorizationMethod>().is_err());
    }
}
