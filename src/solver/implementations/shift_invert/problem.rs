#![allow(non_snake_case)]

use super::SymGEigsShiftSolver;
use crate::algebra::*;
use crate::operators::*;
use crate::solver::core::*;

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// A sparse symmetric generalized eigenproblem `A·x = λ·B·x`, together
/// with everything needed to solve it by shift-and-invert.
///
/// `A` and `B` hold the upper triangle of symmetric matrices in CSC
/// format, with `B` positive definite.  The factorization of `A - σB`
/// is chosen by [`EigsSettings::shift_solve_method`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
pub struct SparseGEigsProblem<T: FloatT = f64> {
    pub A: CscMatrix<T>,
    pub B: CscMatrix<T>,
    pub sigma: T,
    pub nev: usize,
    pub ncv: usize,
    pub rule: SortRule<T>,
    pub settings: EigsSettings<T>,
}

/// Owned results of [`SparseGEigsProblem::solve`]
#[derive(Debug, Clone)]
pub struct GEigsSolution<T> {
    /// converged eigenvalues, sorted by the problem's rule
    pub eigenvalues: Vec<T>,
    /// matching B-orthonormal eigenvectors, one per column
    pub eigenvectors: Matrix<T>,
    pub status: EigsStatus,
    pub nconv: usize,
    pub iterations: u32,
    pub operations: usize,
    pub solve_time: f64,
    /// number of eigenvalues of the pencil below the shift, when
    /// the factorization reports its inertia
    pub num_below_shift: Option<usize>,
}

impl<T> SparseGEigsProblem<T>
where
    T: FloatT,
{
    /// Problem for the `nev` eigenvalues closest to `sigma`.
    ///
    /// The Krylov subspace dimension defaults to
    /// `min(max(2·nev + 1, 20), n)`.
    pub fn new(
        A: CscMatrix<T>,
        B: CscMatrix<T>,
        sigma: T,
        nev: usize,
        settings: EigsSettings<T>,
    ) -> Result<Self, EigsError> {
        let ncv = usize::min(usize::max(2 * nev + 1, 20), A.n);
        let problem = Self {
            A,
            B,
            sigma,
            nev,
            ncv,
            rule: SortRule::ClosestTo(sigma),
            settings,
        };
        problem.check()?;
        Ok(problem)
    }

    /// Override the Krylov subspace dimension
    pub fn with_ncv(mut self, ncv: usize) -> Result<Self, EigsError> {
        self.ncv = ncv;
        self.check()?;
        Ok(self)
    }

    /// Override the sort rule
    pub fn with_rule(mut self, rule: SortRule<T>) -> Self {
        self.rule = rule;
        self
    }

    /// Factorization of `A - σB` requested by the settings
    pub fn method(&self) -> Result<ShiftFactorizationMethod, EigsError> {
        self.settings
            .shift_solve_method
            .parse()
            .map_err(|_| SettingsError::BadFieldValue("shift_solve_method").into())
    }

    pub(crate) fn check(&self) -> Result<(), EigsError> {
        self.settings.validate()?;
        self.A
            .check_symmetric_triu()
            .map_err(OperatorError::from)?;
        self.B
            .check_symmetric_triu()
            .map_err(OperatorError::from)?;
        check_dimensions(self.A.n, self.B.n, self.nev, self.ncv)?;
        Ok(())
    }

    /// Factor `A - σB`, iterate to convergence and collect the results.
    pub fn solve(&self) -> Result<GEigsSolution<T>, EigsError> {
        self.check()?;

        let mut solve = SymShiftInvert::new(&self.A, &self.B, self.method()?)?;
        let mult = SparseSymMatProd::new(&self.B)?;

        let mut solver = SymGEigsShiftSolver::new(
            &mut solve,
            &mult,
            self.nev,
            self.ncv,
            self.sigma,
            self.settings.clone(),
        )?;

        solver.init()?;
        let nconv = solver.compute(self.rule)?;

        let info = solver.info();
        let solution = GEigsSolution {
            eigenvalues: solver.eigenvalues(),
            eigenvectors: solver.eigenvectors(),
            status: info.status,
            nconv,
            iterations: info.iterations,
            operations: info.operations,
            solve_time: info.solve_time,
            num_below_shift: None,
        };
        drop(solver);

        Ok(GEigsSolution {
            num_below_shift: solve.num_eigenvalues_below_shift(),
            ..solution
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_problem_checks() {
        let A = CscMatrix::from_diagonal(&[1., 2., 3., 4.]);
        let B = CscMatrix::<f64>::identity(4);

        // default ncv is capped at n
        let p = SparseGEigsProblem::new(A.clone(), B.clone(), 2.2, 2, EigsSettings::default())
            .unwrap();
        assert_eq!(p.ncv, 4);
        assert_eq!(p.rule, SortRule::ClosestTo(2.2));
        assert_eq!(p.method(), Ok(ShiftFactorizationMethod::Auto));

        assert!(p.clone().with_ncv(2).is_err());

        let B3 = CscMatrix::<f64>::identity(3);
        assert_eq!(
            SparseGEigsProblem::new(A.clone(), B3, 2.2, 2, EigsSettings::default()).err(),
            Some(EigsError::Configuration(ConfigError::DimensionMismatch {
                op: 4,
                mult: 3
            }))
        );

        // full storage is rejected
        let F = CscMatrix::new(2, 2, vec![0, 2, 4], vec![0, 1, 0, 1], vec![2., 1., 1., 2.]);
        assert_eq!(
            SparseGEigsProblem::new(F.clone(), F, 0.0, 1, EigsSettings::default()).err(),
            Some(EigsError::Operator(OperatorError::Format(
                SparseFormatError::NotUpperTriangular
            )))
        );
    }

    #[test]
    fn test_problem_solve() {
        let A = CscMatrix::from_diagonal(&[1., 2., 3., 4., 5., 6.]);
        let B = CscMatrix::from_diagonal(&[2., 2., 2., 2., 2., 2.]);

        // pencil eigenvalues are 0.5, 1.0, ..., 3.0
        let p = SparseGEigsProblem::new(A, B, 1.3, 2, EigsSettings::default())
            .unwrap()
            .with_ncv(5)
            .unwrap();
        let sol = p.solve().unwrap();

        assert_eq!(sol.status, EigsStatus::Converged);
        assert_eq!(sol.nconv, 2);
        assert!(sol.eigenvalues.norm_inf_diff(&[1.5, 1.0]) < 1e-8);
        assert_eq!(sol.eigenvectors.ncols(), 2);
        // 0.5 and 1.0 lie below the shift
        assert_eq!(sol.num_below_shift, Some(2));
    }
}
