use crate::algebra::*;
use crate::io::ConfigurablePrintTarget;
use crate::operators::{MatProd, ShiftInvertOp, ShiftSolve};
use crate::solver::core::traits::{GEigsMode, GeneralizedEigensolver};
use crate::solver::core::*;
use std::io::Write;

/// Lifecycle of a [`SymGEigsShiftSolver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverState {
    /// constructed, not yet initialized
    Constructed,
    /// start vector set, ready to compute
    Initialized,
    /// iteration in progress
    Computing,
    /// all requested eigenpairs converged
    Converged,
    /// iteration limit reached with fewer than `nev` converged pairs
    PartiallyConverged,
    /// an operator failed.  The instance can not be reused.
    Failed,
}

impl std::fmt::Display for SolverState {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

type ShiftInvertEngine<'a, T, S, B> =
    SymEigsBase<T, ShiftInvertOp<'a, T, S, B>, &'a B, ShiftInvertTransform<T>>;

/// Solver for the symmetric generalized eigenproblem `A·x = λ·B·x`
/// using the shift-and-invert spectral transformation.
///
/// The solver iterates on `OP = (A - σB)⁻¹B` in the `B`-inner product.
/// Eigenvalues of the pencil closest to `σ` become the largest
/// eigenvalues `ν = 1/(λ - σ)` of `OP`, and are mapped back through
/// `λ = 1/ν + σ` before being sorted under the requested rule.
///
/// Both operators are borrowed for the lifetime of the solver.  The
/// shift is passed to the solve operator once, on construction.
///
/// # Example
///
/// ```
/// use geigs::algebra::CscMatrix;
/// use geigs::operators::*;
/// use geigs::solver::*;
///
/// let A = CscMatrix::<f64>::from_diagonal(&[1., 2., 3., 4., 5.]);
/// let B = CscMatrix::<f64>::identity(5);
///
/// let mut solve = SymShiftInvert::new(&A, &B, ShiftFactorizationMethod::Auto).unwrap();
/// let mult = SparseSymMatProd::new(&B).unwrap();
///
/// let sigma = 2.5;
/// let settings = EigsSettings::default();
/// let mut solver = SymGEigsShiftSolver::new(&mut solve, &mult, 2, 4, sigma, settings).unwrap();
///
/// solver.init().unwrap();
/// let nconv = solver.compute(SortRule::ClosestTo(sigma)).unwrap();
///
/// assert_eq!(nconv, 2);
/// let values = solver.eigenvalues();
/// assert!((values[0] - 3.).abs() < 1e-8 || (values[0] - 2.).abs() < 1e-8);
/// ```
pub struct SymGEigsShiftSolver<'a, T, S, B>
where
    T: FloatT,
    S: ShiftSolve<T>,
    B: MatProd<T>,
{
    sigma: T,
    state: SolverState,
    // failure to factor A - σB, reported on first use
    shift_failure: Option<EigsError>,
    engine: ShiftInvertEngine<'a, T, S, B>,
}

impl<'a, T, S, B> SymGEigsShiftSolver<'a, T, S, B>
where
    T: FloatT,
    S: ShiftSolve<T>,
    B: MatProd<T>,
{
    /// Construct a solver for `nev` eigenvalues using a Krylov subspace
    /// of dimension `ncv`, with `1 <= nev < ncv <= n`.
    ///
    /// Configuration errors are returned immediately, before the solve
    /// operator is touched.  A failure of `solve.set_shift(sigma)` is
    /// held and returned by the first call to [`init`](Self::init) or
    /// [`compute`](Self::compute).
    pub fn new(
        solve: &'a mut S,
        mult: &'a B,
        nev: usize,
        ncv: usize,
        sigma: T,
        settings: EigsSettings<T>,
    ) -> Result<Self, EigsError> {
        settings.validate()?;
        check_dimensions(solve.dim(), mult.dim(), nev, ncv)?;

        let shift_failure = solve.set_shift(sigma).err().map(EigsError::from);

        let op = ShiftInvertOp::new(solve, mult)?;
        let transform = ShiftInvertTransform { sigma };
        let mut engine = SymEigsBase::new(op, mult, nev, ncv, settings, transform)?;
        engine.info_mut().sigma = Some(sigma);

        Ok(Self {
            sigma,
            state: SolverState::Constructed,
            shift_failure,
            engine,
        })
    }

    pub fn sigma(&self) -> T {
        self.sigma
    }

    pub fn state(&self) -> SolverState {
        self.state
    }

    // surfaces a held shift failure, marking the instance failed
    fn check_shift(&mut self) -> Result<(), EigsError> {
        match self.shift_failure {
            Some(ref e) => {
                self.state = SolverState::Failed;
                self.engine.info_mut().status = EigsStatus::NumericalError;
                Err(e.clone())
            }
            None => Ok(()),
        }
    }

    /// Initialize with a deterministic pseudo-random start vector
    pub fn init(&mut self) -> Result<(), EigsError> {
        self.check_shift()?;
        let result = self.engine.init();
        self.after_init(result)
    }

    /// Initialize with the start vector `v0`
    pub fn init_with(&mut self, v0: &[T]) -> Result<(), EigsError> {
        self.check_shift()?;
        let result = self.engine.init_with(v0);
        self.after_init(result)
    }

    fn after_init(&mut self, result: Result<(), EigsError>) -> Result<(), EigsError> {
        match result {
            Ok(()) => self.state = SolverState::Initialized,
            Err(EigsError::Operator(_)) => self.state = SolverState::Failed,
            Err(_) => {}
        }
        result
    }

    /// Compute the `nev` eigenvalues of the pencil ranked first by `rule`,
    /// typically [`SortRule::ClosestTo(σ)`](SortRule::ClosestTo).
    ///
    /// The iteration limit and tolerance are taken from the solver
    /// settings.  Returns the number of converged eigenpairs.
    pub fn compute(&mut self, rule: SortRule<T>) -> Result<usize, EigsError> {
        self.check_shift()?;

        let prev = self.state;
        self.state = SolverState::Computing;

        let result = self.engine.compute(rule);

        self.state = match result {
            Ok(_) if self.engine.status() == EigsStatus::Converged => SolverState::Converged,
            Ok(_) => SolverState::PartiallyConverged,
            Err(EigsError::NotInitialized) | Err(EigsError::AlreadyComputed) => prev,
            Err(_) => SolverState::Failed,
        };
        result
    }

    /// Converged eigenvalues `λ`, in the order given by the sort rule
    pub fn eigenvalues(&self) -> Vec<T> {
        self.engine.eigenvalues()
    }

    /// Converged eigenvectors, B-orthonormal, one per column
    pub fn eigenvectors(&self) -> Matrix<T> {
        self.engine.eigenvectors()
    }

    pub fn status(&self) -> EigsStatus {
        self.engine.status()
    }

    pub fn info(&self) -> &EigsInfo<T> {
        self.engine.info()
    }

    pub fn settings(&self) -> &EigsSettings<T> {
        self.engine.settings()
    }
}

impl<'a, T, S, B> GeneralizedEigensolver<T> for SymGEigsShiftSolver<'a, T, S, B>
where
    T: FloatT,
    S: ShiftSolve<T>,
    B: MatProd<T>,
{
    fn mode(&self) -> GEigsMode {
        GEigsMode::ShiftInvert
    }
    fn init(&mut self) -> Result<(), EigsError> {
        SymGEigsShiftSolver::init(self)
    }
    fn init_with(&mut self, v0: &[T]) -> Result<(), EigsError> {
        SymGEigsShiftSolver::init_with(self, v0)
    }
    fn compute(&mut self, rule: SortRule<T>) -> Result<usize, EigsError> {
        SymGEigsShiftSolver::compute(self, rule)
    }
    fn eigenvalues(&self) -> Vec<T> {
        SymGEigsShiftSolver::eigenvalues(self)
    }
    fn eigenvectors(&self) -> Matrix<T> {
        SymGEigsShiftSolver::eigenvectors(self)
    }
    fn status(&self) -> EigsStatus {
        SymGEigsShiftSolver::status(self)
    }
    fn info(&self) -> &EigsInfo<T> {
        SymGEigsShiftSolver::info(self)
    }
}

impl<'a, T, S, B> ConfigurablePrintTarget for SymGEigsShiftSolver<'a, T, S, B>
where
    T: FloatT,
    S: ShiftSolve<T>,
    B: MatProd<T>,
{
    fn print_to_stdout(&mut self) {
        self.engine.print_to_stdout()
    }
    fn print_to_file(&mut self, file: std::fs::File) {
        self.engine.print_to_file(file)
    }
    fn print_to_stream(&mut self, stream: Box<dyn Write + Send + Sync>) {
        self.engine.print_to_stream(stream)
    }
    fn print_to_buffer(&mut self) {
        self.engine.print_to_buffer()
    }
    fn get_print_buffer(&mut self) -> std::io::Result<String> {
        self.engine.get_print_buffer()
    }
}
