use super::lanczos::LanczosFactorization;
use super::ritz::RitzPairs;
use super::*;
use crate::algebra::*;
use crate::io::ConfigurablePrintTarget;
use crate::operators::{IdentityMatProd, LinearOperator, MatProd};
use crate::timers::*;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Constructed,
    Initialized,
    Computed,
}

/// Implicitly restarted Lanczos eigensolver.
///
/// Iterates on a self-adjoint operator `OP` in the inner product
/// `⟨x,y⟩ = xᵀBy` defined by `BOP`, which must be symmetric positive
/// definite.  Converged Ritz values are passed through the hook `H`
/// before the final sort, so that solvers iterating on a transformed
/// operator can report eigenvalues of the original problem.
///
/// The solver is single use: [`init`](Self::init) (or
/// [`init_with`](Self::init_with)) must be called before
/// [`compute`](Self::compute), and `compute` can only be called once.
pub struct SymEigsBase<T, OP, BOP, H>
where
    T: FloatT,
    OP: LinearOperator<T>,
    BOP: MatProd<T>,
    H: RitzValueTransform<T>,
{
    op: OP,
    bop: BOP,
    transform: H,

    n: usize,
    nev: usize,
    ncv: usize,

    fac: LanczosFactorization<T>,
    ritz: RitzPairs<T>,
    phase: Phase,

    pub(crate) settings: EigsSettings<T>,
    pub(crate) info: EigsInfo<T>,
    //stored as an option so that it can be swapped
    //out while iterating and avoid borrow conflicts
    timers: Option<Timers>,
}

/// Solver for the standard symmetric eigenproblem `OP·x = λ·x`
pub type SymEigsSolver<T, OP> = SymEigsBase<T, OP, IdentityMatProd, NoTransform>;

impl<T, OP> SymEigsBase<T, OP, IdentityMatProd, NoTransform>
where
    T: FloatT,
    OP: LinearOperator<T>,
{
    /// Solver for the standard problem with the Euclidean inner product
    pub fn standard(
        op: OP,
        nev: usize,
        ncv: usize,
        settings: EigsSettings<T>,
    ) -> Result<Self, EigsError> {
        let n = op.dim();
        Self::new(op, IdentityMatProd::new(n), nev, ncv, settings, NoTransform)
    }
}

impl<T, OP, BOP, H> SymEigsBase<T, OP, BOP, H>
where
    T: FloatT,
    OP: LinearOperator<T>,
    BOP: MatProd<T>,
    H: RitzValueTransform<T>,
{
    pub fn new(
        op: OP,
        bop: BOP,
        nev: usize,
        ncv: usize,
        settings: EigsSettings<T>,
        transform: H,
    ) -> Result<Self, EigsError> {
        settings.validate()?;
        check_dimensions(op.dim(), bop.dim(), nev, ncv)?;

        let n = op.dim();
        let fac = LanczosFactorization::new(n, ncv, settings.seed);

        Ok(Self {
            op,
            bop,
            transform,
            n,
            nev,
            ncv,
            fac,
            ritz: RitzPairs::new(nev, ncv),
            phase: Phase::Constructed,
            settings,
            info: EigsInfo::new(n, nev, ncv),
            timers: Some(Timers::default()),
        })
    }

    /// Initialize from the deterministic pseudo-random vector
    /// defined by [`EigsSettings::seed`].
    pub fn init(&mut self) -> Result<(), EigsError> {
        let v0 = self.fac.random_start();
        self.init_with(&v0)
    }

    /// Initialize from `v0`, which must have nonzero B-norm.
    pub fn init_with(&mut self, v0: &[T]) -> Result<(), EigsError> {
        if self.phase == Phase::Computed {
            return Err(EigsError::AlreadyComputed);
        }
        if v0.len() != self.n {
            return Err(ConfigError::InitialVectorLength {
                expected: self.n,
                found: v0.len(),
            }
            .into());
        }

        let mut timers = self.timers.take().unwrap_or_default();
        timers.reset_timer("init");

        let result;
        timeit! {timers => "init"; {
            result = self.fac.init(&mut self.op, &self.bop, v0);
        }}
        self.timers.replace(timers);

        if let Err(EigsError::Operator(_)) = result {
            self.info.status = EigsStatus::NumericalError;
        }
        result?;

        self.info.operations = self.fac.nmatop;
        self.phase = Phase::Initialized;
        Ok(())
    }

    /// Compute the `nev` eigenvalues ranked first by `rule`.
    ///
    /// The rule is mapped into the spectrum of the iteration operator by
    /// the solver's [`RitzValueTransform`], and applied unchanged to the
    /// final, transformed eigenvalues.  Returns the number of converged
    /// eigenpairs.
    pub fn compute(&mut self, rule: SortRule<T>) -> Result<usize, EigsError> {
        let selection = self.transform.selection_rule(rule);
        self.compute_with(selection, rule)
    }

    /// Compute with separate rules for selecting Ritz values while
    /// iterating and for sorting the final results.
    pub fn compute_with(
        &mut self,
        selection: SortRule<T>,
        sorting: SortRule<T>,
    ) -> Result<usize, EigsError> {
        match self.phase {
            Phase::Constructed => return Err(EigsError::NotInitialized),
            Phase::Computed => return Err(EigsError::AlreadyComputed),
            Phase::Initialized => {}
        }
        self.phase = Phase::Computed;

        let mut timers = self.timers.take().unwrap_or_default();

        notimeit! {timers; {
            let _ = self.info.print_configuration(&self.settings, &selection, &sorting);
            let _ = self.info.print_status_header(&self.settings);
        }}

        self.info.reset(&mut timers);
        self.info.status = EigsStatus::Converging;

        let result;
        timeit! {timers => "compute"; {
            result = self.iterate(selection, sorting, &mut timers);
        }}

        match result {
            Ok(nconv) if nconv >= self.nev => self.info.status = EigsStatus::Converged,
            Ok(_) => self.info.status = EigsStatus::MaxIterations,
            Err(_) => self.info.status = EigsStatus::NumericalError,
        }

        self.info.operations = self.fac.nmatop;
        self.info.finalize(&mut timers);
        let _ = self.info.print_footer(&self.settings, &timers);

        self.timers.replace(timers);

        result.map(|nconv| usize::min(nconv, self.nev))
    }

    fn iterate(
        &mut self,
        selection: SortRule<T>,
        sorting: SortRule<T>,
        timers: &mut Timers,
    ) -> Result<usize, EigsError> {
        let (nev, ncv) = (self.nev, self.ncv);
        let tol = self.settings.tol;

        self.fac.factorize_from(&mut self.op, &self.bop, 1, ncv)?;
        self.ritz
            .retrieve(&self.fac.diag, &self.fac.offdiag, selection)?;

        let mut iter: u32 = 0;
        let nconv = loop {
            let nconv = self.ritz.num_converged(tol, self.fac.beta);
            self.info
                .save_iteration(iter, nconv, self.fac.beta, self.fac.nmatop);
            notimeit! {timers; {
                let _ = self.info.print_status(&self.settings);
            }}

            if nconv >= nev || iter >= self.settings.max_iter {
                break nconv;
            }

            let k = self.ritz.nev_adjusted(nconv);
            let result;
            timeit! {timers => "restart"; {
                result = self.restart(k, selection);
            }}
            result?;
            iter += 1;
        };

        // back to the spectrum of the original problem, then
        // order under the caller's rule
        self.transform.transform(&mut self.ritz.values[..nev]);
        self.ritz.sort_leading(sorting);

        Ok(nconv)
    }

    fn restart(&mut self, k: usize, selection: SortRule<T>) -> Result<(), EigsError> {
        let shifts = self.ritz.values[k..].to_vec();
        self.fac.restart(&mut self.op, &self.bop, k, &shifts)?;
        self.ritz
            .retrieve(&self.fac.diag, &self.fac.offdiag, selection)
    }

    fn has_results(&self) -> bool {
        self.phase == Phase::Computed && !self.info.status.is_errored()
    }

    /// Converged eigenvalues in their final order.  Empty until
    /// [`compute`](Self::compute) has succeeded.
    pub fn eigenvalues(&self) -> Vec<T> {
        match self.has_results() {
            true => self.ritz.converged_values(),
            false => Vec::new(),
        }
    }

    /// Converged eigenvectors as the columns of an `n × nconv` matrix,
    /// in the order of [`eigenvalues`](Self::eigenvalues).
    pub fn eigenvectors(&self) -> Matrix<T> {
        match self.has_results() {
            true => self.fac.ritz_vectors(&self.ritz.converged_vectors()),
            false => Matrix::zeros((self.n, 0)),
        }
    }

    pub fn num_iterations(&self) -> u32 {
        self.info.iterations
    }

    pub fn num_operations(&self) -> usize {
        self.fac.nmatop
    }

    pub fn status(&self) -> EigsStatus {
        self.info.status
    }

    pub fn info(&self) -> &EigsInfo<T> {
        &self.info
    }

    pub fn settings(&self) -> &EigsSettings<T> {
        &self.settings
    }

    pub(crate) fn info_mut(&mut self) -> &mut EigsInfo<T> {
        &mut self.info
    }
}

impl<T, OP, BOP, H> ConfigurablePrintTarget for SymEigsBase<T, OP, BOP, H>
where
    T: FloatT,
    OP: LinearOperator<T>,
    BOP: MatProd<T>,
    H: RitzValueTransform<T>,
{
    fn print_to_stdout(&mut self) {
        self.info.print_to_stdout()
    }
    fn print_to_file(&mut self, file: std::fs::File) {
        self.info.print_to_file(file)
    }
    fn print_to_stream(&mut self, stream: Box<dyn Write + Send + Sync>) {
        self.info.print_to_stream(stream)
    }
    fn print_to_buffer(&mut self) {
        self.info.print_to_buffer()
    }
    fn get_print_buffer(&mut self) -> std::io::Result<String> {
        self.info.get_print_buffer()
    }
}

pub(crate) fn check_dimensions(
    op: usize,
    mult: usize,
    nev: usize,
    ncv: usize,
) -> Result<(), ConfigError> {
    let n = op;
    if op != mult {
        return Err(ConfigError::DimensionMismatch { op, mult });
    }
    if nev < 1 || nev + 1 > n {
        return Err(ConfigError::BadNev { nev, n });
    }
    if ncv <= nev || ncv > n {
        return Err(ConfigError::BadNcv { nev, ncv, n });
    }
    Ok(())
}

#[path = "test.rs"]
#[cfg(test)]
mod test;
