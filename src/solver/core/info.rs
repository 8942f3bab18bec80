use super::EigsStatus;
use crate::algebra::*;
use crate::io::PrintTarget;
use crate::timers::*;

/// Progress and outcome of an eigensolver run.
#[derive(Default, Debug)]
pub struct EigsInfo<T> {
    /// problem dimension
    pub n: usize,
    /// number of requested eigenvalues
    pub nev: usize,
    /// Krylov subspace dimension
    pub ncv: usize,
    /// shift of a spectral transformation, if any
    pub sigma: Option<T>,
    /// implicit restarts performed
    pub iterations: u32,
    /// applications of the iteration operator
    pub operations: usize,
    /// number of converged eigenpairs
    pub nconv: usize,
    /// B-norm of the Lanczos residual at the last check
    pub fnorm: T,
    pub solve_time: f64,
    pub status: EigsStatus,

    // output stream for printing
    pub(crate) stream: PrintTarget,
}

impl<T> EigsInfo<T>
where
    T: FloatT,
{
    pub(crate) fn new(n: usize, nev: usize, ncv: usize) -> Self {
        Self {
            n,
            nev,
            ncv,
            ..Self::default()
        }
    }

    pub(crate) fn reset(&mut self, timers: &mut Timers) {
        self.status = EigsStatus::Unsolved;
        self.iterations = 0;
        self.nconv = 0;
        self.fnorm = T::zero();
        self.solve_time = 0f64;

        timers.reset_timer("compute");
    }

    pub(crate) fn save_iteration(&mut self, iter: u32, nconv: usize, fnorm: T, nmatop: usize) {
        self.iterations = iter;
        self.nconv = nconv;
        self.fnorm = fnorm;
        self.operations = nmatop;
    }

    pub(crate) fn finalize(&mut self, timers: &mut Timers) {
        self.solve_time = timers.total_time().as_secs_f64();
    }
}
