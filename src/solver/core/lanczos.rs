#![allow(non_snake_case)]

use super::rng::LcgRng;
use super::EigsError;
use crate::algebra::*;
use crate::operators::{LinearOperator, MatProd};

// attempts at drawing a fresh basis vector before giving up
const MAX_EXPANSION_TRIES: u64 = 5;
// passes of DGKS reorthogonalization per Lanczos step
const MAX_REORTH_PASSES: usize = 5;

/// Lanczos factorization `OP·V = V·H + f·eₖᵀ` in the `B`-inner product
/// `⟨x,y⟩ = xᵀBy`, with `V` B-orthonormal and `H` symmetric tridiagonal.
///
/// Only the leading `k` columns of `V` and the leading `k×k` block of `H`
/// are meaningful at any time.
#[derive(Debug, Clone)]
pub(crate) struct LanczosFactorization<T> {
    n: usize,
    ncv: usize,
    pub(crate) V: Matrix<T>,
    // H(i,i) = diag[i], H(i,i-1) = H(i-1,i) = offdiag[i-1]
    pub(crate) diag: Vec<T>,
    pub(crate) offdiag: Vec<T>,
    pub(crate) f: Vec<T>,
    pub(crate) beta: T,
    pub(crate) k: usize,
    seed: u64,
    // operator applications so far
    pub(crate) nmatop: usize,

    // scratch : B*x, random draws and projections onto V
    work: Vec<T>,
    draw: Vec<T>,
    proj: Vec<T>,
}

impl<T> LanczosFactorization<T>
where
    T: FloatT,
{
    pub(crate) fn new(n: usize, ncv: usize, seed: u64) -> Self {
        Self {
            n,
            ncv,
            V: Matrix::zeros((n, ncv)),
            diag: vec![T::zero(); ncv],
            offdiag: vec![T::zero(); ncv.saturating_sub(1)],
            f: vec![T::zero(); n],
            beta: T::zero(),
            k: 0,
            seed,
            nmatop: 0,
            work: vec![T::zero(); n],
            draw: vec![T::zero(); n],
            proj: vec![T::zero(); ncv],
        }
    }

    fn near_zero() -> T {
        T::min_positive_value().powf((2.0 / 3.0).as_T())
    }

    // ‖f‖ below this is treated as an invariant subspace
    fn beta_thresh(&self) -> T {
        let n: T = self.n.as_T();
        T::epsilon() * n.sqrt()
    }

    /// Deterministic pseudo-random start vector
    pub(crate) fn random_start(&self) -> Vec<T> {
        let mut v0 = vec![T::zero(); self.n];
        LcgRng::new(self.seed).fill(&mut v0);
        v0
    }

    /// Starts a factorization of size one from `v0`.
    pub(crate) fn init<OP, BOP>(
        &mut self,
        op: &mut OP,
        bop: &BOP,
        v0: &[T],
    ) -> Result<(), EigsError>
    where
        OP: LinearOperator<T>,
        BOP: MatProd<T>,
    {
        self.V.data_mut().set(T::zero());
        self.diag.set(T::zero());
        self.offdiag.set(T::zero());
        self.nmatop = 0;

        let vnorm = b_norm(bop, &mut self.work, v0)?;
        if !(vnorm >= Self::near_zero()) {
            return Err(EigsError::BadInitialVector);
        }
        self.V
            .col_slice_mut(0)
            .axpby(T::recip(vnorm), v0, T::zero());

        // f = OP*v - ⟨v,OP*v⟩ v
        op.apply(self.V.col_slice(0), &mut self.f)?;
        self.nmatop += 1;

        self.diag[0] = b_dot(bop, &mut self.work, self.V.col_slice(0), &self.f)?;
        self.f.axpby(-self.diag[0], self.V.col_slice(0), T::one());
        self.k = 1;

        if self.f.norm_inf() < T::epsilon() {
            self.f.set(T::zero());
            self.beta = T::zero();
        } else {
            self.beta = b_norm(bop, &mut self.work, &self.f)?;
            self.reorthogonalize(bop, 0)?;
        }
        Ok(())
    }

    /// Extends the factorization from size `from_k` to size `to_m`.
    pub(crate) fn factorize_from<OP, BOP>(
        &mut self,
        op: &mut OP,
        bop: &BOP,
        from_k: usize,
        to_m: usize,
    ) -> Result<(), EigsError>
    where
        OP: LinearOperator<T>,
        BOP: MatProd<T>,
    {
        if to_m <= from_k {
            return Ok(());
        }
        debug_assert!(from_k >= 1 && from_k <= self.k && to_m <= self.ncv);

        // discard everything beyond the retained block
        self.diag[from_k..].set(T::zero());
        self.offdiag[(from_k - 1)..].set(T::zero());

        for i in from_k..to_m {
            let mut restart = false;

            // f is (numerically) in span(V), so continue from a fresh direction
            if self.beta < Self::near_zero() {
                self.expand_basis(op, bop, i)?;
                restart = true;
            }

            let (Vleft, Vi) = self.V.data_mut().split_at_mut(i * self.n);
            let Vi = &mut Vi[..self.n];
            Vi.axpby(T::recip(self.beta), &self.f, T::zero());
            let Vprev = &Vleft[(i - 1) * self.n..];

            self.offdiag[i - 1] = if restart { T::zero() } else { self.beta };

            op.apply(Vi, &mut self.f)?;
            self.nmatop += 1;

            // three term recurrence
            self.f.axpby(-self.offdiag[i - 1], Vprev, T::one());
            self.diag[i] = b_dot(bop, &mut self.work, Vi, &self.f)?;
            self.f.axpby(-self.diag[i], Vi, T::one());
            self.beta = b_norm(bop, &mut self.work, &self.f)?;

            self.reorthogonalize(bop, i)?;
        }

        self.k = to_m;
        Ok(())
    }

    // DGKS correction of f against V[:, 0..=i], folding the
    // corrections into the last column of H
    fn reorthogonalize<BOP>(&mut self, bop: &BOP, i: usize) -> Result<(), EigsError>
    where
        BOP: MatProd<T>,
    {
        let ncols = i + 1;
        let thresh = self.beta_thresh();

        b_project(bop, &mut self.work, &self.V, ncols, &self.f, &mut self.proj)?;

        let mut count = 0;
        while count < MAX_REORTH_PASSES
            && self.proj[..ncols].norm_inf() > T::epsilon() * self.beta
        {
            if self.beta < thresh {
                self.f.set(T::zero());
                self.beta = T::zero();
                break;
            }

            subtract_combination(&mut self.f, &self.V, &self.proj[..ncols]);
            if i > 0 {
                self.offdiag[i - 1] += self.proj[i - 1];
            }
            self.diag[i] += self.proj[i];

            self.beta = b_norm(bop, &mut self.work, &self.f)?;
            b_project(bop, &mut self.work, &self.V, ncols, &self.f, &mut self.proj)?;
            count += 1;
        }
        Ok(())
    }

    // replaces f with a random vector in the range of OP that is
    // B-orthogonal to V[:, 0..i]
    fn expand_basis<OP, BOP>(&mut self, op: &mut OP, bop: &BOP, i: usize) -> Result<(), EigsError>
    where
        OP: LinearOperator<T>,
        BOP: MatProd<T>,
    {
        let thresh = self.beta_thresh();

        for attempt in 0..MAX_EXPANSION_TRIES {
            let seed = self
                .seed
                .wrapping_add(2 * i as u64)
                .wrapping_add(123 * attempt);
            let mut rng = LcgRng::new(seed);

            // first try lands in the range of OP
            if attempt == 0 {
                rng.fill(&mut self.draw);
                op.apply(&self.draw, &mut self.f)?;
                self.nmatop += 1;
            } else {
                rng.fill(&mut self.f);
            }

            for _ in 0..2 {
                b_project(bop, &mut self.work, &self.V, i, &self.f, &mut self.proj)?;
                subtract_combination(&mut self.f, &self.V, &self.proj[..i]);
            }
            self.beta = b_norm(bop, &mut self.work, &self.f)?;

            if self.beta >= thresh {
                return Ok(());
            }
        }
        Err(EigsError::BasisExpansion)
    }

    /// Implicit restart keeping `k` columns, using the Ritz values in
    /// `shifts` as exact shifts.
    pub(crate) fn restart<OP, BOP>(
        &mut self,
        op: &mut OP,
        bop: &BOP,
        k: usize,
        shifts: &[T],
    ) -> Result<(), EigsError>
    where
        OP: LinearOperator<T>,
        BOP: MatProd<T>,
    {
        let ncv = self.ncv;
        if k >= ncv {
            return Ok(());
        }

        // large shifts first
        let mut shifts = shifts.to_vec();
        shifts.sort_by(|a, b| {
            b.abs()
                .partial_cmp(&a.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut Q = Matrix::identity(ncv);
        for &mu in shifts.iter() {
            tridiag_shifted_qr_step(&mut self.diag, &mut self.offdiag, mu, &mut Q);
        }

        // V <- V*Q[:, 0..=k]
        let Vk = self.V.mul(&Q.left_cols(k + 1));
        self.V.data_mut()[..self.n * (k + 1)].copy_from(Vk.data());

        // f <- f*Q(ncv-1, k-1) + V[:, k]*H(k, k-1)
        let (qk, hk) = (Q[(ncv - 1, k - 1)], self.offdiag[k - 1]);
        self.f.axpby(hk, self.V.col_slice(k), qk);
        self.beta = b_norm(bop, &mut self.work, &self.f)?;
        self.k = k;

        self.factorize_from(op, bop, k, ncv)
    }

    /// Ritz vectors `V·Y` for Lanczos coefficients `Y`
    pub(crate) fn ritz_vectors(&self, Y: &Matrix<T>) -> Matrix<T> {
        self.V.mul_leading(Y, Y.nrows())
    }
}

// f <- f - V[:, 0..c.len()]*c
fn subtract_combination<T: FloatT>(f: &mut [T], V: &Matrix<T>, c: &[T]) {
    for (j, &cj) in c.iter().enumerate() {
        f.axpby(-cj, V.col_slice(j), T::one());
    }
}

// ⟨x,y⟩ = xᵀ(B*y)
fn b_dot<T, BOP>(bop: &BOP, work: &mut [T], x: &[T], y: &[T]) -> Result<T, EigsError>
where
    T: FloatT,
    BOP: MatProd<T>,
{
    bop.apply(y, work)?;
    Ok(x.dot(work))
}

fn b_norm<T, BOP>(bop: &BOP, work: &mut [T], x: &[T]) -> Result<T, EigsError>
where
    T: FloatT,
    BOP: MatProd<T>,
{
    Ok(T::sqrt(T::max(b_dot(bop, work, x, x)?, T::zero())))
}

// proj[j] = ⟨V[:,j], x⟩ for j < ncols
fn b_project<T, BOP>(
    bop: &BOP,
    work: &mut [T],
    V: &Matrix<T>,
    ncols: usize,
    x: &[T],
    proj: &mut [T],
) -> Result<(), EigsError>
where
    T: FloatT,
    BOP: MatProd<T>,
{
    bop.apply(x, work)?;
    for (j, p) in proj.iter_mut().take(ncols).enumerate() {
        *p = V.col_slice(j).dot(work);
    }
    Ok(())
}
