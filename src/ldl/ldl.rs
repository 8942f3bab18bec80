#![allow(non_snake_case)]
use crate::algebra::*;
use core::cmp::{max, min};
use derive_builder::Builder;
use std::iter::zip;
use thiserror::Error;

/// Error codes returnable from [`LdlFactorization`](LdlFactorization) operations

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LdlError {
    #[error("Matrix dimension fields are incompatible")]
    IncompatibleDimension,
    #[error("Matrix is not upper triangular")]
    NotUpperTriangular,
    #[error("Matrix factorization produced a zero pivot at column {0}")]
    ZeroPivot(usize),
    #[error("Invalid permutation vector")]
    InvalidPermutation,
    #[error("Fill reducing ordering failed: {0}")]
    Ordering(String),
}

/// Settings for [`LdlFactorization`](LdlFactorization)

#[derive(Builder, Debug, Clone)]
pub struct LdlSettings {
    /// scaling of the AMD dense row threshold
    #[builder(default = "1.0")]
    pub amd_dense_scale: f64,
    /// user supplied fill reducing ordering.  AMD is used if `None`
    #[builder(default = "None", setter(strip_option))]
    pub perm: Option<Vec<usize>>,
    /// pivots with |d| below `pivot_tol * max|A|` are treated as zero
    #[builder(default = "1e3")]
    pub pivot_tol_scale: f64,
}

impl Default for LdlSettings {
    fn default() -> LdlSettings {
        LdlSettingsBuilder::default().build().unwrap()
    }
}

/// $LDL^T$ factorization of a sparse symmetric matrix without pivoting.
///
/// The input holds the upper triangle only.  A fill reducing ordering
/// `P` is applied first, so that `P*A*P' = L*D*L'` with `L` unit lower
/// triangular.  Since no numerical pivoting is done the factorization
/// succeeds for any matrix whose leading principal minors (after
/// ordering) are nonsingular, which includes the indefinite shifted
/// pencils `A - σB` arising in shift-invert mode.
#[derive(Debug, Clone)]
pub struct LdlFactorization<T = f64> {
    // fill reducing permutation and its inverse
    perm: Vec<usize>,
    iperm: Vec<usize>,
    // strictly lower triangular factor
    L: CscMatrix<T>,
    D: Vec<T>,
    // permuted solve workspace
    work: Vec<T>,
}

impl<T> LdlFactorization<T>
where
    T: FloatT,
{
    pub fn new(A: &CscMatrix<T>, opts: Option<LdlSettings>) -> Result<Self, LdlError> {
        check_structure(A)?;
        let opts = opts.unwrap_or_default();
        let n = A.n;

        let (perm, iperm) = match opts.perm {
            Some(perm) => {
                let iperm = invperm(&perm)?;
                (perm, iperm)
            }
            None => amd_ordering(A, opts.amd_dense_scale)?,
        };

        let PAPt = permute_symmetric(A, &iperm);
        let symbolic = Symbolic::new(&PAPt);

        let mut L = CscMatrix::spalloc(n, n, symbolic.colptr[n]);
        L.colptr.copy_from_slice(&symbolic.colptr);
        let mut D = vec![T::zero(); n];

        let anorm = A.nzval.norm_inf();
        let thresh = T::epsilon() * anorm * opts.pivot_tol_scale.as_T();
        numeric(&PAPt, &symbolic, &mut L, &mut D, thresh)?;

        Ok(Self {
            perm,
            iperm,
            L,
            D,
            work: vec![T::zero(); n],
        })
    }

    pub fn dim(&self) -> usize {
        self.D.len()
    }

    /// number of nonzeros in the strictly lower factor
    pub fn nnz_L(&self) -> usize {
        self.L.nnz()
    }

    /// fill reducing permutation applied before factoring
    pub fn perm(&self) -> &[usize] {
        &self.perm
    }

    /// Number of (positive, negative) entries in `D`.
    ///
    /// By Sylvester's law this is also the inertia of the factored matrix.
    pub fn inertia(&self) -> (usize, usize) {
        let npos = self.D.iter().filter(|&&d| d > T::zero()).count();
        (npos, self.dim() - npos)
    }

    /// Solves `A*x = b` in place (x replaces b)
    pub fn solve(&mut self, b: &mut [T]) {
        assert_eq!(b.len(), self.dim());

        let x = &mut self.work;
        zip(x.iter_mut(), &self.perm).for_each(|(x, &p)| *x = b[p]);

        lsolve(&self.L, x);
        zip(x.iter_mut(), &self.D).for_each(|(x, &d)| *x /= d);
        ltsolve(&self.L, x);

        zip(&self.perm, x.iter()).for_each(|(&p, &x)| b[p] = x);
    }

    // exposed for testing only
    #[allow(dead_code)]
    pub(crate) fn iperm(&self) -> &[usize] {
        &self.iperm
    }
}

fn check_structure<T: FloatT>(A: &CscMatrix<T>) -> Result<(), LdlError> {
    if !A.is_square() || A.check_format().is_err() {
        return Err(LdlError::IncompatibleDimension);
    }
    if !A.is_triu() {
        return Err(LdlError::NotUpperTriangular);
    }
    Ok(())
}

// elimination tree and column counts of L
struct Symbolic {
    parent: Vec<Option<usize>>,
    colptr: Vec<usize>,
}

impl Symbolic {
    fn new<T: FloatT>(A: &CscMatrix<T>) -> Self {
        let n = A.n;
        let mut parent = vec![None; n];
        let mut flag = vec![0; n];
        let mut lnz = vec![0; n];

        for k in 0..n {
            flag[k] = k;
            for &row in &A.rowval[A.colptr[k]..A.colptr[k + 1]] {
                // walk up the tree from each entry above the diagonal
                let mut i = row;
                while i < k && flag[i] != k {
                    if parent[i].is_none() {
                        parent[i] = Some(k);
                    }
                    lnz[i] += 1;
                    flag[i] = k;
                    i = parent[i].unwrap_or(k);
                }
            }
        }

        let mut colptr = vec![0; n + 1];
        for k in 0..n {
            colptr[k + 1] = colptr[k] + lnz[k];
        }
        Self { parent, colptr }
    }
}

// Up-looking numeric factorization.  Row k of L is found by a sparse
// triangular solve whose pattern is the union of the tree paths from
// each entry of column k of A.
fn numeric<T: FloatT>(
    A: &CscMatrix<T>,
    sym: &Symbolic,
    L: &mut CscMatrix<T>,
    D: &mut [T],
    thresh: T,
) -> Result<(), LdlError> {
    let n = A.n;
    let mut y = vec![T::zero(); n];
    let mut flag = vec![usize::MAX; n];
    let mut pattern = vec![0; n];
    let mut lnz = vec![0; n];

    for k in 0..n {
        y[k] = T::zero();
        flag[k] = k;
        let mut top = n;

        for ptr in A.colptr[k]..A.colptr[k + 1] {
            let mut i = A.rowval[ptr];
            y[i] += A.nzval[ptr];

            let mut len = 0;
            while flag[i] != k {
                pattern[len] = i;
                len += 1;
                flag[i] = k;
                i = sym.parent[i].unwrap_or(k);
            }
            while len > 0 {
                top -= 1;
                len -= 1;
                pattern[top] = pattern[len];
            }
        }

        D[k] = y[k];
        y[k] = T::zero();

        for &i in &pattern[top..n] {
            let yi = y[i];
            y[i] = T::zero();

            let first = L.colptr[i];
            let last = first + lnz[i];
            for p in first..last {
                y[L.rowval[p]] -= L.nzval[p] * yi;
            }

            let lki = yi / D[i];
            D[k] -= lki * yi;
            L.rowval[last] = k;
            L.nzval[last] = lki;
            lnz[i] += 1;
        }

        if D[k].abs() <= thresh || !D[k].is_finite() {
            return Err(LdlError::ZeroPivot(k));
        }
    }
    Ok(())
}

// Solves (I+L)x = b in place
fn lsolve<T: FloatT>(L: &CscMatrix<T>, x: &mut [T]) {
    for j in 0..x.len() {
        let xj = x[j];
        let rng = L.colptr[j]..L.colptr[j + 1];
        for (&i, &lij) in zip(&L.rowval[rng.clone()], &L.nzval[rng]) {
            x[i] -= lij * xj;
        }
    }
}

// Solves (I+L)'x = b in place
fn ltsolve<T: FloatT>(L: &CscMatrix<T>, x: &mut [T]) {
    for j in (0..x.len()).rev() {
        let rng = L.colptr[j]..L.colptr[j + 1];
        let s = zip(&L.rowval[rng.clone()], &L.nzval[rng])
            .fold(T::zero(), |acc, (&i, &lij)| acc + lij * x[i]);
        x[j] -= s;
    }
}

// Construct an inverse permutation from a permutation
pub(crate) fn invperm(p: &[usize]) -> Result<Vec<usize>, LdlError> {
    let n = p.len();
    let mut b = vec![usize::MAX; n];

    for (i, &j) in p.iter().enumerate() {
        if j >= n || b[j] != usize::MAX {
            return Err(LdlError::InvalidPermutation);
        }
        b[j] = i;
    }
    Ok(b)
}

// Upper triangle of P*A*P' from the upper triangle of A.  Row
// indices within each output column are not sorted.
pub(crate) fn permute_symmetric<T: FloatT>(A: &CscMatrix<T>, iperm: &[usize]) -> CscMatrix<T> {
    let n = A.n;
    let mut counts = vec![0; n];

    for colA in 0..n {
        for &rowA in &A.rowval[A.colptr[colA]..A.colptr[colA + 1]] {
            counts[max(iperm[rowA], iperm[colA])] += 1;
        }
    }

    let mut P = CscMatrix::spalloc(n, n, A.nnz());
    for k in 0..n {
        P.colptr[k + 1] = P.colptr[k] + counts[k];
    }
    let mut next = P.colptr[0..n].to_vec();

    for colA in 0..n {
        for ptr in A.colptr[colA]..A.colptr[colA + 1] {
            let (r, c) = (iperm[A.rowval[ptr]], iperm[colA]);
            let col = max(r, c);
            P.rowval[next[col]] = min(r, c);
            P.nzval[next[col]] = A.nzval[ptr];
            next[col] += 1;
        }
    }
    P
}

fn amd_ordering<T: FloatT>(
    A: &CscMatrix<T>,
    amd_dense_scale: f64,
) -> Result<(Vec<usize>, Vec<usize>), LdlError> {
    let mut control = amd::Control::default();
    control.dense *= amd_dense_scale;
    let (perm, iperm, _info) = amd::order(A.n, &A.colptr, &A.rowval, &control)
        .map_err(|e| LdlError::Ordering(format!("{:?}", e)))?;
    Ok((perm, iperm))
}

//configure tests of internals
#[path = "test.rs"]
#[cfg(test)]
mod test;
