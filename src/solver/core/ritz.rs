use super::{EigsError, SortRule};
use crate::algebra::*;

/// Post-processing hook applied to converged Ritz values.
///
/// The iteration runs on a transformed operator whose spectrum is a
/// function of the spectrum of the problem the user actually posed.
/// Implementors map the user's sort rule into the transformed spectrum
/// and map the computed Ritz values back once iteration is complete.
pub trait RitzValueTransform<T: FloatT> {
    /// Rule used to select Ritz values while iterating on the
    /// transformed operator, given the rule requested by the user.
    fn selection_rule(&self, rule: SortRule<T>) -> SortRule<T> {
        rule
    }

    /// Overwrites Ritz values of the transformed operator with
    /// eigenvalues of the original problem, in place.
    fn transform(&self, values: &mut [T]);
}

/// The identity hook, for operators that are not transformed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTransform;

impl<T: FloatT> RitzValueTransform<T> for NoTransform {
    fn transform(&self, _values: &mut [T]) {}
}

/// Inverse of the shift-and-invert transform `ν = 1/(λ - σ)`.
///
/// Values are mapped back through `λ = 1/ν + σ` with no guard against
/// `ν = 0`, which produces an infinite `λ`.
#[derive(Debug, Clone, Copy)]
pub struct ShiftInvertTransform<T> {
    pub sigma: T,
}

impl<T: FloatT> RitzValueTransform<T> for ShiftInvertTransform<T> {
    fn selection_rule(&self, rule: SortRule<T>) -> SortRule<T> {
        match rule {
            // closest to σ means largest in magnitude after inversion
            SortRule::ClosestTo(t) if t == self.sigma => SortRule::LargestMagn,
            SortRule::ClosestTo(t) => SortRule::ClosestTo(T::recip(t - self.sigma)),
            _ => rule,
        }
    }

    fn transform(&self, values: &mut [T]) {
        values
            .iter_mut()
            .for_each(|ν| *ν = T::recip(*ν) + self.sigma);
    }
}

/// Ritz values, residual estimates and Ritz vectors of the current
/// Lanczos factorization.
///
/// `values` and `estimates` cover all `ncv` Ritz pairs, ordered by the
/// selection rule.  `vectors` holds the coefficients of the leading
/// `nev` Ritz vectors in the Lanczos basis.
#[derive(Debug, Clone)]
pub(crate) struct RitzPairs<T> {
    pub(crate) values: Vec<T>,
    pub(crate) estimates: Vec<T>,
    pub(crate) vectors: Matrix<T>,
    pub(crate) converged: Vec<bool>,
}

impl<T> RitzPairs<T>
where
    T: FloatT,
{
    pub(crate) fn new(nev: usize, ncv: usize) -> Self {
        Self {
            values: vec![T::zero(); ncv],
            estimates: vec![T::zero(); ncv],
            vectors: Matrix::zeros((ncv, nev)),
            converged: vec![false; nev],
        }
    }

    pub(crate) fn nev(&self) -> usize {
        self.converged.len()
    }

    pub(crate) fn ncv(&self) -> usize {
        self.values.len()
    }

    /// Ritz pairs of the tridiagonal matrix `(diag, offdiag)`, ordered by
    /// `selection`.
    pub(crate) fn retrieve(
        &mut self,
        diag: &[T],
        offdiag: &[T],
        selection: SortRule<T>,
    ) -> Result<(), EigsError> {
        let ncv = self.ncv();
        let nev = self.nev();
        let eig = SymTridiagEigen::new(diag, offdiag)?;

        let mut ind = selection.argsort(&eig.values);

        // alternate between the two ends of the spectrum
        if let SortRule::BothEnds = selection {
            let sorted = ind.clone();
            for (i, idx) in ind.iter_mut().enumerate() {
                *idx = match i % 2 {
                    0 => sorted[i / 2],
                    _ => sorted[ncv - 1 - i / 2],
                };
            }
        }

        for (i, &j) in ind.iter().enumerate() {
            self.values[i] = eig.values[j];
            self.estimates[i] = eig.vectors[(ncv - 1, j)];
        }
        for (i, &j) in ind.iter().take(nev).enumerate() {
            self.vectors
                .col_slice_mut(i)
                .copy_from(eig.vectors.col_slice(j));
        }
        Ok(())
    }

    /// Flags the leading `nev` Ritz pairs whose residual norm
    /// `|est|·‖f‖` is below `tol·max(ε^(2/3), |θ|)`, returning the count.
    pub(crate) fn num_converged(&mut self, tol: T, fnorm: T) -> usize {
        let eps23 = T::epsilon().powf((2.0 / 3.0).as_T());
        let nev = self.nev();
        for i in 0..nev {
            let thresh = tol * T::max(eps23, self.values[i].abs());
            let resid = self.estimates[i].abs() * fnorm;
            self.converged[i] = resid < thresh;
        }
        self.converged.iter().filter(|&&c| c).count()
    }

    /// Number of Ritz pairs to keep on restart, given `nconv` converged.
    pub(crate) fn nev_adjusted(&self, nconv: usize) -> usize {
        let nev = self.nev();
        let ncv = self.ncv();
        let near_0 = T::min_positive_value() * (10.0).as_T();

        // keep pairs with exactly zero residual as well
        let nzero = self.estimates[nev..]
            .iter()
            .filter(|e| e.abs() < near_0)
            .count();
        let mut nev_new = nev + nzero;

        nev_new += usize::min(nconv, (ncv - nev_new) / 2);
        if nev_new == 1 && ncv >= 6 {
            nev_new = ncv / 2;
        } else if nev_new == 1 && ncv > 2 {
            nev_new = 2;
        }

        usize::min(nev_new, ncv - 1)
    }

    /// Reorders the leading `nev` pairs under `sorting`, carrying Ritz
    /// vectors and convergence flags along.
    pub(crate) fn sort_leading(&mut self, sorting: SortRule<T>) {
        let nev = self.nev();
        let ind = sorting.argsort(&self.values[..nev]);

        let values: Vec<T> = ind.iter().map(|&i| self.values[i]).collect();
        let estimates: Vec<T> = ind.iter().map(|&i| self.estimates[i]).collect();
        let converged: Vec<bool> = ind.iter().map(|&i| self.converged[i]).collect();

        self.values[..nev].copy_from_slice(&values);
        self.estimates[..nev].copy_from_slice(&estimates);
        self.converged.copy_from_slice(&converged);
        self.vectors = self.vectors.select_columns(&ind);
    }

    /// Converged values in their current order
    pub(crate) fn converged_values(&self) -> Vec<T> {
        self.converged
            .iter()
            .zip(self.values.iter())
            .filter(|(&c, _)| c)
            .map(|(_, &v)| v)
            .collect()
    }

    /// Lanczos coefficients of the converged Ritz vectors, one per column
    pub(crate) fn converged_vectors(&self) -> Matrix<T> {
        let cols: Vec<usize> = (0..self.nev()).filter(|&i| self.converged[i]).collect();
        self.vectors.select_columns(&cols)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_shift_invert_transform() {
        let hook = ShiftInvertTransform { sigma: 2.5 };

        // ν = 1/(λ - σ) for λ = 2, 3, 5
        let lambda = [2.0, 3.0, 5.0];
        let mut values: Vec<f64> = lambda.iter().map(|l| 1.0 / (l - 2.5)).collect();
        hook.transform(&mut values);
        assert!(values.norm_inf_diff(&lambda) < 1e-14);

        // degenerate ν is not guarded
        let mut values = [0.0];
        hook.transform(&mut values);
        assert!(!values[0].is_finite());

        assert_eq!(
            hook.selection_rule(SortRule::ClosestTo(2.5)),
            SortRule::LargestMagn
        );
        assert_eq!(
            hook.selection_rule(SortRule::ClosestTo(3.0)),
            SortRule::ClosestTo(2.0)
        );
        assert_eq!(
            hook.selection_rule(SortRule::SmallestAlge),
            SortRule::SmallestAlge
        );
    }

    #[test]
    fn test_hook_then_resort() {
        // ν emitted in LargestMagn order for λ = {3, 2, 4.5, 0.5}, σ = 2.5
        let sigma = 2.5;
        let lambda = [3.0, 2.0, 4.5, 0.5];
        let mut ritz = RitzPairs::<f64>::new(4, 5);
        for (i, l) in lambda.iter().enumerate() {
            ritz.values[i] = 1.0 / (l - sigma);
            ritz.vectors[(i, i)] = 1.0;
        }
        ritz.converged = vec![true, true, false, true];

        let hook = ShiftInvertTransform { sigma };
        hook.transform(&mut ritz.values[..4]);
        ritz.sort_leading(SortRule::ClosestTo(sigma));

        // ascending |λ - σ|, ties in emission order
        assert_eq!(&ritz.values[..4], &[3.0, 2.0, 4.5, 0.5]);
        assert_eq!(ritz.converged_values(), vec![3.0, 2.0, 0.5]);

        // an emission order that does not match the final order
        ritz.sort_leading(SortRule::SmallestAlge);
        assert_eq!(&ritz.values[..4], &[0.5, 2.0, 3.0, 4.5]);
        assert_eq!(ritz.converged, vec![true, true, true, false]);
        // vectors follow their values
        assert_eq!(ritz.vectors[(3, 0)], 1.0);
        assert_eq!(ritz.vectors[(2, 3)], 1.0);

        ritz.sort_leading(SortRule::ClosestTo(sigma));
        let dist: Vec<f64> = ritz.values[..4].iter().map(|l| (l - sigma).abs()).collect();
        assert!(dist.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_retrieve_both_ends() {
        let diag = [1.0, 2.0, 3.0, 4.0];
        let offdiag = [0.0, 0.0, 0.0];
        let mut ritz = RitzPairs::<f64>::new(2, 4);
        ritz.retrieve(&diag, &offdiag, SortRule::BothEnds).unwrap();
        assert_eq!(ritz.values, vec![4.0, 1.0, 3.0, 2.0]);

        ritz.retrieve(&diag, &offdiag, SortRule::ClosestTo(2.2)).unwrap();
        assert_eq!(ritz.values, vec![2.0, 3.0, 1.0, 4.0]);
        // Ritz vectors of a diagonal matrix are unit vectors
        assert_eq!(ritz.vectors.col_slice(0)[1].abs(), 1.0);
    }

    #[test]
    fn test_convergence_and_restart_size() {
        let mut ritz = RitzPairs::<f64>::new(2, 8);
        ritz.values = vec![10.0, 5.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0];
        ritz.estimates = vec![1e-14, 1e-3, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5];

        assert_eq!(ritz.num_converged(1e-10, 1.0), 1);
        assert_eq!(ritz.converged, vec![true, false]);

        // 2 + min(1, 6/2)
        assert_eq!(ritz.nev_adjusted(1), 3);
        // 2 + min(5, 3)
        assert_eq!(ritz.nev_adjusted(5), 5);

        // nev = 1 special cases
        let mut ritz = RitzPairs::<f64>::new(1, 8);
        ritz.estimates.fill(1.0);
        assert_eq!(ritz.nev_adjusted(0), 4);
        let mut ritz = RitzPairs::<f64>::new(1, 3);
        ritz.estimates.fill(1.0);
        assert_eq!(ritz.nev_adjusted(0), 2);

        // exactly zero residual estimates are kept
        let mut ritz = RitzPairs::<f64>::new(2, 8);
        ritz.estimates.fill(1.0);
        ritz.estimates[2] = 0.0;
        assert_eq!(ritz.nev_adjusted(0), 3);
    }
}
