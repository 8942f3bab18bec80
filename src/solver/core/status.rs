use crate::algebra::FloatT;
use std::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Status of the iterative eigensolver
#[repr(u32)]
#[derive(PartialEq, Eq, Clone, Debug, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EigsStatus {
    /// Problem is not solved (solver hasn't run).
    Unsolved,
    /// Restarted iteration is in progress.
    Converging,
    /// All requested eigenpairs converged.
    Converged,
    /// Iteration limit reached before all requested eigenpairs converged.
    MaxIterations,
    /// An operator or factorization failed during iteration.
    NumericalError,
}

impl EigsStatus {
    pub(crate) fn is_errored(&self) -> bool {
        matches!(*self, EigsStatus::NumericalError)
    }
}

impl std::fmt::Display for EigsStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Default for EigsStatus {
    fn default() -> Self {
        Self::Unsolved
    }
}

/// Ordering rule for selecting and sorting eigenvalues.
#[derive(PartialEq, Clone, Debug, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SortRule<T> {
    /// decreasing absolute value
    LargestMagn,
    /// decreasing algebraic value
    LargestAlge,
    /// increasing absolute value
    SmallestMagn,
    /// increasing algebraic value
    SmallestAlge,
    /// alternately from the high and low end of the spectrum.  Sorts
    /// final results as `LargestAlge`.
    BothEnds,
    /// increasing distance to a target value
    ClosestTo(T),
}

impl<T> Default for SortRule<T> {
    fn default() -> Self {
        Self::LargestMagn
    }
}

impl<T> std::fmt::Display for SortRule<T>
where
    T: FloatT,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            SortRule::ClosestTo(t) => write!(f, "ClosestTo({:.4e})", t),
            _ => write!(f, "{:?}", self),
        }
    }
}

impl<T> SortRule<T>
where
    T: FloatT,
{
    /// Indices that order `values` under this rule.  Ties keep their
    /// original relative order.  `BothEnds` orders as `LargestAlge`.
    pub fn argsort(&self, values: &[T]) -> Vec<usize> {
        let mut idx: Vec<usize> = (0..values.len()).collect();

        let key = |x: T| -> T {
            match *self {
                SortRule::LargestMagn => -x.abs(),
                SortRule::LargestAlge | SortRule::BothEnds => -x,
                SortRule::SmallestMagn => x.abs(),
                SortRule::SmallestAlge => x,
                SortRule::ClosestTo(t) => (x - t).abs(),
            }
        };

        idx.sort_by(|&i, &j| {
            key(values[i])
                .partial_cmp(&key(values[j]))
                .unwrap_or(Ordering::Equal)
        });
        idx
    }
}

#[test]
fn test_sortrule_argsort() {
    let v = [1.0, -4.0, 3.0, -2.0];

    assert_eq!(SortRule::LargestMagn.argsort(&v), vec![1, 2, 3, 0]);
    assert_eq!(SortRule::LargestAlge.argsort(&v), vec![2, 0, 3, 1]);
    assert_eq!(SortRule::SmallestMagn.argsort(&v), vec![0, 3, 2, 1]);
    assert_eq!(SortRule::SmallestAlge.argsort(&v), vec![1, 3, 0, 2]);
    assert_eq!(SortRule::BothEnds.argsort(&v), vec![2, 0, 3, 1]);
    assert_eq!(SortRule::ClosestTo(2.5).argsort(&v), vec![2, 0, 3, 1]);

    // ties are stable
    let w = [1.0, -1.0, 1.0];
    assert_eq!(SortRule::LargestMagn.argsort(&w), vec![0, 1, 2]);
}

#[test]
fn test_status_display() {
    assert_eq!(EigsStatus::default(), EigsStatus::Unsolved);
    assert_eq!(format!("{}", EigsStatus::MaxIterations), "MaxIterations");
    assert_eq!(
        format!("{}", SortRule::<f64>::SmallestAlge),
        "SmallestAlge"
    );
}
