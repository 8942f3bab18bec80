use super::{FloatT, VectorMath};
use itertools::izip;
use std::iter::zip;

impl<T: FloatT> VectorMath for [T] {
    type T = T;
    fn copy_from(&mut self, src: &[T]) -> &mut Self {
        self.copy_from_slice(src);
        self
    }

    fn set(&mut self, c: T) -> &mut Self {
        self.fill(c);
        self
    }

    fn scale(&mut self, c: T) -> &mut Self {
        self.iter_mut().for_each(|x| *x *= c);
        self
    }

    fn negate(&mut self) -> &mut Self {
        self.iter_mut().for_each(|x| *x = -*x);
        self
    }

    fn normalize(&mut self) -> T {
        let norm = self.norm();
        if norm == T::zero() {
            return T::zero();
        }
        self.scale(norm.recip());
        norm
    }

    fn dot(&self, y: &[T]) -> T {
        assert_eq!(self.len(), y.len());
        accumulate_pairwise(zip(self, y), |(&x, &y)| x * y)
    }

    fn dist(&self, y: &Self) -> T {
        assert_eq!(self.len(), y.len());
        let dist2 = accumulate_pairwise(zip(self, y), |(&x, &y)| T::powi(x - y, 2));
        T::sqrt(dist2)
    }

    fn sumsq(&self) -> T {
        self.dot(self)
    }

    fn norm(&self) -> T {
        T::sqrt(self.sumsq())
    }

    fn norm_inf(&self) -> T {
        let mut out = T::zero();
        for v in self.iter().map(|v| v.abs()) {
            if v.is_nan() {
                return T::nan();
            }
            out = if v > out { v } else { out };
        }
        out
    }

    // max absolute difference (used for unit testing)
    fn norm_inf_diff(&self, b: &[T]) -> T {
        zip(self, b).fold(T::zero(), |acc, (x, y)| T::max(acc, T::abs(*x - *y)))
    }

    fn axpby(&mut self, a: T, x: &[T], b: T) -> &mut Self {
        assert_eq!(self.len(), x.len());

        zip(&mut *self, x).for_each(|(y, x)| *y = a * (*x) + b * (*y));
        self
    }

    fn waxpby(&mut self, a: T, x: &[T], b: T, y: &[T]) -> &mut Self {
        assert_eq!(self.len(), x.len());
        assert_eq!(self.len(), y.len());

        for (w, x, y) in izip!(&mut *self, x, y) {
            *w = a * (*x) + b * (*y);
        }
        self
    }
}

// ---------------------------------------------------------------------
// pairwise accumulation for sums and dot products.  Keeps the rounding
// error of long Lanczos inner products at O(log n) rather than O(n)

fn accumulate_pairwise<T, I, A, F>(x: I, op: F) -> T
where
    T: FloatT,
    I: IntoIterator<Item = A> + Clone,
    I::IntoIter: ExactSizeIterator,
    F: Fn(A) -> T,
{
    const BASE_CASE_DIM: usize = 32;

    let n = x.clone().into_iter().len();
    return if n == 0 {
        T::zero()
    } else {
        inner(x, &op, 0, n)
    };

    fn inner<T, I, A, F>(x: I, op: &F, i1: usize, n: usize) -> T
    where
        T: FloatT,
        I: IntoIterator<Item = A> + Clone,
        I::IntoIter: ExactSizeIterator,
        F: Fn(A) -> T,
    {
        if n < BASE_CASE_DIM {
            x.into_iter()
                .skip(i1)
                .take(n)
                .fold(T::zero(), |acc, x| acc + op(x))
        } else {
            let n2 = n / 2;
            inner(x.clone(), op, i1, n2) + inner(x, op, i1 + n2, n - n2)
        }
    }
}

#[test]
fn test_dot_product() {
    let x = vec![1., 2., 3., 4.];
    let y = vec![4., 5., 6., 7.];
    assert_eq!(x.dot(&y), 60.);
}

#[test]
fn test_pairwise_dot_long() {
    // long enough to exercise the recursive branch
    let n = 1000usize;
    let x: Vec<f64> = (0..n).map(|i| (i % 7) as f64).collect();
    let y = vec![2.0; n];
    let naive: f64 = x.iter().map(|v| 2.0 * v).sum();
    assert_eq!(x.dot(&y), naive);
}

#[test]
fn test_axpby_normalize() {
    let mut y = vec![1., 1., 1., 1.];
    let x = vec![1., 2., 3., 4.];
    y.axpby(2.0, &x, -1.0);
    assert_eq!(y, vec![1., 3., 5., 7.]);

    let mut v = vec![3., 0., 4.];
    let nrm = v.normalize();
    assert_eq!(nrm, 5.);
    assert!(v.norm_inf_diff(&[0.6, 0., 0.8]) < 1e-15);

    let mut z = vec![0.0; 3];
    assert_eq!(z.normalize(), 0.0);
}
