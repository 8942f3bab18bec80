#![allow(non_snake_case)]

use crate::algebra::{AsFloatT, DenseFactorizationError, FloatT, Matrix, ShapedMatrix};

/// LU factorization with partial pivoting, `P*A = L*U`.
///
/// L (unit lower) and U are stored packed in a single matrix.  A pivot
/// smaller than `n * eps * max|A|` in magnitude is treated as singular,
/// so an exactly singular shifted matrix is reported rather than
/// silently producing huge solution values.
#[derive(Debug, Clone)]
pub struct DenseLU<T> {
    lu: Matrix<T>,
    perm: Vec<usize>,
}

impl<T> DenseLU<T>
where
    T: FloatT,
{
    pub fn factor(A: &Matrix<T>) -> Result<Self, DenseFactorizationError> {
        if !A.is_square() {
            return Err(DenseFactorizationError::IncompatibleDimension);
        }
        let n = A.n;
        let mut lu = A.clone();
        let mut perm: Vec<usize> = (0..n).collect();

        let anorm = A.norm_inf();
        let thresh = T::epsilon() * anorm * n.as_T();

        for k in 0..n {
            // pivot search down column k
            let (p, pval) = (k..n)
                .map(|i| (i, lu[(i, k)].abs()))
                .fold((k, -T::one()), |acc, x| if x.1 > acc.1 { x } else { acc });

            if pval <= thresh || !pval.is_finite() {
                return Err(DenseFactorizationError::Singular(k));
            }

            if p != k {
                perm.swap(p, k);
                for j in 0..n {
                    let tmp = lu[(k, j)];
                    lu[(k, j)] = lu[(p, j)];
                    lu[(p, j)] = tmp;
                }
            }

            let ukk = lu[(k, k)];
            for i in (k + 1)..n {
                lu[(i, k)] /= ukk;
            }
            for j in (k + 1)..n {
                let ukj = lu[(k, j)];
                if ukj == T::zero() {
                    continue;
                }
                for i in (k + 1)..n {
                    let lik = lu[(i, k)];
                    lu[(i, j)] -= lik * ukj;
                }
            }
        }

        Ok(Self { lu, perm })
    }

    pub fn dim(&self) -> usize {
        self.lu.n
    }

    /// Solve `A*x = b`
    pub fn solve(&self, b: &[T], x: &mut [T]) {
        let n = self.dim();
        assert_eq!(b.len(), n);
        assert_eq!(x.len(), n);

        for (xi, &p) in x.iter_mut().zip(&self.perm) {
            *xi = b[p];
        }

        // forward substitution with unit L
        for j in 0..n {
            let xj = x[j];
            if xj != T::zero() {
                for i in (j + 1)..n {
                    x[i] -= self.lu[(i, j)] * xj;
                }
            }
        }

        // back substitution with U
        for j in (0..n).rev() {
            x[j] /= self.lu[(j, j)];
            let xj = x[j];
            for i in 0..j {
                x[i] -= self.lu[(i, j)] * xj;
            }
        }
    }
}

#[test]
fn test_dense_lu_solve() {
    use crate::algebra::VectorMath;

    // requires a row swap in the first column
    let A = Matrix::new_from_slice((3, 3), &[1., 4., 7., 2., 5., 8., 3., 6., 10.]);
    let lu = DenseLU::factor(&A).unwrap();

    let xtrue = vec![1., -2., 3.];
    let mut b = vec![0.; 3];
    A.gemv(&mut b, &xtrue, 1., 0.);

    let mut x = vec![0.; 3];
    lu.solve(&b, &mut x);
    assert!(x.norm_inf_diff(&xtrue) < 1e-12);
}

#[test]
fn test_dense_lu_singular() {
    let A = Matrix::new_from_slice((2, 2), &[1., 2., 2., 4.]);
    assert_eq!(
        DenseLU::factor(&A).err(),
        Some(DenseFactorizationError::Singular(1))
    );

    let Z = Matrix::<f64>::zeros((2, 2));
    assert_eq!(
        DenseLU::factor(&Z).err(),
        Some(DenseFactorizationError::Singular(0))
    );
}
