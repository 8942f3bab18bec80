#![allow(non_snake_case)]

use super::*;
use crate::algebra::{CscMatrix, SymMatrixVectorMultiply};

/// Product with a sparse symmetric matrix held by reference.
///
/// The matrix must hold the upper triangle only.
#[derive(Debug, Clone, Copy)]
pub struct SparseSymMatProd<'a, T> {
    mat: &'a CscMatrix<T>,
}

impl<'a, T> SparseSymMatProd<'a, T>
where
    T: FloatT,
{
    pub fn new(mat: &'a CscMatrix<T>) -> Result<Self, OperatorError> {
        mat.check_symmetric_triu()?;
        Ok(Self { mat })
    }
}

impl<'a, T> MatProd<T> for SparseSymMatProd<'a, T>
where
    T: FloatT,
{
    fn dim(&self) -> usize {
        self.mat.n
    }

    fn apply(&self, x: &[T], y: &mut [T]) -> Result<(), OperatorError> {
        check_operand_dims(self.mat.n, x, y)?;
        self.mat.symv(y, x, T::one(), T::zero());
        Ok(())
    }
}

impl<'a, T> LinearOperator<T> for SparseSymMatProd<'a, T>
where
    T: FloatT,
{
    fn dim(&self) -> usize {
        MatProd::dim(self)
    }

    fn apply(&mut self, x: &[T], y: &mut [T]) -> Result<(), OperatorError> {
        MatProd::apply(self, x, y)
    }
}

#[test]
fn test_sparse_matprod() {
    let M = CscMatrix::tridiagonal_triu(&[2., 2., 2.], &[-1., -1.]);
    let op = SparseSymMatProd::new(&M).unwrap();
    let mut y = vec![0.; 3];
    MatProd::apply(&op, &[1., 2., 3.], &mut y).unwrap();
    assert_eq!(y, vec![0., 0., 4.]);

    // full (not triangular) storage is rejected
    let F = CscMatrix::new(2, 2, vec![0, 2, 4], vec![0, 1, 0, 1], vec![1., 2., 2., 1.]);
    assert_eq!(
        SparseSymMatProd::new(&F).err(),
        Some(OperatorError::Format(
            crate::algebra::SparseFormatError::NotUpperTriangular
        ))
    );
}
