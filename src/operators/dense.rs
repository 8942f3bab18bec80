#![allow(non_snake_case)]

use super::*;
use crate::algebra::{Matrix, ShapedMatrix, SymMatrixVectorMultiply};

/// Product with a dense symmetric matrix held by reference.
///
/// The full matrix is stored and used as is.  Symmetry is not checked.
#[derive(Debug, Clone, Copy)]
pub struct DenseSymMatProd<'a, T> {
    mat: &'a Matrix<T>,
}

impl<'a, T> DenseSymMatProd<'a, T>
where
    T: FloatT,
{
    pub fn new(mat: &'a Matrix<T>) -> Result<Self, OperatorError> {
        if !mat.is_square() {
            return Err(OperatorError::IncompatibleDimension {
                expected: mat.nrows(),
                found: mat.ncols(),
            });
        }
        Ok(Self { mat })
    }
}

impl<'a, T> MatProd<T> for DenseSymMatProd<'a, T>
where
    T: FloatT,
{
    fn dim(&self) -> usize {
        self.mat.nrows()
    }

    fn apply(&self, x: &[T], y: &mut [T]) -> Result<(), OperatorError> {
        check_operand_dims(self.mat.nrows(), x, y)?;
        self.mat.symv(y, x, T::one(), T::zero());
        Ok(())
    }
}

// standard (non-generalized) problems iterate on the matrix itself
impl<'a, T> LinearOperator<T> for DenseSymMatProd<'a, T>
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
fn test_dense_matprod() {
    let M = Matrix::new_from_slice((2, 2), &[2., 1., 1., 3.]);
    let op = DenseSymMatProd::new(&M).unwrap();
    let mut y = vec![0.; 2];
    MatProd::apply(&op, &[1., 1.], &mut y).unwrap();
    assert_eq!(y, vec![3., 4.]);

    assert_eq!(
        MatProd::apply(&op, &[1., 1., 1.], &mut y),
        Err(OperatorError::IncompatibleDimension {
            expected: 2,
            found: 3
        })
    );

    let R = Matrix::<f64>::zeros((2, 3));
    assert!(DenseSymMatProd::new(&R).is_err());
}
