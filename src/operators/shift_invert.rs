use super::*;

/// Shift-and-invert operator `OP = (A - σB)⁻¹B`.
///
/// Composed from a [`ShiftSolve`] operator, whose shift must already be
/// set, and a [`MatProd`] operator for `B`.  Each application computes
/// `w = B*x` followed by `y = (A - σB)⁻¹w`, using a single work vector
/// allocated on construction.
///
/// Eigenvalues `ν` of `OP` relate to the eigenvalues `λ` of the pencil
/// `(A, B)` through `ν = 1/(λ - σ)`, with identical eigenvectors.
pub struct ShiftInvertOp<'a, T, S, B>
where
    T: FloatT,
    S: ShiftSolve<T>,
    B: MatProd<T>,
{
    solve: &'a mut S,
    mult: &'a B,
    work: Vec<T>,
}

impl<'a, T, S, B> ShiftInvertOp<'a, T, S, B>
where
    T: FloatT,
    S: ShiftSolve<T>,
    B: MatProd<T>,
{
    pub fn new(solve: &'a mut S, mult: &'a B) -> Result<Self, OperatorError> {
        if solve.dim() != mult.dim() {
            return Err(OperatorError::IncompatibleDimension {
                expected: solve.dim(),
                found: mult.dim(),
            });
        }
        let work = vec![T::zero(); mult.dim()];
        Ok(Self { solve, mult, work })
    }
}

impl<'a, T, S, B> LinearOperator<T> for ShiftInvertOp<'a, T, S, B>
where
    T: FloatT,
    S: ShiftSolve<T>,
    B: MatProd<T>,
{
    fn dim(&self) -> usize {
        self.work.len()
    }

    fn apply(&mut self, x: &[T], y: &mut [T]) -> Result<(), OperatorError> {
        self.mult.apply(x, &mut self.work)?;
        self.solve.apply(&self.work, y)
    }
}

#[cfg(test)]
mod test {
    #![allow(non_snake_case)]
    use super::*;
    use crate::algebra::{CscMatrix, VectorMath};

    #[test]
    fn test_shift_invert_apply() {
        let A = CscMatrix::from_diagonal(&[2., 3., 4., 5.]);
        let B = CscMatrix::from_diagonal(&[2., 2., 2., 2.]);
        let sigma = 0.5;

        let mut solve = SymShiftInvert::new(&A, &B, ShiftFactorizationMethod::Auto).unwrap();
        solve.set_shift(sigma).unwrap();
        let mult = SparseSymMatProd::new(&B).unwrap();

        let mut op = ShiftInvertOp::new(&mut solve, &mult).unwrap();
        assert_eq!(op.dim(), 4);

        let x = vec![1., 1., 1., 1.];
        let mut y = vec![0.; 4];
        op.apply(&x, &mut y).unwrap();

        // eigenvalues of the pencil are λ = 1, 1.5, 2, 2.5 so ν = 1/(λ - σ)
        let nu: Vec<f64> = [1.0, 1.5, 2.0, 2.5].iter().map(|l| 1.0 / (l - sigma)).collect();
        assert!(y.norm_inf_diff(&nu) < 1e-14);
    }

    #[test]
    fn test_shift_invert_failures_propagate() {
        let A = CscMatrix::from_diagonal(&[1., 2., 3.]);
        let B = CscMatrix::<f64>::identity(3);
        let mult = SparseSymMatProd::new(&B).unwrap();

        // shift never set
        let mut solve = SymShiftInvert::new(&A, &B, ShiftFactorizationMethod::Auto).unwrap();
        let mut op = ShiftInvertOp::new(&mut solve, &mult).unwrap();
        let mut y = vec![0.; 3];
        assert_eq!(
            op.apply(&[1., 1., 1.], &mut y),
            Err(OperatorError::ShiftNotSet)
        );

        // bad output length
        let mut y = vec![0.; 2];
        assert!(matches!(
            op.apply(&[1., 1., 1.], &mut y),
            Err(OperatorError::IncompatibleDimension { .. })
        ));

        // dimension mismatch on construction
        let B2 = CscMatrix::<f64>::identity(2);
        let mult2 = SparseSymMatProd::new(&B2).unwrap();
        let mut solve = SymShiftInvert::new(&A, &B, ShiftFactorizationMethod::Auto).unwrap();
        assert!(ShiftInvertOp::new(&mut solve, &mult2).is_err());
    }
}
