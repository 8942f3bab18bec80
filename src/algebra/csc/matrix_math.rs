#![allow(non_snake_case)]

use crate::algebra::{
    CscMatrix, FloatT, ShapedMatrix, SparseFormatError, SymMatrixVectorMultiply, VectorMath,
};
use std::iter::zip;

impl<T: FloatT> SymMatrixVectorMultiply for CscMatrix<T> {
    type T = T;

    // NB: only the upper triangle is stored, so every off
    // diagonal entry contributes to two rows of the output
    fn symv(&self, y: &mut [T], x: &[T], a: T, b: T) {
        assert!(x.len() == self.n);
        assert!(y.len() == self.n);
        assert!(self.n == self.m);

        y.scale(b);

        for (col, &xcol) in x.iter().enumerate() {
            let first = self.colptr[col];
            let last = self.colptr[col + 1];
            let rows = &self.rowval[first..last];
            let nzvals = &self.nzval[first..last];

            for (&row, &Aij) in zip(rows, nzvals) {
                y[row] += a * Aij * xcol;

                if row != col {
                    //don't double up on the diagonal
                    y[col] += a * Aij * x[row];
                }
            }
        }
    }
}

impl<T: FloatT> CscMatrix<T> {
    /// Returns `self - s * B` as a new matrix whose sparsity pattern is
    /// the union of the patterns of both operands.
    ///
    /// Both operands must have the same dimensions and row indices sorted
    /// within each column.  Entries cancelling to zero are kept as
    /// structural nonzeros.
    pub fn sub_scaled(&self, s: T, B: &CscMatrix<T>) -> Result<CscMatrix<T>, SparseFormatError> {
        if self.size() != B.size() {
            return Err(SparseFormatError::IncompatibleDimension);
        }

        let n = self.n;
        let mut colptr = Vec::with_capacity(n + 1);
        let mut rowval = Vec::with_capacity(self.nnz() + B.nnz());
        let mut nzval = Vec::with_capacity(self.nnz() + B.nnz());
        colptr.push(0);

        for col in 0..n {
            let (mut pa, enda) = (self.colptr[col], self.colptr[col + 1]);
            let (mut pb, endb) = (B.colptr[col], B.colptr[col + 1]);

            // two-way merge of the sorted row lists
            while pa < enda || pb < endb {
                let ra = if pa < enda { self.rowval[pa] } else { usize::MAX };
                let rb = if pb < endb { B.rowval[pb] } else { usize::MAX };

                if ra < rb {
                    rowval.push(ra);
                    nzval.push(self.nzval[pa]);
                    pa += 1;
                } else if rb < ra {
                    rowval.push(rb);
                    nzval.push(-s * B.nzval[pb]);
                    pb += 1;
                } else {
                    rowval.push(ra);
                    nzval.push(self.nzval[pa] - s * B.nzval[pb]);
                    pa += 1;
                    pb += 1;
                }
            }
            colptr.push(rowval.len());
        }

        Ok(CscMatrix::new(self.m, n, colptr, rowval, nzval))
    }
}

#[test]
fn test_csc_symv_triu() {
    // upper triangle of
    // [4 1 0]
    // [1 4 1]
    // [0 1 4]
    let A = CscMatrix::tridiagonal_triu(&[4., 4., 4.], &[1., 1.]);
    let x = vec![1., 2., 3.];
    let mut y = vec![1., 1., 1.];
    A.symv(&mut y, &x, 1.0, 2.0);
    assert_eq!(y, vec![8., 14., 16.]);
}

#[test]
fn test_csc_sub_scaled() {
    // A = diag(1,2,3) + offdiag at (0,2), B = tridiag(2,-1)
    let A = CscMatrix::new(
        3,
        3,
        vec![0, 1, 2, 4],
        vec![0, 1, 0, 2],
        vec![1., 2., 5., 3.],
    );
    let B = CscMatrix::tridiagonal_triu(&[2., 2., 2.], &[-1., -1.]);

    let C = A.sub_scaled(0.5, &B).unwrap();
    assert!(C.check_symmetric_triu().is_ok());
    assert_eq!(C.nnz(), 6);
    assert_eq!(C.get_entry((0, 0)), Some(0.));
    assert_eq!(C.get_entry((0, 1)), Some(0.5));
    assert_eq!(C.get_entry((1, 1)), Some(1.));
    assert_eq!(C.get_entry((0, 2)), Some(5.));
    assert_eq!(C.get_entry((1, 2)), Some(0.5));
    assert_eq!(C.get_entry((2, 2)), Some(2.));

    let D = CscMatrix::<f64>::identity(2);
    assert_eq!(
        A.sub_scaled(1.0, &D),
        Err(SparseFormatError::IncompatibleDimension)
    );
}
