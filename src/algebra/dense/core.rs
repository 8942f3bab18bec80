#![allow(non_snake_case)]

use crate::algebra::{
    CscMatrix, FloatT, ShapedMatrix, SparseFormatError, SymMatrixVectorMultiply, VectorMath,
};
use std::ops::{Index, IndexMut};

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Dense matrix in column major format
///
/// __Example usage__ : To construct the 3 x 3 matrix
/// ```text
/// A = [1.  3.  5.]
///     [2.  0.  6.]
///     [0.  4.  7.]
/// ```
///
/// ```no_run
/// use geigs::algebra::Matrix;
///
/// let A : Matrix<f64> = Matrix::new_from_slice(
///    (3, 3),
///    &[1., 2., 0., 3., 0., 4., 5., 6., 7.],
///  );
///
/// assert_eq!(A[(1, 2)], 6.);
/// ```
///
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
pub struct Matrix<T = f64> {
    /// number of rows
    pub m: usize,
    /// number of columns
    pub n: usize,
    /// vector of data in column major format
    pub data: Vec<T>,
}

impl<T> Matrix<T>
where
    T: FloatT,
{
    pub fn zeros(size: (usize, usize)) -> Self {
        let (m, n) = size;
        let data = vec![T::zero(); m * n];
        Self { m, n, data }
    }

    pub fn identity(n: usize) -> Self {
        let mut mat = Matrix::zeros((n, n));
        for i in 0..n {
            mat[(i, i)] = T::one();
        }
        mat
    }

    pub fn from_diagonal(d: &[T]) -> Self {
        let mut mat = Matrix::zeros((d.len(), d.len()));
        for (i, &di) in d.iter().enumerate() {
            mat[(i, i)] = di;
        }
        mat
    }

    /// # Panics
    /// Panics if `src.len() != m * n`.
    pub fn new_from_slice(size: (usize, usize), src: &[T]) -> Self {
        let (m, n) = size;
        assert!(m * n == src.len());
        Self {
            m,
            n,
            data: src.to_vec(),
        }
    }

    /// Expands the upper triangle of a symmetric sparse matrix into
    /// full dense storage.
    pub fn from_csc_sym(A: &CscMatrix<T>) -> Result<Self, SparseFormatError> {
        A.check_symmetric_triu()?;
        let mut mat = Matrix::zeros((A.n, A.n));
        for col in 0..A.n {
            for ptr in A.colptr[col]..A.colptr[col + 1] {
                let row = A.rowval[ptr];
                mat[(row, col)] = A.nzval[ptr];
                mat[(col, row)] = A.nzval[ptr];
            }
        }
        Ok(mat)
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn col_slice(&self, col: usize) -> &[T] {
        assert!(col < self.n);
        &self.data[(col * self.m)..(col + 1) * self.m]
    }

    pub fn col_slice_mut(&mut self, col: usize) -> &mut [T] {
        assert!(col < self.n);
        &mut self.data[(col * self.m)..(col + 1) * self.m]
    }

    /// Copy of the leading `ncols` columns
    pub fn left_cols(&self, ncols: usize) -> Self {
        assert!(ncols <= self.n);
        Self::new_from_slice((self.m, ncols), &self.data[0..self.m * ncols])
    }

    /// Largest absolute entry
    pub fn norm_inf(&self) -> T {
        self.data.norm_inf()
    }

    /// True if the matrix is symmetric within `tol` entrywise
    pub fn is_symmetric(&self, tol: T) -> bool {
        self.is_square()
            && (0..self.n).all(|c| (0..c).all(|r| T::abs(self[(r, c)] - self[(c, r)]) <= tol))
    }

    /// General matrix-vector product.  Produces `y = a*M*x + b*y`
    pub fn gemv(&self, y: &mut [T], x: &[T], a: T, b: T) {
        assert_eq!(x.len(), self.n);
        assert_eq!(y.len(), self.m);

        y.scale(b);
        for (col, &xc) in x.iter().enumerate() {
            y.axpby(a * xc, self.col_slice(col), T::one());
        }
    }

    /// Matrix product `self * B` using only the leading `k` columns of self
    /// and leading `k` rows of B.
    ///
    /// # Panics
    /// Panics if `k` exceeds either inner dimension.
    pub fn mul_leading(&self, B: &Matrix<T>, k: usize) -> Matrix<T> {
        assert!(k <= self.n && k <= B.m);
        let mut C = Matrix::zeros((self.m, B.n));
        for j in 0..B.n {
            let ccol = C.col_slice_mut(j);
            for i in 0..k {
                let bij = B[(i, j)];
                if bij != T::zero() {
                    ccol.axpby(bij, self.col_slice(i), T::one());
                }
            }
        }
        C
    }

    /// Matrix product `self * B`
    pub fn mul(&self, B: &Matrix<T>) -> Matrix<T> {
        assert_eq!(self.n, B.m);
        self.mul_leading(B, self.n)
    }

    /// Permute columns so that column `i` of the output is column
    /// `perm[i]` of the input.
    pub fn select_columns(&self, perm: &[usize]) -> Self {
        let mut out = Matrix::zeros((self.m, perm.len()));
        for (i, &p) in perm.iter().enumerate() {
            out.col_slice_mut(i).copy_from(self.col_slice(p));
        }
        out
    }

    #[inline]
    fn index_linear(&self, idx: (usize, usize)) -> usize {
        idx.0 + self.m * idx.1
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T>
where
    T: FloatT,
{
    fn index_mut(&mut self, idx: (usize, usize)) -> &mut Self::Output {
        let lidx = self.index_linear(idx);
        &mut self.data[lidx]
    }
}

impl<T> Index<(usize, usize)> for Matrix<T>
where
    T: FloatT,
{
    type Output = T;
    fn index(&self, idx: (usize, usize)) -> &Self::Output {
        &self.data[self.index_linear(idx)]
    }
}

impl<T> ShapedMatrix for Matrix<T> {
    fn nrows(&self) -> usize {
        self.m
    }
    fn ncols(&self) -> usize {
        self.n
    }
}

impl<T: FloatT> SymMatrixVectorMultiply for Matrix<T> {
    type T = T;
    // full storage, so symv is just gemv
    fn symv(&self, y: &mut [T], x: &[T], a: T, b: T) {
        self.gemv(y, x, a, b);
    }
}

#[test]
fn test_matrix_products() {
    let A = Matrix::new_from_slice((2, 3), &[1., 4., 2., 5., 3., 6.]);
    let x = vec![1., 1., 1.];
    let mut y = vec![1., 1.];
    A.gemv(&mut y, &x, 1., -1.);
    assert_eq!(y, vec![5., 14.]);

    let B = Matrix::new_from_slice((3, 2), &[1., 0., 0., 0., 0., 1.]);
    let C = A.mul(&B);
    assert_eq!(C.data, vec![1., 4., 3., 6.]);

    let P = A.select_columns(&[2, 0]);
    assert_eq!(P.data, vec![3., 6., 1., 4.]);
}

#[test]
fn test_matrix_from_csc_sym() {
    let S = CscMatrix::tridiagonal_triu(&[2., 3.], &[-1.]);
    let M = Matrix::from_csc_sym(&S).unwrap();
    assert_eq!(M.data, vec![2., -1., -1., 3.]);
    assert!(M.is_symmetric(0.0));
}
