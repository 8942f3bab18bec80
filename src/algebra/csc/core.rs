#![allow(non_snake_case)]

use crate::algebra::{FloatT, ShapedMatrix, SparseFormatError};

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Sparse matrix in standard Compressed Sparse Column (CSC) format
///
/// Symmetric matrices passed to the eigensolver are stored by their upper
/// triangle only.
///
/// __Example usage__ : To construct the upper triangle of the 3 x 3 matrix
/// ```text
/// A = [4.  1.  0.]
///     [1.  4.  1.]
///     [0.  1.  4.]
/// ```
///
/// ```no_run
/// use geigs::algebra::CscMatrix;
///
/// let A : CscMatrix<f64> = CscMatrix::new(
///    3,                            // m
///    3,                            // n
///    vec![0, 1, 3, 5],             //colptr
///    vec![0, 0, 1, 1, 2],          //rowval
///    vec![4., 1., 4., 1., 4.],     //nzval
///  );
///
/// // optional correctness check
/// assert!(A.check_format().is_ok());
/// assert!(A.is_triu());
///
/// ```
///

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
pub struct CscMatrix<T = f64> {
    /// number of rows
    pub m: usize,
    /// number of columns
    pub n: usize,
    /// CSC format column pointer.
    ///
    /// Ths field should have length `n+1`. The last entry corresponds
    /// to the the number of nonzeros and should agree with the lengths
    /// of the `rowval` and `nzval` fields.
    pub colptr: Vec<usize>,
    /// vector of row indices
    pub rowval: Vec<usize>,
    /// vector of non-zero matrix elements
    pub nzval: Vec<T>,
}

impl<T> CscMatrix<T>
where
    T: FloatT,
{
    /// `CscMatrix` constructor.
    ///
    /// # Panics
    /// Makes rudimentary dimensional compatibility checks and panics on
    /// failure.  Row ordering and bounds are not checked here; use
    /// [`check_format`](CscMatrix::check_format) for that.
    ///
    pub fn new(m: usize, n: usize, colptr: Vec<usize>, rowval: Vec<usize>, nzval: Vec<T>) -> Self {
        assert_eq!(rowval.len(), nzval.len());
        assert_eq!(colptr.len(), n + 1);
        assert_eq!(colptr[n], rowval.len());
        CscMatrix {
            m,
            n,
            colptr,
            rowval,
            nzval,
        }
    }

    /// allocate space for a sparse matrix with `nnz` elements
    pub fn spalloc(m: usize, n: usize, nnz: usize) -> Self {
        let mut colptr = vec![0; n + 1];
        let rowval = vec![0; nnz];
        let nzval = vec![T::zero(); nnz];
        colptr[n] = nnz;

        CscMatrix::new(m, n, colptr, rowval, nzval)
    }

    /// Identity matrix of size `n`
    pub fn identity(n: usize) -> Self {
        let colptr = (0usize..=n).collect();
        let rowval = (0usize..n).collect();
        let nzval = vec![T::one(); n];

        CscMatrix::new(n, n, colptr, rowval, nzval)
    }

    /// Square diagonal matrix with the given diagonal
    pub fn from_diagonal(d: &[T]) -> Self {
        let n = d.len();
        let colptr = (0usize..=n).collect();
        let rowval = (0usize..n).collect();

        CscMatrix::new(n, n, colptr, rowval, d.to_vec())
    }

    /// Upper triangle of a symmetric tridiagonal matrix with diagonal
    /// `diag` and off-diagonal `offdiag`.
    ///
    /// # Panics
    /// Panics if `offdiag.len() + 1 != diag.len()` for nonempty `diag`.
    pub fn tridiagonal_triu(diag: &[T], offdiag: &[T]) -> Self {
        let n = diag.len();
        if n == 0 {
            return CscMatrix::spalloc(0, 0, 0);
        }
        assert_eq!(offdiag.len() + 1, n);

        let mut colptr = Vec::with_capacity(n + 1);
        let mut rowval = Vec::with_capacity(2 * n - 1);
        let mut nzval = Vec::with_capacity(2 * n - 1);

        colptr.push(0);
        for col in 0..n {
            if col > 0 {
                rowval.push(col - 1);
                nzval.push(offdiag[col - 1]);
            }
            rowval.push(col);
            nzval.push(diag[col]);
            colptr.push(rowval.len());
        }
        CscMatrix::new(n, n, colptr, rowval, nzval)
    }

    /// number of nonzeros
    pub fn nnz(&self) -> usize {
        self.colptr[self.n]
    }

    /// Check that matrix data is correctly formatted.
    pub fn check_format(&self) -> Result<(), SparseFormatError> {
        if self.rowval.len() != self.nzval.len() {
            return Err(SparseFormatError::IncompatibleDimension);
        }

        if self.colptr.is_empty()
            || (self.colptr.len() - 1) != self.n
            || self.colptr[self.n] != self.rowval.len()
        {
            return Err(SparseFormatError::IncompatibleDimension);
        }

        //check for colptr monotonicity
        if self.colptr.windows(2).any(|c| c[0] > c[1]) {
            return Err(SparseFormatError::BadColptr);
        }

        //check for rowval monotonicity within each column
        for col in 0..self.n {
            let rng = self.colptr[col]..self.colptr[col + 1];
            if self.rowval[rng].windows(2).any(|c| c[0] >= c[1]) {
                return Err(SparseFormatError::BadRowOrdering);
            }
        }
        //check for row values out of bounds
        if !self.rowval.iter().all(|r| r < &self.m) {
            return Err(SparseFormatError::BadRowval);
        }

        Ok(())
    }

    /// Checks that the matrix is square, well formed and holds only
    /// entries on or above the diagonal.
    pub fn check_symmetric_triu(&self) -> Result<(), SparseFormatError> {
        if !self.is_square() {
            return Err(SparseFormatError::IncompatibleDimension);
        }
        self.check_format()?;
        if !self.is_triu() {
            return Err(SparseFormatError::NotUpperTriangular);
        }
        Ok(())
    }

    /// Allocates a new matrix containing only entries from the upper triangular part
    pub fn to_triu(&self) -> Self {
        assert_eq!(self.m, self.n);
        let n = self.n;
        let mut colptr = vec![0; n + 1];
        let mut rowval = Vec::new();
        let mut nzval = Vec::new();

        for col in 0..n {
            let rng = self.colptr[col]..self.colptr[col + 1];
            for (&row, &v) in self.rowval[rng.clone()].iter().zip(&self.nzval[rng]) {
                if row <= col {
                    rowval.push(row);
                    nzval.push(v);
                }
            }
            colptr[col + 1] = rowval.len();
        }
        CscMatrix::new(n, n, colptr, rowval, nzval)
    }

    /// True if the matrix is upper triangular
    pub fn is_triu(&self) -> bool {
        (0..self.n).all(|col| {
            let rows = &self.rowval[self.colptr[col]..self.colptr[col + 1]];
            rows.iter().all(|&row| row <= col)
        })
    }

    /// Returns the value at the given (row,col) index as an Option.
    /// Returns None if the given index is not a structural nonzero.
    ///
    /// # Panics
    /// Panics if the given index is out of bounds.
    pub fn get_entry(&self, idx: (usize, usize)) -> Option<T> {
        let (row, col) = idx;
        assert!(row < self.nrows() && col < self.ncols());

        let first = self.colptr[col];
        let last = self.colptr[col + 1];
        match self.rowval[first..last].binary_search(&row) {
            Ok(idx) => Some(self.nzval[first + idx]),
            Err(_) => None,
        }
    }
}

impl<T> ShapedMatrix for CscMatrix<T> {
    fn nrows(&self) -> usize {
        self.m
    }
    fn ncols(&self) -> usize {
        self.n
    }
}

#[test]
fn test_csc_tridiagonal_triu() {
    let A = CscMatrix::<f64>::tridiagonal_triu(&[2., 2., 2.], &[-1., -1.]);
    assert!(A.check_symmetric_triu().is_ok());
    assert_eq!(A.nnz(), 5);
    assert_eq!(A.get_entry((0, 1)), Some(-1.));
    assert_eq!(A.get_entry((2, 2)), Some(2.));
    assert_eq!(A.get_entry((0, 2)), None);
}

#[test]
fn test_csc_check_format() {
    // unsorted rows in column 0
    let A = CscMatrix::new(2, 2, vec![0, 2, 3], vec![1, 0, 1], vec![1., 2., 3.]);
    assert_eq!(A.check_format(), Err(SparseFormatError::BadRowOrdering));

    // entry below the diagonal
    let A = CscMatrix::new(2, 2, vec![0, 2, 3], vec![0, 1, 1], vec![1., 2., 3.]);
    assert!(A.check_format().is_ok());
    assert_eq!(
        A.check_symmetric_triu(),
        Err(SparseFormatError::NotUpperTriangular)
    );
    assert!(A.to_triu().is_triu());
    assert_eq!(A.to_triu().nnz(), 2);
}
