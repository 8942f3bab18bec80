use super::SparseGEigsProblem;
use crate::{algebra::*, solver::core::traits::ProblemJSONReadWrite};

use serde::{de::DeserializeOwned, Serialize};
use std::io::Write;
use std::{fs::File, io, io::Read};

impl<T> ProblemJSONReadWrite for SparseGEigsProblem<T>
where
    T: FloatT + DeserializeOwned + Serialize,
{
    fn write_to_file(&self, file: &mut File) -> Result<(), io::Error> {
        let json = serde_json::to_string(self)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    fn read_from_file(file: &mut File) -> Result<Self, io::Error> {
        let mut buffer = String::new();
        file.read_to_string(&mut buffer)?;
        let problem: Self = serde_json::from_str(&buffer)?;

        // reject data that would not pass construction
        problem
            .check()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        Ok(problem)
    }
}

#[test]
fn test_json_io() {
    #![allow(non_snake_case)]
    use crate::solver::core::{EigsSettingsBuilder, SortRule};
    use std::io::{Seek, SeekFrom};

    let A = CscMatrix::tridiagonal_triu(&[2., 2., 2., 2., 2., 2.], &[-1., -1., -1., -1., -1.]);
    let B = CscMatrix::from_diagonal(&[1., 2., 1., 2., 1., 2.]);

    let settings = EigsSettingsBuilder::default()
        .tol(1e-12)
        .shift_solve_method("lu".to_string())
        .build()
        .unwrap();

    let problem = SparseGEigsProblem::new(A, B, 0.7, 2, settings)
        .unwrap()
        .with_ncv(5)
        .unwrap()
        .with_rule(SortRule::LargestAlge);

    // write the problem to a file
    let mut file = tempfile::tempfile().unwrap();
    problem.write_to_file(&mut file).unwrap();

    // read the problem from the file
    file.seek(SeekFrom::Start(0)).unwrap();
    let problem2 = SparseGEigsProblem::<f64>::read_from_file(&mut file).unwrap();

    assert_eq!(problem2.ncv, 5);
    assert_eq!(problem2.rule, SortRule::LargestAlge);
    assert_eq!(problem2.settings.shift_solve_method, "lu");
    assert_eq!(problem2.B.nzval, problem.B.nzval);

    let sol = problem.solve().unwrap();
    let sol2 = problem2.solve().unwrap();
    assert_eq!(sol.eigenvalues, sol2.eigenvalues);
}

#[test]
fn test_json_rejects_bad_problem() {
    use std::io::{Seek, SeekFrom};

    let mut file = tempfile::tempfile().unwrap();
    let text = r#"{"A":{"m":2,"n":2,"colptr":[0,1,2],"rowval":[0,1],"nzval":[1.0,2.0]},
                   "B":{"m":2,"n":2,"colptr":[0,1,2],"rowval":[0,1],"nzval":[1.0,1.0]},
                   "sigma":0.0,"nev":1,"ncv":5,"rule":"LargestMagn","settings":{}}"#;
    file.write_all(text.as_bytes()).unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();

    let err = SparseGEigsProblem::<f64>::read_from_file(&mut file).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
}
