use crate::algebra::*;
use derive_builder::Builder;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Error type returned by settings validation
pub enum SettingsError {
    /// An error attributable to one of the fields
    #[error("Bad value for field \"{0}\"")]
    BadFieldValue(&'static str),
}

/// Settings for the iterative eigensolvers

#[derive(Builder, Debug, Clone)]
#[builder(build_fn(validate = "Self::validate"))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EigsSettings<T: FloatT> {
    ///maximum number of restarts
    #[builder(default = "1000")]
    pub max_iter: u32,

    ///relative convergence tolerance of Ritz values
    #[builder(default = "(1e-10).as_T()")]
    pub tol: T,

    ///verbose printing
    #[builder(default = "false")]
    pub verbose: bool,

    ///seed of the pseudo-random start and basis expansion vectors
    #[builder(default = "0x2545F4914F6CDD1D")]
    pub seed: u64,

    ///factorization of the shifted matrix ("auto", "lu" or "ldl")
    #[builder(default = r#""auto".to_string()"#)]
    pub shift_solve_method: String,
}

impl<T> Default for EigsSettings<T>
where
    T: FloatT,
{
    fn default() -> EigsSettings<T> {
        EigsSettingsBuilder::<T>::default().build().unwrap()
    }
}

impl<T> EigsSettings<T>
where
    T: FloatT,
{
    /// Checks that the settings are valid.
    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_max_iter(self.max_iter)?;
        validate_tol(self.tol)?;
        validate_shift_solve_method(&self.shift_solve_method)?;
        Ok(())
    }
}

// pre build checker (for auto-validation when using the builder)

impl From<SettingsError> for EigsSettingsBuilderError {
    fn from(e: SettingsError) -> Self {
        EigsSettingsBuilderError::ValidationError(e.to_string())
    }
}

/// Automatic pre-build settings validation
impl<T> EigsSettingsBuilder<T>
where
    T: FloatT,
{
    pub fn validate(&self) -> Result<(), SettingsError> {
        if let Some(max_iter) = self.max_iter {
            validate_max_iter(max_iter)?;
        }
        if let Some(tol) = self.tol {
            validate_tol(tol)?;
        }
        if let Some(ref shift_solve_method) = self.shift_solve_method {
            validate_shift_solve_method(shift_solve_method)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------
// individual validation functions go here
// ---------------------------------------------------------

fn validate_max_iter(max_iter: u32) -> Result<(), SettingsError> {
    match max_iter {
        0 => Err(SettingsError::BadFieldValue("max_iter")),
        _ => Ok(()),
    }
}

fn validate_tol<T: FloatT>(tol: T) -> Result<(), SettingsError> {
    if tol.is_finite() && tol > T::zero() {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue("tol"))
    }
}

fn validate_shift_solve_method(shift_solve_method: &str) -> Result<(), SettingsError> {
    match shift_solve_method {
        "auto" => Ok(()),
        "lu" => Ok(()),
        "ldl" => Ok(()),
        _ => Err(SettingsError::BadFieldValue("shift_solve_method")),
    }
}

#[test]
fn test_settings_validate() {
    let settings = EigsSettings::<f64>::default();
    assert!(settings.validate().is_ok());
    assert_eq!(settings.max_iter, 1000);
    assert_eq!(settings.shift_solve_method, "auto");

    // builder rejects bad values
    let b = EigsSettingsBuilder::<f64>::default().max_iter(0).build();
    assert!(b.is_err());
    let b = EigsSettingsBuilder::<f64>::default().tol(-1.0).build();
    assert!(b.is_err());
    let b = EigsSettingsBuilder::<f64>::default().tol(f64::NAN).build();
    assert!(b.is_err());
    let b = EigsSettingsBuilder::<f64>::default()
        .shift_solve_method("cholesky".to_string())
        .build();
    assert!(b.is_err());

    // direct modification is caught by validate
    let mut settings = EigsSettings::<f64>::default();
    settings.tol = 0.0;
    assert_eq!(
        settings.validate(),
        Err(SettingsError::BadFieldValue("tol"))
    );
}
