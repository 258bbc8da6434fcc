//! Error type shared by every estimator and convolution routine.
//!
//! All failures are local to a single call. Degenerate smoother inputs are
//! handled in place and never surface here.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, PropagatorError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropagatorError {
    /// Series of inconsistent lengths passed to one call.
    #[error("Shape mismatch for {what}: expected length {expected}, found {found}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// Not enough observations (or correlation lags) for the requested `maxlag`.
    #[error("Not enough data: {0}")]
    NotEnoughData(String),

    /// Normal equations or design matrix could not be inverted.
    #[error("Singular system: {0}")]
    Singular(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Invalid cell in column '{column}' at row {row}: {reason}")]
    InvalidCell {
        column: String,
        row: usize,
        reason: String,
    },
}

/// Fail with [`PropagatorError::ShapeMismatch`] unless `found == expected`.
pub fn ensure_len(what: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(PropagatorError::ShapeMismatch {
            what,
            expected,
            found,
        });
    }
    Ok(())
}

/// Validate a lag window: positive and no longer than the data backing it.
pub fn ensure_maxlag(maxlag: usize, available: usize, what: &str) -> Result<()> {
    if maxlag == 0 {
        return Err(PropagatorError::InvalidArgument("maxlag must be >= 1.".into()));
    }
    if maxlag > available {
        return Err(PropagatorError::NotEnoughData(format!(
            "maxlag={maxlag} exceeds the {available} lags available in {what}."
        )));
    }
    Ok(())
}
