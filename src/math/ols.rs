//! Least squares solvers.
//!
//! Two flavors are used across the crate:
//!
//! - `solve_least_squares`: pseudo-inverse solve for regressions where a
//!   minimum-norm answer is acceptable (the tail smoother's RBF weights).
//! - `solve_full_rank` / `solve_with_floor`: the kernel estimators, where a
//!   rank-deficient or ill-conditioned design means the data cannot identify
//!   the kernel and must be reported instead of silently regularized.
//!
//! Systems measured from samples get a floor on `sigma_min / sigma_max` that
//! scales with the sample size: a direction supported only by a handful of
//! boundary observations has a small but nonzero singular value, and its
//! solution is dominated by those few rows.
//!
//! Both go through SVD, so tall designs are solved directly.

use nalgebra::{DMatrix, DVector};

use crate::error::{PropagatorError, Result};

/// Relative singular-value cutoff for rank decisions.
const RANK_RTOL: f64 = 1e-10;

/// Largest accepted condition number `sigma_max / sigma_min`.
const MAX_CONDITION: f64 = 1e8;

/// Observations' worth of signal the weakest direction of a sample-based
/// system must carry.
pub const MIN_SUPPORT: f64 = 20.0;

/// `sigma_min / sigma_max` floor for a design matrix with `rows` observation
/// rows.
pub fn design_floor(rows: usize) -> f64 {
    (MIN_SUPPORT / rows.max(1) as f64).sqrt().min(1.0)
}

/// `sigma_min / sigma_max` floor for normal equations averaged over
/// `samples` observations (singular values scale as the squared design's).
pub fn gram_floor(samples: usize) -> f64 {
    (MIN_SUPPORT / samples.max(1) as f64).min(1.0)
}

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Solve `x * beta ≈ y` in the least-squares sense, requiring full column rank
/// and a condition number of at most `1e8`.
///
/// `what` names the system in the error message.
pub fn solve_full_rank(x: &DMatrix<f64>, y: &DVector<f64>, what: &str) -> Result<DVector<f64>> {
    solve_with_floor(x, y, what, 0.0)
}

/// [`solve_full_rank`] that also rejects `sigma_min / sigma_max < floor`.
pub fn solve_with_floor(
    x: &DMatrix<f64>,
    y: &DVector<f64>,
    what: &str,
    floor: f64,
) -> Result<DVector<f64>> {
    if x.nrows() != y.len() {
        return Err(PropagatorError::ShapeMismatch {
            what: "least-squares right-hand side",
            expected: x.nrows(),
            found: y.len(),
        });
    }
    if x.nrows() < x.ncols() {
        return Err(PropagatorError::NotEnoughData(format!(
            "{what}: {} equations for {} unknowns.",
            x.nrows(),
            x.ncols()
        )));
    }

    let svd = x.clone().svd(true, true);
    let largest = svd.singular_values.max();
    if !(largest.is_finite() && largest > 0.0) {
        return Err(PropagatorError::Singular(format!("{what}: design matrix is zero.")));
    }

    let tol = largest * RANK_RTOL;
    let rank = svd.rank(tol);
    if rank < x.ncols() {
        return Err(PropagatorError::Singular(format!(
            "{what}: rank {rank} < {} unknowns.",
            x.ncols()
        )));
    }

    let ratio = svd.singular_values.min() / largest;
    let floor = floor.max(1.0 / MAX_CONDITION);
    if ratio < floor {
        return Err(PropagatorError::Singular(format!(
            "{what}: condition number {:.3e} exceeds {:.3e}; the data do not identify every tap.",
            1.0 / ratio,
            1.0 / floor
        )));
    }

    let beta = svd
        .solve(y, tol)
        .map_err(|e| PropagatorError::Singular(format!("{what}: {e}")))?;
    if beta.iter().any(|v| !v.is_finite()) {
        return Err(PropagatorError::Singular(format!("{what}: non-finite solution.")));
    }
    log::debug!(
        "{what}: solved {}x{} system (condition ~ {:.3e})",
        x.nrows(),
        x.ncols(),
        1.0 / ratio
    );
    Ok(beta)
}
