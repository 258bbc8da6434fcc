//! Correlation-space kernel estimation.
//!
//! Under TIM1 the response cross-moment and the innovation autocorrelation
//! are linked by
//!
//! ```text
//! s(l) = sum_{k=0}^{maxlag-1} G(k) c(l - k),     c(-j) = c(j)
//! ```
//!
//! For `l = 0..maxlag` this is a symmetric Toeplitz system in `G`. TIM2 has
//! one such equation per event class, coupled through the cross-class
//! correlations (`C_ab(-j) = C_ba(j)`), giving a `2*maxlag` block system.
//!
//! No regularization happens here; noisy tails are the smoother's job.

use nalgebra::{DMatrix, DVector};

use crate::domain::KernelPair;
use crate::error::{PropagatorError, Result, ensure_len, ensure_maxlag};
use crate::math::{gram_floor, solve_full_rank, solve_with_floor};
use crate::response::{cross_correlation, response_with_maxlag, tim2_correlations};

/// `C_ab(l - k)` from the two one-sided correlation arrays.
fn lagged_entry(ab: &[f64], ba: &[f64], l: usize, k: usize) -> f64 {
    if l >= k { ab[l - k] } else { ba[k - l] }
}

/// Index of lag zero in a symmetric response array, after checking that it
/// holds the `maxlag` non-negative lags the estimator reads.
fn response_center(s: &[f64], maxlag: usize, what: &str) -> Result<usize> {
    if s.len() % 2 == 0 {
        return Err(PropagatorError::InvalidArgument(format!(
            "{what} must have odd length (lags -L..=L), got {}.",
            s.len()
        )));
    }
    let center = s.len() / 2;
    if maxlag > center + 1 {
        return Err(PropagatorError::NotEnoughData(format!(
            "{what} covers lags up to {center}, maxlag={maxlag} needs {}.",
            maxlag - 1
        )));
    }
    Ok(center)
}

fn tim1_normal_equations(
    c: &[f64],
    s: &[f64],
    maxlag: usize,
) -> Result<(DMatrix<f64>, DVector<f64>)> {
    ensure_maxlag(maxlag, c.len(), "the autocorrelation")?;
    let center = response_center(s, maxlag, "response")?;

    let a = DMatrix::from_fn(maxlag, maxlag, |l, k| lagged_entry(c, c, l, k));
    let b = DVector::from_fn(maxlag, |l, _| s[center + l]);
    log::debug!("TIM1 normal equations: maxlag={maxlag}");
    Ok((a, b))
}

fn tim2_normal_equations(
    c_nn: &[f64],
    c_cc: &[f64],
    c_cn: &[f64],
    c_nc: &[f64],
    s_n: &[f64],
    s_c: &[f64],
    maxlag: usize,
) -> Result<(DMatrix<f64>, DVector<f64>)> {
    for (corr, what) in [
        (c_nn, "c_nn"),
        (c_cc, "c_cc"),
        (c_cn, "c_cn"),
        (c_nc, "c_nc"),
    ] {
        ensure_maxlag(maxlag, corr.len(), what)?;
    }
    ensure_len("s_c", s_n.len(), s_c.len())?;
    let center = response_center(s_n, maxlag, "s_n")?;

    let m = maxlag;
    // Rows: (class n, lags 0..m) then (class c, lags 0..m).
    // Columns: G_n(0..m) then G_c(0..m).
    let a = DMatrix::from_fn(2 * m, 2 * m, |i, j| {
        let (row_c, l) = (i >= m, i % m);
        let (col_c, k) = (j >= m, j % m);
        match (row_c, col_c) {
            (false, false) => lagged_entry(c_nn, c_nn, l, k),
            (false, true) => lagged_entry(c_nc, c_cn, l, k),
            (true, false) => lagged_entry(c_cn, c_nc, l, k),
            (true, true) => lagged_entry(c_cc, c_cc, l, k),
        }
    });
    let b = DVector::from_fn(2 * m, |i, _| {
        if i < m { s_n[center + i] } else { s_c[center + i - m] }
    });
    log::debug!("TIM2 normal equations: maxlag={maxlag}");
    Ok((a, b))
}

fn split_pair(g: &DVector<f64>, m: usize) -> KernelPair {
    KernelPair::new(
        g.rows(0, m).iter().copied().collect(),
        g.rows(m, m).iter().copied().collect(),
    )
}

/// Estimate the TIM1 kernel from the innovation autocorrelation `c` (lags
/// `0..`) and the response cross-moment `s` (symmetric lag axis).
pub fn estimate_tim1(c: &[f64], s: &[f64], maxlag: usize) -> Result<Vec<f64>> {
    let (a, b) = tim1_normal_equations(c, s, maxlag)?;
    let g = solve_full_rank(&a, &b, "TIM1 normal equations")?;
    Ok(g.iter().copied().collect())
}

/// Estimate the TIM2 kernels from class correlations and class responses.
///
/// `c_ab[k]` is `(1/n) sum_t eps_a(t) eps_b(t+k)` for the classes `n`
/// (indicator unset) and `c` (indicator set); `s_n`, `s_c` are the responses
/// to each class on a symmetric lag axis.
pub fn estimate_tim2(
    c_nn: &[f64],
    c_cc: &[f64],
    c_cn: &[f64],
    c_nc: &[f64],
    s_n: &[f64],
    s_c: &[f64],
    maxlag: usize,
) -> Result<KernelPair> {
    let (a, b) = tim2_normal_equations(c_nn, c_cc, c_cn, c_nc, s_n, s_c, maxlag)?;
    let g = solve_full_rank(&a, &b, "TIM2 normal equations")?;
    Ok(split_pair(&g, maxlag))
}

/// Measure `c` and `s` from raw series and run [`estimate_tim1`].
///
/// Also fails with [`PropagatorError::Singular`] when some kernel direction is
/// carried by too few of the `eps.len()` observations.
pub fn estimate_tim1_from_series(eps: &[f64], r: &[f64], maxlag: usize) -> Result<Vec<f64>> {
    ensure_len("r", eps.len(), r.len())?;
    let c = cross_correlation(eps, eps, maxlag)?;
    let s = response_with_maxlag(r, eps, maxlag)?.cross;

    let (a, b) = tim1_normal_equations(&c, &s, maxlag)?;
    let g = solve_with_floor(&a, &b, "TIM1 normal equations", gram_floor(eps.len()))?;
    Ok(g.iter().copied().collect())
}

/// Measure the class correlations from raw series and run [`estimate_tim2`].
///
/// An indicator that is a function of the signs themselves (for example
/// "sign repeats the previous one") leaves the two kernels unidentified and
/// fails with [`PropagatorError::Singular`].
pub fn estimate_tim2_from_series(
    eps: &[f64],
    sign: &[bool],
    r: &[f64],
    maxlag: usize,
) -> Result<KernelPair> {
    let corr = tim2_correlations(eps, sign, r, maxlag)?;
    let (a, b) = tim2_normal_equations(
        &corr.c_nn, &corr.c_cc, &corr.c_cn, &corr.c_nc, &corr.s_n, &corr.s_c, maxlag,
    )?;
    let g = solve_with_floor(&a, &b, "TIM2 normal equations", gram_floor(eps.len()))?;
    Ok(split_pair(&g, maxlag))
}
