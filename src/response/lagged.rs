//! Empirical lead-lag response of an output series to an innovation series.
//!
//! For lags `l = -maxlag..=maxlag`:
//!
//! ```text
//! s(l) = (1/n) * sum_t eps(t) * r(t+l)          (terms outside the series are zero)
//! R(l) = <(p(t+l) - p(t)) eps(t)>,  p = integrate(r)
//!      = s(0) + ... + s(l-1)                     l > 0
//!      = -(s(l) + ... + s(-1))                   l < 0
//! ```
//!
//! The `1/n` normalization uses the number of observations; the innovation
//! second moment is not divided out, so `R` carries the units of `eps * r`.

use rayon::prelude::*;

use crate::domain::{Response, ResponseOutput, ResponsePart};
use crate::error::{PropagatorError, Result, ensure_len};
use crate::math::integrate;

/// Unnormalized `sum_t eps(t) * r(t+l)` for `l = -maxlag..=maxlag`.
///
/// Only index pairs inside the series contribute, so callers can add the
/// sums of independent segments without any lag window crossing a boundary.
pub(crate) fn lagged_sums(r: &[f64], eps: &[f64], maxlag: usize) -> Vec<f64> {
    let n = r.len().min(eps.len()) as i64;
    let m = maxlag as i64;
    (0..=2 * maxlag)
        .into_par_iter()
        .map(|i| {
            let l = i as i64 - m;
            let t0 = (-l).max(0);
            let t1 = (n - l).min(n);
            (t0..t1)
                .map(|t| eps[t as usize] * r[(t + l) as usize])
                .sum::<f64>()
        })
        .collect()
}

/// Cumulate a cross-moment on the symmetric lag axis into a response function.
pub(crate) fn response_from_cross(cross: &[f64]) -> Vec<f64> {
    let m = cross.len() / 2;

    // Non-negative lags: R(0) = 0, R(l) = s(0) + ... + s(l-1).
    let forward = integrate(&cross[m..]);

    // Negative lags: R(-l) = -(s(-1) + ... + s(-l)), built outward from lag 0.
    let mut backward_steps: Vec<f64> = cross[..m].iter().rev().map(|v| -v).collect();
    backward_steps.push(0.0);
    let backward = integrate(&backward_steps);

    let mut out = Vec::with_capacity(cross.len());
    out.extend(backward[1..].iter().rev());
    out.extend(forward);
    out
}

pub(crate) fn lag_axis(maxlag: usize) -> Vec<i64> {
    let m = maxlag as i64;
    (-m..=m).collect()
}

/// Response of `r` to `eps` with the default window `maxlag = n / 2`.
///
/// The first argument is the output being responded to (returns), the second
/// the innovation (signs).
pub fn response(r: &[f64], eps: &[f64]) -> Result<Response> {
    response_with_maxlag(r, eps, r.len() / 2)
}

/// Response of `r` to `eps` over `-maxlag..=maxlag`.
pub fn response_with_maxlag(r: &[f64], eps: &[f64], maxlag: usize) -> Result<Response> {
    ensure_len("eps", r.len(), eps.len())?;
    let n = r.len();
    if n == 0 {
        return Err(PropagatorError::NotEnoughData(
            "response needs at least one observation.".into(),
        ));
    }
    if maxlag > n {
        return Err(PropagatorError::NotEnoughData(format!(
            "maxlag={maxlag} exceeds series length {n}."
        )));
    }

    let scale = 1.0 / n as f64;
    let cross: Vec<f64> = lagged_sums(r, eps, maxlag)
        .into_iter()
        .map(|v| v * scale)
        .collect();
    let response = response_from_cross(&cross);
    log::debug!("response: n={n}, maxlag={maxlag}");

    Ok(Response {
        lags: lag_axis(maxlag),
        cross,
        response,
    })
}

/// Response restricted to the requested part (`lsr`, `l`, `s` or `r`).
///
/// Every part comes from the same computation as the full triple.
pub fn response_select(r: &[f64], eps: &[f64], part: ResponsePart) -> Result<ResponseOutput> {
    Ok(response(r, eps)?.select(part))
}
