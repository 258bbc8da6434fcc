//! Time-domain deconvolution: kernels straight from raw `(eps, r)` series.
//!
//! Each output step is one least-squares equation:
//!
//! ```text
//! r(t) = sum_{k<maxlag} eps(t-k) * G(k)                       (TIM1)
//! r(t) = w(t) * sum_{k<maxlag} eps(t-k) * G_{class(t-k)}(k)   (two-kernel models)
//! ```
//!
//! where `w(t)` is the model's realized weight for step `t`. On noise-free
//! data generated by the same model the solve is exact; on noisy data it is
//! the least-squares estimate for the lag window. A design that cannot
//! identify every tap, including one where some tap combination is pinned
//! down only by a few rows at the start of the series, is reported as
//! singular rather than regularized.

use nalgebra::{DMatrix, DVector};

use crate::domain::KernelPair;
use crate::error::{PropagatorError, Result, ensure_len, ensure_maxlag};
use crate::math::{design_floor, solve_with_floor};
use crate::models::{Hdim2, Tim2, TwoKernelModel};

/// Least-squares TIM1 kernel of length `maxlag` from innovations and outputs.
pub fn deconvolve_tim1(eps: &[f64], r: &[f64], maxlag: usize) -> Result<Vec<f64>> {
    ensure_len("r", eps.len(), r.len())?;
    ensure_maxlag(maxlag, eps.len(), "eps")?;

    let x = DMatrix::from_fn(eps.len(), maxlag, |t, k| if t >= k { eps[t - k] } else { 0.0 });
    let y = DVector::from_column_slice(r);

    log::debug!("deconvolve_tim1: n={}, maxlag={maxlag}", eps.len());
    let g = solve_with_floor(&x, &y, "TIM1 deconvolution", design_floor(eps.len()))?;
    Ok(g.iter().copied().collect())
}

/// Taps a two-kernel model can identify from its output.
///
/// HDIM2 never realizes a non-continuation event at its own step, so
/// `G_n(0)` leaves no trace in the output.
trait Identifiable: TwoKernelModel {
    fn identifies(continuation: bool, lag: usize) -> bool;
}

impl Identifiable for Tim2 {
    fn identifies(_continuation: bool, _lag: usize) -> bool {
        true
    }
}

impl Identifiable for Hdim2 {
    fn identifies(continuation: bool, lag: usize) -> bool {
        continuation || lag > 0
    }
}

fn deconvolve_two_kernel<M: Identifiable>(
    eps: &[f64],
    sign: &[bool],
    r: &[f64],
    maxlag: usize,
) -> Result<KernelPair> {
    ensure_len("sign", eps.len(), sign.len())?;
    ensure_len("r", eps.len(), r.len())?;
    ensure_maxlag(maxlag, eps.len(), "eps")?;

    // Unknowns: (class, lag) pairs the model can identify. Class `false` is
    // `G_n`, `true` is `G_c`. `columns[class * maxlag + lag]` is the design
    // column of that pair, if any.
    let unknowns: Vec<(bool, usize)> = [false, true]
        .into_iter()
        .flat_map(|c| (0..maxlag).map(move |k| (c, k)))
        .filter(|&(c, k)| M::identifies(c, k))
        .collect();
    let mut columns = vec![None; 2 * maxlag];
    for (j, &(c, k)) in unknowns.iter().enumerate() {
        columns[usize::from(c) * maxlag + k] = Some(j);
    }

    let rows: Vec<usize> = (0..eps.len())
        .filter(|&t| M::realized_weight(sign[t]) != 0.0)
        .collect();
    if rows.is_empty() {
        return Err(PropagatorError::Singular(format!(
            "{}: no step realizes any history.",
            M::NAME
        )));
    }

    let mut x = DMatrix::<f64>::zeros(rows.len(), unknowns.len());
    let mut y = DVector::<f64>::zeros(rows.len());
    for (i, &t) in rows.iter().enumerate() {
        let w = M::realized_weight(sign[t]);
        for k in 0..maxlag.min(t + 1) {
            let s = t - k;
            if let Some(j) = columns[usize::from(sign[s]) * maxlag + k] {
                x[(i, j)] += w * eps[s];
            }
        }
        y[i] = r[t];
    }

    log::debug!(
        "deconvolve {}: {} equations, {} unknowns",
        M::NAME,
        rows.len(),
        unknowns.len()
    );
    let beta = solve_with_floor(&x, &y, M::NAME, design_floor(rows.len()))?;

    let mut pair = KernelPair::new(vec![0.0; maxlag], vec![0.0; maxlag]);
    for (&(c, k), &v) in unknowns.iter().zip(beta.iter()) {
        if c {
            pair.gc[k] = v;
        } else {
            pair.gn[k] = v;
        }
    }
    Ok(pair)
}

/// Least-squares TIM2 kernels from innovations, indicator and outputs.
pub fn deconvolve_tim2(eps: &[f64], sign: &[bool], r: &[f64], maxlag: usize) -> Result<KernelPair> {
    deconvolve_two_kernel::<Tim2>(eps, sign, r, maxlag)
}

/// Least-squares HDIM2 kernels from innovations, indicator and outputs.
///
/// `gn[0]` is not identifiable under HDIM2 and is returned as zero. Samples
/// where the remaining taps are not separable (e.g. an indicator that is
/// always or never set) fail with [`PropagatorError::Singular`].
pub fn deconvolve_hdim2(eps: &[f64], sign: &[bool], r: &[f64], maxlag: usize) -> Result<KernelPair> {
    deconvolve_two_kernel::<Hdim2>(eps, sign, r, maxlag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{hdim2, propagate, tim2};
    use rand::prelude::*;
    use rand::rngs::StdRng;

    fn assert_close(a: &[f64], b: &[f64], tol: f64) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            assert!((x - y).abs() < tol, "{a:?} != {b:?}");
        }
    }

    fn random_events(n: usize, seed: u64) -> (Vec<f64>, Vec<bool>) {
        let mut rng = StdRng::seed_from_u64(seed);
        let eps = (0..n)
            .map(|_| if rng.gen_bool(0.5) { 1.0 } else { -1.0 })
            .collect();
        let sign = (0..n).map(|_| rng.gen_bool(0.4)).collect();
        (eps, sign)
    }

    #[test]
    fn tim1_round_trip() {
        let (eps, _) = random_events(300, 1);
        let g = [1.0, 0.5, 0.25, 0.1];
        let r = propagate(&eps, &g);

        assert_close(&deconvolve_tim1(&eps, &r, 4).unwrap(), &g, 1e-9);
        // A wider window finds zeros beyond the true kernel.
        assert_close(
            &deconvolve_tim1(&eps, &r, 6).unwrap(),
            &[1.0, 0.5, 0.25, 0.1, 0.0, 0.0],
            1e-9,
        );
    }

    #[test]
    fn tim1_rejects_degenerate_designs() {
        let err = deconvolve_tim1(&[0.0; 5], &[0.0; 5], 2).unwrap_err();
        assert!(matches!(err, PropagatorError::Singular(_)));

        let err = deconvolve_tim1(&[1.0, 0.0], &[1.0, 0.5], 3).unwrap_err();
        assert!(matches!(err, PropagatorError::NotEnoughData(_)));

        let err = deconvolve_tim1(&[1.0, 0.0], &[1.0], 1).unwrap_err();
        assert!(matches!(err, PropagatorError::ShapeMismatch { .. }));
    }

    #[test]
    fn tim2_round_trip() {
        let (eps, sign) = random_events(400, 2);
        let gn = [0.3, 0.2, 0.1];
        let gc = [1.0, 0.4, -0.1];
        let r = tim2(&eps, &sign, &gn, &gc).unwrap();

        let pair = deconvolve_tim2(&eps, &sign, &r, 3).unwrap();
        assert_close(&pair.gn, &gn, 1e-9);
        assert_close(&pair.gc, &gc, 1e-9);
    }

    #[test]
    fn hdim2_round_trip_with_unidentified_lag_zero() {
        let (eps, sign) = random_events(400, 3);
        let gn = [0.7, 0.2, 0.1];
        let gc = [1.0, 0.4, 0.2];
        let r = hdim2(&eps, &sign, &gn, &gc).unwrap();

        let pair = deconvolve_hdim2(&eps, &sign, &r, 3).unwrap();
        assert_close(&pair.gn, &[0.0, 0.2, 0.1], 1e-9);
        assert_close(&pair.gc, &gc, 1e-9);
    }

    #[test]
    fn indicator_derived_from_sign_repeats_is_singular() {
        // With unit signs and `sign[t] = eps[t] == eps[t-1]`, the classes obey
        // `ec(t) - en(t) = en(t-1) + ec(t-1)`; only the first row breaks the
        // tie, which must not be enough to return kernels.
        let (eps, _) = random_events(2000, 6);
        let sign: Vec<bool> = (0..eps.len())
            .map(|t| t > 0 && eps[t] == eps[t - 1])
            .collect();
        let gn = [0.4, 0.2, 0.1, 0.05];
        let gc = [1.0, 0.6, 0.3, 0.1];

        for start in [0, 1] {
            let (eps, sign) = (&eps[start..], &sign[start..]);
            let r = tim2(eps, sign, &gn, &gc).unwrap();
            let err = deconvolve_tim2(eps, sign, &r, 4).unwrap_err();
            assert!(matches!(err, PropagatorError::Singular(_)), "{err:?}");
        }
    }

    #[test]
    fn hdim2_degenerate_indicators_are_singular() {
        let (eps, _) = random_events(50, 4);
        let r = vec![0.0; 50];

        let err = deconvolve_hdim2(&eps, &[false; 50], &r, 2).unwrap_err();
        assert!(matches!(err, PropagatorError::Singular(_)));

        // Always set: the G_n columns never fill.
        let err = deconvolve_hdim2(&eps, &[true; 50], &r, 2).unwrap_err();
        assert!(matches!(err, PropagatorError::Singular(_)));
    }
}
