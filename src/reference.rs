//! Power-law reference kernels.
//!
//! Used to build synthetic samples and to eyeball estimated kernels against a
//! known decay law. Nothing in the estimators depends on this module.

/// Smallest offset accepted for the power-law cutoff `l0`.
const L0_EPS: f64 = 1e-12;

/// `G(k) = g0 / (1 + k / l0)^beta` for `k = 0..len`.
pub fn powerlaw_kernel(g0: f64, l0: f64, beta: f64, len: usize) -> Vec<f64> {
    let l0 = l0.max(L0_EPS);
    (0..len)
        .map(|k| g0 * (1.0 + k as f64 / l0).powf(-beta))
        .collect()
}
