//! Single-kernel causal convolution (TIM1).
//!
//! `r[t] = sum_{k=0}^{min(t, m-1)} eps[t-k] * G[k]`
//!
//! Only past and present innovations contribute; the kernel is zero beyond
//! its last tap and the output is truncated to the innovation length.

/// Causal convolution of `eps` with kernel `g`, truncated to `eps.len()`.
pub fn propagate(eps: &[f64], g: &[f64]) -> Vec<f64> {
    let n = eps.len();
    let mut out = vec![0.0; n];
    // Scatter each event forward; order-flow series are mostly zeros or
    // unit signs, so skipping zero events is the common fast path.
    for (s, &e) in eps.iter().enumerate() {
        if e == 0.0 {
            continue;
        }
        let taps = g.len().min(n - s);
        for (o, &gk) in out[s..s + taps].iter_mut().zip(&g[..taps]) {
            *o += e * gk;
        }
    }
    out
}

/// Transient Impact Model with one kernel: returns from signed innovations.
///
/// Pass a differential kernel to get returns, an integrated kernel to get
/// prices.
pub fn tim1(eps: &[f64], g: &[f64]) -> Vec<f64> {
    propagate(eps, g)
}
