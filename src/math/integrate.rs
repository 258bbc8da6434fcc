//! Conversion between impulse (differential) and step (integrated) series.
//!
//! `integrate` turns returns into prices, or a differential kernel into its
//! cumulative impact, with the convention that the value at the current step
//! is not yet included: `y[t] = x[0] + ... + x[t-1]`.

/// Lag-one running sum: `y[0] = 0`, `y[t] = sum(x[..t])`.
pub fn integrate(x: &[f64]) -> Vec<f64> {
    let mut acc = 0.0;
    x.iter()
        .map(|&v| {
            let before = acc;
            acc += v;
            before
        })
        .collect()
}

/// Forward differences, the inverse of [`integrate`].
///
/// `x[t] = y[t+1] - y[t]`; the last increment is unknown and set to zero.
pub fn differentiate(y: &[f64]) -> Vec<f64> {
    let mut out: Vec<f64> = y.windows(2).map(|w| w[1] - w[0]).collect();
    if !y.is_empty() {
        out.push(0.0);
    }
    out
}
