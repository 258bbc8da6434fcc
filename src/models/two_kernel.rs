//! Two-kernel impact models: TIM2 and HDIM2.
//!
//! Both attribute each past event through `gc` when its continuation
//! indicator is set and through `gn` otherwise; that selection is the shared
//! primitive [`select_convolve`]. They differ in what is realized at the
//! current step:
//!
//! - TIM2: the selected convolution is the output.
//! - HDIM2: only steps whose own indicator is set move the output; the
//!   accumulated history is realized there and nowhere else.
//!
//! The [`TwoKernelModel`] trait exposes exactly that difference so the
//! estimators can build the matching design without a mode switch.

use crate::domain::KernelPair;
use crate::error::{Result, ensure_len};

/// Causal convolution where the kernel is chosen per source event.
///
/// `out[t] = sum_k eps[t-k] * (if sign[t-k] { gc[k] } else { gn[k] })`
pub fn select_convolve(eps: &[f64], sign: &[bool], gn: &[f64], gc: &[f64]) -> Result<Vec<f64>> {
    ensure_len("sign", eps.len(), sign.len())?;
    ensure_len("gc", gn.len(), gc.len())?;

    let n = eps.len();
    let mut out = vec![0.0; n];
    for (s, (&e, &c)) in eps.iter().zip(sign).enumerate() {
        if e == 0.0 {
            continue;
        }
        let g = if c { gc } else { gn };
        let taps = g.len().min(n - s);
        for (o, &gk) in out[s..s + taps].iter_mut().zip(&g[..taps]) {
            *o += e * gk;
        }
    }
    Ok(out)
}

/// Transient Impact Model with two kernels.
pub fn tim2(eps: &[f64], sign: &[bool], gn: &[f64], gc: &[f64]) -> Result<Vec<f64>> {
    select_convolve(eps, sign, gn, gc)
}

/// History Dependent Impact Model with two kernels.
///
/// Steps whose indicator is `false` produce no output; flagged steps realize
/// the selected convolution of the whole history.
pub fn hdim2(eps: &[f64], sign: &[bool], gn: &[f64], gc: &[f64]) -> Result<Vec<f64>> {
    let mut out = select_convolve(eps, sign, gn, gc)?;
    for (o, &c) in out.iter_mut().zip(sign) {
        if !c {
            *o = 0.0;
        }
    }
    Ok(out)
}

/// How a two-kernel model realizes the selected history at each step.
pub trait TwoKernelModel {
    /// Short label for logs and error messages.
    const NAME: &'static str;

    /// Weight of the selected history in the output at a step whose own
    /// indicator is `sign_now`.
    fn realized_weight(sign_now: bool) -> f64;

    /// Simulate the model output for the given kernels.
    fn simulate(eps: &[f64], sign: &[bool], kernels: &KernelPair) -> Result<Vec<f64>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Tim2;

#[derive(Debug, Clone, Copy, Default)]
pub struct Hdim2;

impl TwoKernelModel for Tim2 {
    const NAME: &'static str = "TIM2";

    fn realized_weight(_sign_now: bool) -> f64 {
        1.0
    }

    fn simulate(eps: &[f64], sign: &[bool], kernels: &KernelPair) -> Result<Vec<f64>> {
        tim2(eps, sign, &kernels.gn, &kernels.gc)
    }
}

impl TwoKernelModel for Hdim2 {
    const NAME: &'static str = "HDIM2";

    fn realized_weight(sign_now: bool) -> f64 {
        if sign_now { 1.0 } else { 0.0 }
    }

    fn simulate(eps: &[f64], sign: &[bool], kernels: &KernelPair) -> Result<Vec<f64>> {
        hdim2(eps, sign, &kernels.gn, &kernels.gc)
    }
}
