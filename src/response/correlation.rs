//! Correlation inputs for the correlation-space kernel estimators.
//!
//! TIM1 needs the innovation autocorrelation `c(k)` and the response
//! cross-moment `s(l)`. TIM2 needs the same objects per event class, where the
//! classes are the innovations with the continuation indicator unset (`n`)
//! and set (`c`):
//!
//! ```text
//! C_ab(k) = (1/n) * sum_t eps_a(t) * eps_b(t+k)     k >= 0
//! S_a(l)  = (1/n) * sum_t eps_a(t) * r(t+l)         l = -maxlag..=maxlag
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, ensure_len, ensure_maxlag};
use crate::response::lagged::lagged_sums;
use crate::response::response_with_maxlag;

/// `(1/n) * sum_t a(t) * b(t+k)` for `k = 0..maxlag`.
pub fn cross_correlation(a: &[f64], b: &[f64], maxlag: usize) -> Result<Vec<f64>> {
    ensure_len("correlation partner", a.len(), b.len())?;
    ensure_maxlag(maxlag, a.len(), "the correlated series")?;

    let scale = 1.0 / a.len() as f64;
    // lagged_sums(r, eps, m)[m + k] = sum_t eps(t) r(t+k)
    let sums = lagged_sums(b, a, maxlag - 1);
    Ok(sums[maxlag - 1..].iter().map(|v| v * scale).collect())
}

/// Innovations split by the continuation indicator: `(eps * !sign, eps * sign)`.
pub fn split_by_indicator(eps: &[f64], sign: &[bool]) -> Result<(Vec<f64>, Vec<f64>)> {
    ensure_len("sign", eps.len(), sign.len())?;
    Ok(eps
        .iter()
        .zip(sign)
        .map(|(&e, &c)| if c { (0.0, e) } else { (e, 0.0) })
        .unzip())
}

/// Everything `estimate_tim2` consumes, measured from one sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tim2Correlations {
    pub c_nn: Vec<f64>,
    pub c_cc: Vec<f64>,
    pub c_cn: Vec<f64>,
    pub c_nc: Vec<f64>,
    /// Response to `n` events on `-maxlag..=maxlag`.
    pub s_n: Vec<f64>,
    /// Response to `c` events on `-maxlag..=maxlag`.
    pub s_c: Vec<f64>,
}

/// Measure the TIM2 correlation inputs from raw series.
pub fn tim2_correlations(
    eps: &[f64],
    sign: &[bool],
    r: &[f64],
    maxlag: usize,
) -> Result<Tim2Correlations> {
    ensure_len("r", eps.len(), r.len())?;
    let (en, ec) = split_by_indicator(eps, sign)?;

    Ok(Tim2Correlations {
        c_nn: cross_correlation(&en, &en, maxlag)?,
        c_cc: cross_correlation(&ec, &ec, maxlag)?,
        c_cn: cross_correlation(&ec, &en, maxlag)?,
        c_nc: cross_correlation(&en, &ec, maxlag)?,
        s_n: response_with_maxlag(r, &en, maxlag)?.cross,
        s_c: response_with_maxlag(r, &ec, maxlag)?.cross,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PropagatorError;

    fn assert_close(a: &[f64], b: &[f64]) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            assert!((x - y).abs() < 1e-12, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn autocorrelation_of_alternating_signs() {
        let eps = [1.0, -1.0, 1.0, -1.0];
        let c = cross_correlation(&eps, &eps, 3).unwrap();
        // 4/4, -3/4, 2/4
        assert_close(&c, &[1.0, -0.75, 0.5]);
    }

    #[test]
    fn cross_correlation_is_directional() {
        let a = [1.0, 0.0, 0.0];
        let b = [0.0, 1.0, 0.0];
        assert_close(&cross_correlation(&a, &b, 2).unwrap(), &[0.0, 1.0 / 3.0]);
        assert_close(&cross_correlation(&b, &a, 2).unwrap(), &[0.0, 0.0]);
    }

    #[test]
    fn split_partitions_events() {
        let (en, ec) = split_by_indicator(&[1.0, -1.0, 2.0], &[false, true, true]).unwrap();
        assert_eq!(en, vec![1.0, 0.0, 0.0]);
        assert_eq!(ec, vec![0.0, -1.0, 2.0]);
    }

    #[test]
    fn tim2_correlations_have_expected_shapes() {
        let eps = [1.0, 1.0, -1.0, -1.0, 1.0, -1.0];
        let sign = [false, true, false, true, false, false];
        let r = [0.5, 0.4, -0.6, -0.2, 0.3, -0.7];
        let corr = tim2_correlations(&eps, &sign, &r, 2).unwrap();
        assert_eq!(corr.c_nn.len(), 2);
        assert_eq!(corr.c_cn.len(), 2);
        assert_eq!(corr.s_n.len(), 5);
        assert_eq!(corr.s_c.len(), 5);
        // Contemporaneous cross terms vanish: an event is in one class only.
        assert_eq!(corr.c_cn[0], 0.0);
        assert_eq!(corr.c_nc[0], 0.0);
    }

    #[test]
    fn maxlag_is_validated() {
        assert!(matches!(
            cross_correlation(&[1.0], &[1.0], 0),
            Err(PropagatorError::InvalidArgument(_))
        ));
        assert!(matches!(
            cross_correlation(&[1.0], &[1.0], 2),
            Err(PropagatorError::NotEnoughData(_))
        ));
    }
}
