//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed between estimation, smoothing and simulation calls
//! - exported to JSON by callers for plotting or comparisons

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PropagatorError;

/// Kernels of the two-kernel models.
///
/// `gn` applies to events whose continuation indicator is `false`, `gc` to
/// events flagged `true`. Both are indexed by lag `0..maxlag`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KernelPair {
    pub gn: Vec<f64>,
    pub gc: Vec<f64>,
}

impl KernelPair {
    pub fn new(gn: Vec<f64>, gc: Vec<f64>) -> Self {
        Self { gn, gc }
    }
}

/// Empirical response over the symmetric lag axis `-maxlag..=maxlag`.
///
/// `lags`, `cross` and `response` always have length `2 * maxlag + 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Lag axis `l`.
    pub lags: Vec<i64>,
    /// Raw cross-moment `s(l) = <eps(t) r(t+l)>`.
    pub cross: Vec<f64>,
    /// Response function `<(p(t+l) - p(t)) eps(t)>` with `p` the integrated output.
    pub response: Vec<f64>,
}

impl Response {
    pub fn maxlag(&self) -> usize {
        self.lags.len() / 2
    }

    /// Index of lag zero on the axis.
    pub fn zero_index(&self) -> usize {
        self.maxlag()
    }

    /// Pick the requested part; `Lsr` returns the whole triple.
    pub fn select(self, part: ResponsePart) -> ResponseOutput {
        match part {
            ResponsePart::Lsr => ResponseOutput::All(self),
            ResponsePart::Lags => ResponseOutput::Lags(self.lags),
            ResponsePart::Cross => ResponseOutput::Cross(self.cross),
            ResponsePart::Response => ResponseOutput::Response(self.response),
        }
    }
}

/// Which part of a [`Response`] a caller wants back.
///
/// Parses from the short selectors `"lsr"`, `"l"`, `"s"` and `"r"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResponsePart {
    #[default]
    #[serde(rename = "lsr")]
    Lsr,
    #[serde(rename = "l")]
    Lags,
    #[serde(rename = "s")]
    Cross,
    #[serde(rename = "r")]
    Response,
}

impl ResponsePart {
    pub fn as_str(self) -> &'static str {
        match self {
            ResponsePart::Lsr => "lsr",
            ResponsePart::Lags => "l",
            ResponsePart::Cross => "s",
            ResponsePart::Response => "r",
        }
    }
}

impl FromStr for ResponsePart {
    type Err = PropagatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lsr" => Ok(ResponsePart::Lsr),
            "l" => Ok(ResponsePart::Lags),
            "s" => Ok(ResponsePart::Cross),
            "r" => Ok(ResponsePart::Response),
            other => Err(PropagatorError::InvalidArgument(format!(
                "Unknown response selector '{other}' (expected one of lsr, l, s, r)."
            ))),
        }
    }
}

impl fmt::Display for ResponsePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of [`crate::response::response_select`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ResponseOutput {
    All(Response),
    Lags(Vec<i64>),
    Cross(Vec<f64>),
    Response(Vec<f64>),
}
