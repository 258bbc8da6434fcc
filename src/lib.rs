//! `propagator` library crate.
//!
//! Propagator models of market impact: apply a causal kernel to signed
//! order flow, estimate kernels back from observed series, and measure the
//! model-free lead-lag response.
//!
//! Layout:
//!
//! - `models`: forward direction (kernel -> output)
//! - `fit`: inverse direction (data -> kernel)
//! - `response`: empirical response and correlation functions
//! - `smooth`: tail regularization of estimated kernels

pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod math;
pub mod models;
pub mod reference;
pub mod response;
pub mod smooth;

pub use domain::{KernelPair, Response, ResponseOutput, ResponsePart, Table};
pub use error::{PropagatorError, Result};
pub use fit::{
    deconvolve_hdim2, deconvolve_tim1, deconvolve_tim2, estimate_tim1, estimate_tim1_from_series,
    estimate_tim2, estimate_tim2_from_series,
};
pub use math::{differentiate, integrate};
pub use models::{hdim2, propagate, tim1, tim2};
pub use response::{response, response_grouped_df, response_select, response_with_maxlag};
pub use smooth::{smooth_tail_rbf, smooth_tail_rbf_with};
