//! Kernel estimation (inverse direction: data -> kernel).
//!
//! Responsibilities:
//!
//! - solve the correlation-space normal equations for TIM1 / TIM2 (`estimator`)
//! - deconvolve raw series directly in the time domain, including HDIM2 (`deconvolve`)

pub mod deconvolve;
pub mod estimator;

pub use deconvolve::*;
pub use estimator::*;
