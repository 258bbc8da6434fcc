//! Non-parametric regularization of estimated kernels.

pub mod rbf;

pub use rbf::*;
