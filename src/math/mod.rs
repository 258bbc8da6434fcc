//! Mathematical utilities: prefix sums, basis functions and least squares.

pub mod basis;
pub mod integrate;
pub mod ols;

pub use basis::*;
pub use integrate::*;
pub use ols::*;
