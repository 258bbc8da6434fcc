//! Propagator model implementations (forward direction: kernel -> output).
//!
//! Models are implemented as small, pure functions so that estimation code can
//! stay generic.

pub mod propagate;
pub mod two_kernel;

pub use propagate::*;
pub use two_kernel::*;
