//! Model-free lead-lag response estimation.
//!
//! Responsibilities:
//!
//! - response of an output series to an innovation series (`lagged`)
//! - pooled response over grouped tables without cross-group leakage (`grouped`)
//! - correlation inputs for the correlation-space kernel estimators (`correlation`)

pub mod correlation;
pub mod grouped;
pub mod lagged;

pub use correlation::*;
pub use grouped::*;
pub use lagged::*;
