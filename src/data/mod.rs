//! Data sources.
//!
//! Only synthetic samples live here; callers bring their own observed series.

pub mod sample;

pub use sample::*;
