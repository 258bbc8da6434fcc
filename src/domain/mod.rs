//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - kernel and response containers (`KernelPair`, `Response`, `ResponsePart`)
//! - the grouped input table (`Table`, `Cell`, `GroupKey`)

pub mod table;
pub mod types;

pub use table::*;
pub use types::*;
