//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the requested reporting window (`DateRange`)
//! - the enumerated labels of the common schema (`App`, `UnitType`, `Partner`)
//! - the common row schema itself (`UnifiedRecord`)

pub mod types;

pub use types::*;
