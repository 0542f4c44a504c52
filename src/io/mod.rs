//! Input/output helpers.
//!
//! - run artifacts: unified CSV, pivot audit CSVs, dashboard HTML (`export`)

pub mod export;

pub use export::*;
