//! `revenue-dashboard` library crate.
//!
//! The binary (`revdash`) is a thin wrapper around this library so that:
//!
//! - every pipeline stage is testable without spawning processes or hitting the network
//! - fetchers can be swapped for in-memory fakes in tests
//! - code stays easy to navigate: one module per stage

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod normalize;
pub mod plot;
pub mod report;
