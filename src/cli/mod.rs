//! Command-line parsing for the revenue dashboard.
//!
//! Argument parsing stays here, separate from fetching and reporting.

use chrono::NaiveDate;
use clap::Parser;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "revdash",
    version,
    about = "Mobile ad revenue dashboard (MoPub, Fyber Video, Fyber Display)"
)]
pub struct Cli {
    /// First day of the report (YYYY-MM-DD).
    #[arg(short = 's', long, value_name = "YYYY-MM-DD", value_parser = parse_date)]
    pub start_date: NaiveDate,

    /// Last day of the report (YYYY-MM-DD); must be before today.
    #[arg(short = 'e', long, value_name = "YYYY-MM-DD", value_parser = parse_date)]
    pub end_date: NaiveDate,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD, got '{s}': {e}"))
}
