//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - installs logging
//! - parses CLI arguments
//! - loads settings and credentials
//! - wires the three network fetchers into the pipeline
//! - prints the run summary

use chrono::Local;
use clap::Parser;
use reqwest::blocking::Client;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::{Credentials, Settings};
use crate::data::{Endpoints, FyberDisplayFetcher, FyberVideoFetcher, MoPubFetcher, ReportFetcher};
use crate::error::AppError;
use crate::report::format::format_run_summary;

pub mod pipeline;

/// Entry point for the `revdash` binary.
pub fn run() -> Result<(), AppError> {
    init_tracing();

    let cli = Cli::parse();
    let settings = Settings::from_env();
    let credentials = Credentials::load(&settings.secrets_dir)?;

    let request = pipeline::RunRequest {
        start_date: cli.start_date,
        end_date: cli.end_date,
        today: Local::now().date_naive(),
    };

    let client = Client::builder()
        .user_agent(concat!("revdash/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| AppError::Fetch(format!("failed to build HTTP client: {e}")))?;
    let endpoints = Endpoints::default();

    let mopub = MoPubFetcher::new(client.clone(), endpoints.mopub, &credentials.mopub);
    let fyber_video = FyberVideoFetcher::new(client.clone(), endpoints.fyber_video, &credentials.fyber_video);
    let fyber_display = FyberDisplayFetcher::new(client, endpoints.fyber_display, &credentials.fyber_display);
    let fetchers: [&dyn ReportFetcher; 3] = [&mopub, &fyber_video, &fyber_display];

    info!(
        "Building dashboard for {} to {}",
        request.start_date, request.end_date
    );
    let output = pipeline::run(&request, &credentials, &fetchers, &settings.output_dir)?;

    println!("{}", format_run_summary(&output));
    Ok(())
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`).
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}
