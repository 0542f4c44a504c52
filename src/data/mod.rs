//! Ad-network report fetchers.
//!
//! One fetcher per network, all blocking and sequential:
//!
//! - `mopub`: inventory report CSV, one request per day
//! - `fyber_video`: JSON KPIs with HTTP basic auth
//! - `fyber_display`: JSON performance report with OAuth 1.0a signing (`oauth`)
//!
//! Fetchers only move bytes into a [`RawTable`]; all schema knowledge lives in
//! `crate::normalize`.

use reqwest::blocking::RequestBuilder;

use crate::domain::{DateRange, Partner};
use crate::error::AppError;

pub mod fyber_display;
pub mod fyber_video;
pub mod mopub;
pub mod oauth;
pub mod table;

pub use fyber_display::FyberDisplayFetcher;
pub use fyber_video::FyberVideoFetcher;
pub use mopub::MoPubFetcher;
pub use table::{RawRow, RawTable};

const MOPUB_BASE_URL: &str = "https://app.mopub.com";
const FYBER_VIDEO_BASE_URL: &str = "https://api.fyber.com";
const FYBER_DISPLAY_BASE_URL: &str = "https://console.inner-active.com";

/// A source of raw report rows for one ad network.
pub trait ReportFetcher {
    /// Which network this fetcher talks to (selects the matching normalizer).
    fn partner(&self) -> Partner;

    /// Download the raw report covering `range`.
    fn fetch(&self, range: &DateRange) -> Result<RawTable, AppError>;
}

/// Base URLs of the three report APIs.
///
/// Production hosts by default; tests point these at a local mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub mopub: String,
    pub fyber_video: String,
    pub fyber_display: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            mopub: MOPUB_BASE_URL.to_string(),
            fyber_video: FYBER_VIDEO_BASE_URL.to_string(),
            fyber_display: FYBER_DISPLAY_BASE_URL.to_string(),
        }
    }
}

/// Join a base URL and an absolute path without doubling the slash.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// Send a request and return the body of a successful response.
pub(crate) fn send_for_text(request: RequestBuilder, what: &str) -> Result<String, AppError> {
    let resp = request
        .send()
        .map_err(|e| AppError::Fetch(format!("{what} request failed: {e}")))?;

    if !resp.status().is_success() {
        return Err(AppError::Fetch(format!(
            "{what} request failed with status {}.",
            resp.status()
        )));
    }

    resp.text()
        .map_err(|e| AppError::Fetch(format!("failed to read {what} response: {e}")))
}
