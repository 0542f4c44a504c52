//! Fyber Display (inner-active) publisher performance report.
//!
//! The report window is expressed as Unix timestamps in the path. MoPub and
//! Fyber Video report in Pacific time while this API does not, so the start
//! bound is pulled back by a fixed four hours to line the three sources up.

use chrono::{Local, TimeZone};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use secrecy::ExposeSecret;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::config::FyberDisplayCredentials;
use crate::data::oauth::OAuth1Signer;
use crate::data::{RawTable, ReportFetcher, join_url, send_for_text};
use crate::domain::{DateRange, Partner};
use crate::error::AppError;

const PERFORMANCE_PATH: &str = "/iamp/services/performance/publisher";

/// Seconds subtracted from the start timestamp (4 hours).
pub const PACIFIC_ALIGNMENT_SECS: i64 = 4 * 60 * 60;

pub struct FyberDisplayFetcher<'a> {
    client: Client,
    base_url: String,
    credentials: &'a FyberDisplayCredentials,
}

impl<'a> FyberDisplayFetcher<'a> {
    pub fn new(client: Client, base_url: impl Into<String>, credentials: &'a FyberDisplayCredentials) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            credentials,
        }
    }
}

impl ReportFetcher for FyberDisplayFetcher<'_> {
    fn partner(&self) -> Partner {
        Partner::Fyber
    }

    fn fetch(&self, range: &DateRange) -> Result<RawTable, AppError> {
        info!("Fetching Fyber Display data from {} to {}...", range.start(), range.end());

        let (start_ts, end_ts) = report_window(range, &Local)?;
        let url = join_url(
            &self.base_url,
            &format!(
                "{PERFORMANCE_PATH}/{}/{start_ts}/{end_ts}",
                self.credentials.publisher_id.expose_secret()
            ),
        );
        debug!(start_ts, end_ts, "requesting Fyber Display performance report");

        let signer = OAuth1Signer::new(
            self.credentials.consumer_key.expose_secret(),
            self.credentials.consumer_secret.expose_secret(),
        );
        let authorization = signer.authorization_header("GET", &url, &[])?;

        let request = self
            .client
            .get(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, authorization);

        let body = send_for_text(request, "Fyber Display")?;
        let records: Vec<Map<String, Value>> = serde_json::from_str(&body)
            .map_err(|e| AppError::Fetch(format!("failed to parse Fyber Display response: {e}")))?;

        Ok(RawTable::from_records(records))
    }
}

/// Unix-second bounds for `range`: local midnight of the start day minus the
/// alignment offset, and local midnight of the end day.
pub fn report_window<Tz: TimeZone>(range: &DateRange, tz: &Tz) -> Result<(i64, i64), AppError> {
    let start = midnight_timestamp(range.start(), tz)? - PACIFIC_ALIGNMENT_SECS;
    let end = midnight_timestamp(range.end(), tz)?;
    Ok((start, end))
}

fn midnight_timestamp<Tz: TimeZone>(day: chrono::NaiveDate, tz: &Tz) -> Result<i64, AppError> {
    day.and_hms_opt(0, 0, 0)
        .and_then(|midnight| tz.from_local_datetime(&midnight).earliest())
        .map(|dt| dt.timestamp())
        .ok_or_else(|| AppError::Fetch(format!("no local midnight exists for {day}")))
}
