//! Fyber Video publisher KPI report.

use reqwest::blocking::Client;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::config::FyberVideoCredentials;
use crate::data::{RawTable, ReportFetcher, join_url, send_for_text};
use crate::domain::{DateRange, Partner};
use crate::error::AppError;

const KPI_PATH: &str = "/publishers/v2/reporting/publisher-kpis.json";

pub struct FyberVideoFetcher<'a> {
    client: Client,
    base_url: String,
    credentials: &'a FyberVideoCredentials,
}

impl<'a> FyberVideoFetcher<'a> {
    pub fn new(client: Client, base_url: impl Into<String>, credentials: &'a FyberVideoCredentials) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            credentials,
        }
    }
}

#[derive(Debug, Deserialize)]
struct KpiResponse {
    data: Vec<Map<String, Value>>,
}

impl ReportFetcher for FyberVideoFetcher<'_> {
    fn partner(&self) -> Partner {
        Partner::FyberVideo
    }

    fn fetch(&self, range: &DateRange) -> Result<RawTable, AppError> {
        info!("Fetching Fyber Video data from {} to {}...", range.start(), range.end());

        let since = range.start().format("%Y-%m-%d").to_string();
        let until = range.end().format("%Y-%m-%d").to_string();
        let url = join_url(&self.base_url, KPI_PATH);
        debug!(%url, %since, %until, "requesting Fyber Video KPIs");

        let request = self
            .client
            .get(&url)
            .query(&[("since", since.as_str()), ("until", until.as_str())])
            .basic_auth(
                self.credentials.username.expose_secret(),
                Some(self.credentials.password.expose_secret()),
            );

        let body = send_for_text(request, "Fyber Video")?;
        let parsed: KpiResponse = serde_json::from_str(&body)
            .map_err(|e| AppError::Fetch(format!("failed to parse Fyber Video response: {e}")))?;

        Ok(RawTable::from_records(parsed.data))
    }
}
