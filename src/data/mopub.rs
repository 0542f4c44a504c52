//! MoPub inventory report download.
//!
//! The custom-report API only serves one calendar day per request, so a range
//! becomes one request per day. The CSV bodies are concatenated in ascending
//! date order.

use chrono::NaiveDate;
use reqwest::blocking::Client;
use secrecy::ExposeSecret;
use tracing::{debug, info};

use crate::config::MoPubCredentials;
use crate::data::{RawTable, ReportFetcher, join_url, send_for_text};
use crate::domain::{DateRange, Partner};
use crate::error::AppError;

const REPORT_PATH: &str = "/reports/custom/api/download_report";

pub struct MoPubFetcher<'a> {
    client: Client,
    base_url: String,
    credentials: &'a MoPubCredentials,
}

impl<'a> MoPubFetcher<'a> {
    pub fn new(client: Client, base_url: impl Into<String>, credentials: &'a MoPubCredentials) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            credentials,
        }
    }

    fn fetch_day(&self, day: NaiveDate) -> Result<RawTable, AppError> {
        let date = day.format("%Y-%m-%d").to_string();
        info!("Fetching MoPub data for {date}...");

        let url = join_url(&self.base_url, REPORT_PATH);
        debug!(%url, %date, "requesting MoPub inventory report");

        let request = self.client.get(&url).query(&[
            ("report_key", self.credentials.report_key.expose_secret()),
            ("api_key", self.credentials.api_key.expose_secret()),
            ("date", date.as_str()),
        ]);

        let body = send_for_text(request, "MoPub")?;
        RawTable::from_csv(&body).map_err(|e| match e {
            AppError::Fetch(msg) => AppError::Fetch(format!("MoPub report for {date}: {msg}")),
            other => other,
        })
    }
}

impl ReportFetcher for MoPubFetcher<'_> {
    fn partner(&self) -> Partner {
        Partner::MoPub
    }

    fn fetch(&self, range: &DateRange) -> Result<RawTable, AppError> {
        let mut combined = RawTable::default();
        for day in range.days() {
            combined.append(self.fetch_day(day)?);
        }
        Ok(combined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::credentials_with;
    use mockito::Matcher;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn day_body(day: &str) -> String {
        format!(
            "Day,App,App ID,AdUnit,AdUnit ID,AdUnit Format,Country,Requests,Impressions,Clicks,Revenue\n\
             {day},IMVU iOS - #1 3D Avatar Social App,a1,Feed,u1,Native,US,10,8,1,0.5\n"
        )
    }

    #[test]
    fn issues_one_request_per_day_in_ascending_order() {
        let mut server = mockito::Server::new();
        let days = ["2021-02-27", "2021-02-28", "2021-03-01"];
        let mocks: Vec<_> = days
            .iter()
            .map(|day| {
                server
                    .mock("GET", REPORT_PATH)
                    .match_query(Matcher::AllOf(vec![
                        Matcher::UrlEncoded("date".into(), (*day).into()),
                        Matcher::UrlEncoded("report_key".into(), "secret".into()),
                        Matcher::UrlEncoded("api_key".into(), "secret".into()),
                    ]))
                    .with_status(200)
                    .with_body(day_body(day))
                    .expect(1)
                    .create()
            })
            .collect();

        let creds = credentials_with("secret");
        let fetcher = MoPubFetcher::new(Client::new(), server.url(), &creds.mopub);
        let range = DateRange::new(date(2021, 2, 27), date(2021, 3, 1)).unwrap();

        let table = fetcher.fetch(&range).unwrap();

        for mock in &mocks {
            mock.assert();
        }
        assert_eq!(table.len(), range.num_days());
        let fetched: Vec<String> = table.rows().map(|r| r.text("Day").unwrap()).collect();
        assert_eq!(fetched, days);
        assert_eq!(fetcher.partner(), Partner::MoPub);
    }

    #[test]
    fn failed_day_aborts_the_fetch() {
        let mut server = mockito::Server::new();
        let _ok = server
            .mock("GET", REPORT_PATH)
            .match_query(Matcher::UrlEncoded("date".into(), "2021-03-01".into()))
            .with_body(day_body("2021-03-01"))
            .create();
        let _broken = server
            .mock("GET", REPORT_PATH)
            .match_query(Matcher::UrlEncoded("date".into(), "2021-03-02".into()))
            .with_status(500)
            .create();

        let creds = credentials_with("secret");
        let fetcher = MoPubFetcher::new(Client::new(), server.url(), &creds.mopub);
        let range = DateRange::new(date(2021, 3, 1), date(2021, 3, 2)).unwrap();

        let err = fetcher.fetch(&range).unwrap_err();
        assert!(matches!(err, AppError::Fetch(_)));
    }

    #[test]
    fn malformed_csv_is_fetch_error() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", REPORT_PATH)
            .match_query(Matcher::Any)
            .with_body("Day,App\n2021-03-01\n")
            .create();

        let creds = credentials_with("secret");
        let fetcher = MoPubFetcher::new(Client::new(), server.url(), &creds.mopub);
        let range = DateRange::new(date(2021, 3, 1), date(2021, 3, 1)).unwrap();

        assert!(matches!(fetcher.fetch(&range), Err(AppError::Fetch(_))));
    }
}
