//! The end-to-end dashboard run.
//!
//! validate -> check credentials -> fetch + normalize (per network, in order)
//! -> combine -> pivot + chart -> write artifacts
//!
//! Fetchers are passed in as trait objects so the whole flow can be exercised
//! without touching the network. Nothing is written until every upstream step
//! has succeeded.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::info;

use crate::config::Credentials;
use crate::data::ReportFetcher;
use crate::domain::DateRange;
use crate::error::AppError;
use crate::io::export;
use crate::normalize::normalize;
use crate::plot::{build_figures, render_html};
use crate::report::pivot::Pivots;
use crate::report::{PartnerSummary, combine};

const DASHBOARD_TITLE: &str = "IMVU Mobile Ad Revenue";

/// What the user asked for, plus the local date the run happens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub today: NaiveDate,
}

/// Summary of a finished run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub range: DateRange,
    pub rows: usize,
    pub partners: Vec<PartnerSummary>,
    pub written: Vec<PathBuf>,
}

/// Execute the full pipeline and write every artifact into `output_dir`.
pub fn run(
    request: &RunRequest,
    credentials: &Credentials,
    fetchers: &[&dyn ReportFetcher],
    output_dir: &Path,
) -> Result<RunOutput, AppError> {
    // 1) Validate the range before anything else.
    let range = DateRange::new(request.start_date, request.end_date)?;
    range.ensure_reportable(request.today)?;

    // 2) Refuse template credentials before any request goes out.
    credentials.ensure_configured()?;

    // 3) Fetch and normalize each network in turn.
    let mut parts = Vec::with_capacity(fetchers.len());
    for fetcher in fetchers {
        let partner = fetcher.partner();
        let raw = fetcher.fetch(&range)?;
        info!("Cleaning {} data ({} raw rows)...", partner.display_name(), raw.len());
        parts.push(normalize(partner, raw)?);
    }

    // 4) Combine and build everything in memory.
    let dataset = combine(&range, parts);
    let pivots = Pivots::from_dataset(&dataset);
    let html = render_html(DASHBOARD_TITLE, &build_figures(&pivots))?;

    // 5) Write artifacts.
    export::ensure_output_dir(output_dir)?;
    let unified = output_dir.join(export::UNIFIED_CSV);
    export::write_unified_csv(&unified, &dataset)?;
    let mut written = vec![unified];
    written.extend(export::write_pivot_csvs(output_dir, &pivots)?);
    let dashboard = output_dir.join(export::DASHBOARD_HTML);
    export::write_dashboard_html(&dashboard, &html)?;
    written.push(dashboard);

    Ok(RunOutput {
        range,
        rows: dataset.len(),
        partners: dataset.summary(),
        written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use serde_json::json;

    use crate::config::PLACEHOLDER_SECRET;
    use crate::config::tests::credentials_with;
    use crate::data::RawTable;
    use crate::domain::Partner;

    struct StubFetcher {
        partner: Partner,
        table: Result<RawTable, AppError>,
        calls: Cell<usize>,
    }

    impl StubFetcher {
        fn new(partner: Partner, table: RawTable) -> Self {
            Self {
                partner,
                table: Ok(table),
                calls: Cell::new(0),
            }
        }

        fn failing(partner: Partner) -> Self {
            Self {
                partner,
                table: Err(AppError::Fetch("boom".into())),
                calls: Cell::new(0),
            }
        }
    }

    impl ReportFetcher for StubFetcher {
        fn partner(&self) -> Partner {
            self.partner
        }

        fn fetch(&self, _range: &DateRange) -> Result<RawTable, AppError> {
            self.calls.set(self.calls.get() + 1);
            self.table.clone()
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 3, d).unwrap()
    }

    fn request(end_day: u32) -> RunRequest {
        RunRequest {
            start_date: date(1),
            end_date: date(end_day),
            today: date(10),
        }
    }

    fn mopub_raw() -> RawTable {
        RawTable::from_csv(
            "Day,App,App ID,AdUnit,AdUnit ID,AdUnit Format,Country,Requests,Impressions,Clicks,Revenue\n\
             2021-03-01,IMVU iOS - #1 3D Avatar Social App,a1,Feed,u1,Native,US,10,8,1,0.5\n\
             2021-03-01,IMVU iOS - #1 3D Avatar Social App,a1,Feed,u1,Native,US,10,8,1,0.5\n\
             2021-03-02,IMVU Android - #1 3D Avatar Social App,a2,Top,u2,Banner,US,4,4,0,0.1\n",
        )
        .unwrap()
    }

    fn video_raw() -> RawTable {
        let row = |app: &str| {
            json!({
                "date": "2021-03-01", "application_id": 1, "application_name": app,
                "ad_format": "rewarded", "country": "US", "requests": "100",
                "impressions": "80", "clicks": 0, "completions": 70, "fills": 90,
                "ecpm_eur": 1.0, "ecpm_usd": 1.2, "revenue_eur": 10.0,
                "revenue_usd": 12.5, "unique_impressions": 60
            })
        };
        RawTable::from_records(
            serde_json::from_value(json!([row("IMVU Google Play"), row("NEXT Featured Offers")])).unwrap(),
        )
    }

    fn display_raw() -> RawTable {
        RawTable::from_records(
            serde_json::from_value(json!([{
                "date": 1_614_643_200, "applicationName": "Banner_Home", "adRequests": 50,
                "impressions": 40, "clicks": 2, "revenue": 0.75, "country": "DE",
                "contentCategories": [], "contentId": 1, "contentName": "IMVU",
                "publisherId": 2, "distributorName": "IMVU", "ecpm": 1.0, "ctr": 0.05,
                "fillRate": 0.8
            }]))
            .unwrap(),
        )
    }

    fn stubs() -> [StubFetcher; 3] {
        [
            StubFetcher::new(Partner::MoPub, mopub_raw()),
            StubFetcher::new(Partner::FyberVideo, video_raw()),
            StubFetcher::new(Partner::Fyber, display_raw()),
        ]
    }

    fn as_dyn(stubs: &[StubFetcher]) -> Vec<&dyn ReportFetcher> {
        stubs.iter().map(|s| s as &dyn ReportFetcher).collect()
    }

    fn dir_is_empty(dir: &Path) -> bool {
        std::fs::read_dir(dir).unwrap().next().is_none()
    }

    #[test]
    fn happy_path_writes_every_artifact() {
        let out = tempfile::tempdir().unwrap();
        let stubs = stubs();
        let creds = credentials_with("configured");

        let run = run(&request(2), &creds, &as_dyn(&stubs), out.path()).unwrap();

        // MoPub: 3 raw rows -> 2 groups; video: 1 of 2 survives; display: 1.
        assert_eq!(run.rows, 4);
        assert_eq!(run.partners.iter().map(|p| p.rows).sum::<usize>(), run.rows);
        assert!(stubs.iter().all(|s| s.calls.get() == 1));

        for name in [
            export::UNIFIED_CSV,
            export::PARTNER_PIVOT_CSV,
            export::UNIT_TYPE_PIVOT_CSV,
            export::APP_PIVOT_CSV,
            export::DASHBOARD_HTML,
        ] {
            assert!(out.path().join(name).exists(), "{name} not written");
        }
        assert_eq!(run.written.len(), 5);

        let csv = std::fs::read_to_string(out.path().join(export::UNIFIED_CSV)).unwrap();
        assert_eq!(csv.lines().count(), 1 + run.rows);
    }

    #[test]
    fn placeholder_credentials_abort_before_fetching() {
        let out = tempfile::tempdir().unwrap();
        let stubs = stubs();
        let creds = credentials_with(PLACEHOLDER_SECRET);

        let err = run(&request(2), &creds, &as_dyn(&stubs), out.path()).unwrap_err();

        assert!(matches!(err, AppError::Configuration(_)));
        assert!(stubs.iter().all(|s| s.calls.get() == 0));
        assert!(dir_is_empty(out.path()));
    }

    #[test]
    fn end_date_today_writes_nothing() {
        let out = tempfile::tempdir().unwrap();
        let stubs = stubs();
        let creds = credentials_with("configured");

        let err = run(&request(10), &creds, &as_dyn(&stubs), out.path()).unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.exit_code(), 3);
        assert!(stubs.iter().all(|s| s.calls.get() == 0));
        assert!(dir_is_empty(out.path()));
    }

    #[test]
    fn reversed_range_is_validation_error() {
        let out = tempfile::tempdir().unwrap();
        let creds = credentials_with("configured");
        let req = RunRequest {
            start_date: date(5),
            end_date: date(4),
            today: date(10),
        };
        let err = run(&req, &creds, &[], out.path()).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn failed_fetch_leaves_no_partial_output() {
        let out = tempfile::tempdir().unwrap();
        let stubs = [
            StubFetcher::new(Partner::MoPub, mopub_raw()),
            StubFetcher::failing(Partner::FyberVideo),
            StubFetcher::new(Partner::Fyber, display_raw()),
        ];
        let creds = credentials_with("configured");

        let err = run(&request(2), &creds, &as_dyn(&stubs), out.path()).unwrap_err();

        assert!(matches!(err, AppError::Fetch(_)));
        assert_eq!(stubs[2].calls.get(), 0);
        assert!(dir_is_empty(out.path()));
    }

    #[test]
    fn schema_error_leaves_no_partial_output() {
        let out = tempfile::tempdir().unwrap();
        let stubs = [StubFetcher::new(
            Partner::FyberVideo,
            RawTable::from_csv("date,application_name\n2021-03-01,IMVU Google Play\n").unwrap(),
        )];
        let creds = credentials_with("configured");

        let err = run(&request(2), &creds, &as_dyn(&stubs), out.path()).unwrap_err();

        assert!(matches!(err, AppError::Schema(_)));
        assert!(dir_is_empty(out.path()));
    }
}
