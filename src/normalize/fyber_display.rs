//! Fyber Display performance report.
//!
//! Only the iOS app runs display inventory through Fyber, and everything it
//! serves is a banner, so both are constants. Days arrive as Unix seconds.

use chrono::DateTime;

use crate::data::{RawRow, RawTable};
use crate::domain::{App, Partner, UnifiedRecord, UnitType};
use crate::error::AppError;

const DROPPED: [&str; 8] = [
    "contentCategories",
    "contentId",
    "contentName",
    "publisherId",
    "distributorName",
    "ecpm",
    "ctr",
    "fillRate",
];

const RENAMES: [(&str, &str); 7] = [
    ("adRequests", "Requests"),
    ("applicationName", "AdUnit"),
    ("clicks", "Clicks"),
    ("country", "Country"),
    ("date", "Day"),
    ("revenue", "Revenue"),
    ("impressions", "Impressions"),
];

const REQUIRED: [&str; 7] = ["Day", "AdUnit", "Country", "Requests", "Impressions", "Clicks", "Revenue"];

pub fn normalize(mut raw: RawTable) -> Result<Vec<UnifiedRecord>, AppError> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }

    raw.drop_columns(&DROPPED)?;
    raw.rename_columns(&RENAMES);
    raw.require_columns(&REQUIRED)?;

    raw.rows()
        .map(|row| {
            Ok(UnifiedRecord {
                day: utc_day(&row)?,
                app: App::Ios,
                ad_unit: row.text("AdUnit")?,
                unit_type: UnitType::Banner,
                country: row.text("Country")?,
                total_code_served: 0,
                requests: row.count("Requests")?,
                impressions: row.count("Impressions")?,
                clicks: row.count("Clicks")?,
                revenue: row.amount("Revenue")?,
                partner: Partner::Fyber,
            })
        })
        .collect()
}

fn utc_day(row: &RawRow<'_>) -> Result<chrono::NaiveDate, AppError> {
    let secs = row.timestamp("Day")?;
    DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.date_naive())
        .ok_or_else(|| {
            AppError::Schema(format!(
                "row {}: `Day` timestamp {secs} is out of range",
                row.position() + 1
            ))
        })
}
