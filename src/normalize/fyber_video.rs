//! Fyber Video KPI report.

use crate::data::RawTable;
use crate::domain::{App, Partner, UnifiedRecord, UnitType};
use crate::error::AppError;
use crate::normalize::{parse_day, remap_app};

const DROPPED: [&str; 7] = [
    "application_id",
    "completions",
    "ecpm_eur",
    "ecpm_usd",
    "fills",
    "revenue_eur",
    "unique_impressions",
];

const RENAMES: [(&str, &str); 7] = [
    ("date", "Day"),
    ("application_name", "App"),
    ("ad_format", "AdUnit"),
    ("country", "Country"),
    ("requests", "Requests"),
    ("impressions", "Impressions"),
    ("revenue_usd", "Revenue"),
];

const REQUIRED: [&str; 7] = ["Day", "App", "AdUnit", "Country", "Requests", "Impressions", "Revenue"];

const APP_REMAP: [(&str, App); 3] = [
    ("IMVU iOS Primary Wall", App::Ios),
    ("IMVU iOS External Offer Wall", App::Ios),
    ("IMVU Google Play", App::Android),
];

/// Offer-wall bundles reported alongside the apps; not products of their own.
const PLACEHOLDER_APPS: [&str; 2] = ["Blue Bar Bundle", "NEXT Featured Offers"];

pub fn normalize(mut raw: RawTable) -> Result<Vec<UnifiedRecord>, AppError> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }

    raw.fill_nulls_with_zero();
    raw.drop_columns(&DROPPED)?;
    raw.rename_columns(&RENAMES);
    raw.require_columns(&REQUIRED)?;

    let mut records = Vec::with_capacity(raw.len());
    for row in raw.rows() {
        let label = row.text("App")?;
        if PLACEHOLDER_APPS.contains(&label.as_str()) {
            continue;
        }

        records.push(UnifiedRecord {
            day: parse_day(&row, "Day")?,
            app: remap_app(&label, &APP_REMAP)?,
            ad_unit: row.text("AdUnit")?,
            unit_type: UnitType::Video,
            country: row.text("Country")?,
            total_code_served: 0,
            requests: row.count("Requests")?,
            impressions: row.count("Impressions")?,
            clicks: 0,
            revenue: row.amount("Revenue")?,
            partner: Partner::FyberVideo,
        });
    }
    Ok(records)
}
