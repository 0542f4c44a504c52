//! MoPub inventory report.
//!
//! The report arrives at a finer grain than the unified schema (one row per
//! ad unit *and* per line item), so rows are summed per
//! `(Day, App, AdUnit, AdUnit_Format, Country)` before flattening.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::data::RawTable;
use crate::domain::{App, Partner, UnifiedRecord, UnitType};
use crate::error::AppError;
use crate::normalize::{parse_day, remap_app};

const APP_REMAP: [(&str, App); 2] = [
    ("IMVU iOS - #1 3D Avatar Social App", App::Ios),
    ("IMVU Android - #1 3D Avatar Social App", App::Android),
];

const RENAMES: [(&str, &str); 3] = [
    ("App ID", "App_ID"),
    ("AdUnit ID", "AdUnit_ID"),
    ("AdUnit Format", "AdUnit_Format"),
];

const REQUIRED: [&str; 9] = [
    "Day",
    "App",
    "AdUnit",
    "AdUnit_Format",
    "Country",
    "Requests",
    "Impressions",
    "Clicks",
    "Revenue",
];

type GroupKey = (NaiveDate, App, String, UnitType, String);

#[derive(Debug, Default, Clone, Copy)]
struct Totals {
    requests: u64,
    impressions: u64,
    clicks: u64,
    revenue: f64,
}

pub fn normalize(mut raw: RawTable) -> Result<Vec<UnifiedRecord>, AppError> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }

    raw.rename_columns(&RENAMES);
    raw.require_columns(&REQUIRED)?;

    let mut groups: BTreeMap<GroupKey, Totals> = BTreeMap::new();
    for row in raw.rows() {
        let key = (
            parse_day(&row, "Day")?,
            remap_app(&row.text("App")?, &APP_REMAP)?,
            row.text("AdUnit")?,
            unit_type(&row.text("AdUnit_Format")?)?,
            row.text("Country")?,
        );
        let totals = groups.entry(key).or_default();
        totals.requests += row.count("Requests")?;
        totals.impressions += row.count("Impressions")?;
        totals.clicks += row.count("Clicks")?;
        totals.revenue += row.amount("Revenue")?;
    }

    Ok(groups
        .into_iter()
        .map(|((day, app, ad_unit, unit_type, country), totals)| UnifiedRecord {
            day,
            app,
            ad_unit,
            unit_type,
            country,
            // MoPub counts every request as code served.
            total_code_served: totals.requests,
            requests: totals.requests,
            impressions: totals.impressions,
            clicks: totals.clicks,
            revenue: totals.revenue,
            partner: Partner::MoPub,
        })
        .collect())
}

fn unit_type(format: &str) -> Result<UnitType, AppError> {
    match format {
        "Banner" => Ok(UnitType::Banner),
        "Native" => Ok(UnitType::Native),
        "Rewarded video" => Ok(UnitType::Video),
        other => Err(AppError::Schema(format!("unknown MoPub ad format: {other:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "Day,App,App ID,AdUnit,AdUnit ID,AdUnit Format,Country,Requests,Impressions,Clicks,Revenue";

    fn table(rows: &[&str]) -> RawTable {
        let mut body = String::from(HEADER);
        for row in rows {
            body.push('\n');
            body.push_str(row);
        }
        RawTable::from_csv(&body).unwrap()
    }

    #[test]
    fn duplicate_keys_are_summed() {
        let raw = table(&[
            "2021-03-01,IMVU iOS - #1 3D Avatar Social App,a1,Feed,u1,Native,US,10,8,1,0.50",
            "2021-03-01,IMVU iOS - #1 3D Avatar Social App,a1,Feed,u1,Native,US,5,4,0,0.25",
            "2021-03-01,IMVU Android - #1 3D Avatar Social App,a2,Feed,u2,Native,US,3,3,0,0.10",
        ]);

        let records = normalize(raw).unwrap();
        assert_eq!(records.len(), 2);

        // BTreeMap order: Android sorts before iOS.
        assert_eq!(records[0].app, App::Android);
        let ios = &records[1];
        assert_eq!(ios.app, App::Ios);
        assert_eq!(ios.requests, 15);
        assert_eq!(ios.total_code_served, 15);
        assert_eq!(ios.impressions, 12);
        assert_eq!(ios.clicks, 1);
        assert!((ios.revenue - 0.75).abs() < 1e-9);
        assert_eq!(ios.unit_type, UnitType::Native);
        assert_eq!(ios.partner, Partner::MoPub);
    }

    #[test]
    fn formats_map_to_unit_types() {
        let raw = table(&[
            "2021-03-01,IMVU iOS - #1 3D Avatar Social App,a1,Top,u1,Banner,US,1,1,0,0.1",
            "2021-03-01,IMVU iOS - #1 3D Avatar Social App,a1,Reward,u3,Rewarded video,US,1,1,0,0.1",
        ]);
        let types: Vec<_> = normalize(raw).unwrap().into_iter().map(|r| r.unit_type).collect();
        assert_eq!(types, [UnitType::Video, UnitType::Banner]);
    }

    #[test]
    fn output_is_sorted_by_group_key() {
        let raw = table(&[
            "2021-03-02,IMVU iOS - #1 3D Avatar Social App,a1,Feed,u1,Native,US,1,1,0,0.1",
            "2021-03-01,IMVU iOS - #1 3D Avatar Social App,a1,Feed,u1,Native,US,1,1,0,0.1",
            "2021-03-01,IMVU iOS - #1 3D Avatar Social App,a1,Feed,u1,Native,CA,1,1,0,0.1",
        ]);
        let keys: Vec<_> = normalize(raw)
            .unwrap()
            .into_iter()
            .map(|r| (r.day.to_string(), r.country))
            .collect();
        assert_eq!(
            keys,
            [
                ("2021-03-01".to_string(), "CA".to_string()),
                ("2021-03-01".to_string(), "US".to_string()),
                ("2021-03-02".to_string(), "US".to_string()),
            ]
        );
    }

    #[test]
    fn unknown_values_are_schema_errors() {
        let unknown_app = table(&["2021-03-01,Other App,a1,Feed,u1,Native,US,1,1,0,0.1"]);
        assert!(matches!(normalize(unknown_app), Err(AppError::Schema(_))));

        let unknown_format = table(&[
            "2021-03-01,IMVU iOS - #1 3D Avatar Social App,a1,Feed,u1,Interstitial,US,1,1,0,0.1",
        ]);
        assert!(matches!(normalize(unknown_format), Err(AppError::Schema(_))));
    }

    #[test]
    fn missing_column_is_schema_error() {
        let raw = RawTable::from_csv("Day,App\n2021-03-01,IMVU iOS\n").unwrap();
        assert!(matches!(normalize(raw), Err(AppError::Schema(_))));
    }

    #[test]
    fn same_input_normalizes_identically() {
        let raw = table(&["2021-03-01,IMVU iOS - #1 3D Avatar Social App,a1,Feed,u1,Native,US,10,8,1,0.5"]);
        assert_eq!(normalize(raw.clone()).unwrap(), normalize(raw).unwrap());
    }
}
