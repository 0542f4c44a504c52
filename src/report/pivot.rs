//! Daily pivots of the unified dataset.
//!
//! Each pivot has one row per day present in the dataset (ascending) and a
//! fixed, named column set. Combinations with no data read as zero, so the
//! column layout never depends on which networks or apps showed up.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{App, Partner, UnifiedRecord, UnitType};
use crate::report::UnifiedDataset;

/// Revenue per partner per day, plus daily impressions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PartnerDay {
    #[serde(rename = "Day")]
    pub day: NaiveDate,
    #[serde(rename = "Fyber")]
    pub fyber: f64,
    #[serde(rename = "Fyber_Video")]
    pub fyber_video: f64,
    #[serde(rename = "MoPub")]
    pub mopub: f64,
    #[serde(rename = "Impressions")]
    pub impressions: u64,
    #[serde(rename = "Total_Revenue")]
    pub total_revenue: f64,
}

impl PartnerDay {
    pub const COLUMNS: [&'static str; 6] = ["Day", "Fyber", "Fyber_Video", "MoPub", "Impressions", "Total_Revenue"];

    pub fn revenue(&self, partner: Partner) -> f64 {
        match partner {
            Partner::Fyber => self.fyber,
            Partner::FyberVideo => self.fyber_video,
            Partner::MoPub => self.mopub,
        }
    }

    fn revenue_mut(&mut self, partner: Partner) -> &mut f64 {
        match partner {
            Partner::Fyber => &mut self.fyber,
            Partner::FyberVideo => &mut self.fyber_video,
            Partner::MoPub => &mut self.mopub,
        }
    }
}

/// Revenue per unit type per day.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UnitTypeDay {
    #[serde(rename = "Day")]
    pub day: NaiveDate,
    pub banner: f64,
    pub native: f64,
    pub video: f64,
    #[serde(rename = "Total_Revenue")]
    pub total_revenue: f64,
}

impl UnitTypeDay {
    pub const COLUMNS: [&'static str; 5] = ["Day", "banner", "native", "video", "Total_Revenue"];

    pub fn revenue(&self, unit_type: UnitType) -> f64 {
        match unit_type {
            UnitType::Banner => self.banner,
            UnitType::Native => self.native,
            UnitType::Video => self.video,
        }
    }

    fn revenue_mut(&mut self, unit_type: UnitType) -> &mut f64 {
        match unit_type {
            UnitType::Banner => &mut self.banner,
            UnitType::Native => &mut self.native,
            UnitType::Video => &mut self.video,
        }
    }
}

/// Impressions and revenue per app per day.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppDay {
    #[serde(rename = "Day")]
    pub day: NaiveDate,
    #[serde(rename = "IMVU_Android_Impressions")]
    pub android_impressions: u64,
    #[serde(rename = "IMVU_iOS_Impressions")]
    pub ios_impressions: u64,
    #[serde(rename = "IMVU_Android_Revenue")]
    pub android_revenue: f64,
    #[serde(rename = "IMVU_iOS_Revenue")]
    pub ios_revenue: f64,
    #[serde(rename = "Total_Revenue")]
    pub total_revenue: f64,
    #[serde(rename = "Total_Impressions")]
    pub total_impressions: u64,
}

impl AppDay {
    pub const COLUMNS: [&'static str; 7] = [
        "Day",
        "IMVU_Android_Impressions",
        "IMVU_iOS_Impressions",
        "IMVU_Android_Revenue",
        "IMVU_iOS_Revenue",
        "Total_Revenue",
        "Total_Impressions",
    ];

    pub fn revenue(&self, app: App) -> f64 {
        match app {
            App::Android => self.android_revenue,
            App::Ios => self.ios_revenue,
        }
    }

    pub fn impressions(&self, app: App) -> u64 {
        match app {
            App::Android => self.android_impressions,
            App::Ios => self.ios_impressions,
        }
    }

    fn add(&mut self, record: &UnifiedRecord) {
        match record.app {
            App::Android => {
                self.android_impressions += record.impressions;
                self.android_revenue += record.revenue;
            }
            App::Ios => {
                self.ios_impressions += record.impressions;
                self.ios_revenue += record.revenue;
            }
        }
        self.total_impressions += record.impressions;
        self.total_revenue += record.revenue;
    }
}

/// The three daily views the dashboard is built from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pivots {
    pub by_partner: Vec<PartnerDay>,
    pub by_unit_type: Vec<UnitTypeDay>,
    pub by_app: Vec<AppDay>,
}

impl Pivots {
    pub fn from_dataset(dataset: &UnifiedDataset) -> Self {
        let mut by_partner: BTreeMap<NaiveDate, PartnerDay> = BTreeMap::new();
        let mut by_unit_type: BTreeMap<NaiveDate, UnitTypeDay> = BTreeMap::new();
        let mut by_app: BTreeMap<NaiveDate, AppDay> = BTreeMap::new();

        for record in &dataset.records {
            let day = record.day;

            let partner_row = by_partner.entry(day).or_insert_with(|| PartnerDay { day, ..Default::default() });
            *partner_row.revenue_mut(record.partner) += record.revenue;
            partner_row.impressions += record.impressions;
            partner_row.total_revenue += record.revenue;

            let unit_row = by_unit_type.entry(day).or_insert_with(|| UnitTypeDay { day, ..Default::default() });
            *unit_row.revenue_mut(record.unit_type) += record.revenue;
            unit_row.total_revenue += record.revenue;

            by_app
                .entry(day)
                .or_insert_with(|| AppDay { day, ..Default::default() })
                .add(record);
        }

        Self {
            by_partner: by_partner.into_values().collect(),
            by_unit_type: by_unit_type.into_values().collect(),
            by_app: by_app.into_values().collect(),
        }
    }

    /// Largest daily total revenue (0 for an empty dataset).
    pub fn max_daily_revenue(&self) -> f64 {
        self.by_partner.iter().map(|r| r.total_revenue).fold(0.0, f64::max)
    }

    /// Largest daily impression count (0 for an empty dataset).
    pub fn max_daily_impressions(&self) -> u64 {
        self.by_partner.iter().map(|r| r.impressions).max().unwrap_or(0)
    }
}
