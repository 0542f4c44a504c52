//! Shared domain types.
//!
//! These types are intentionally kept small and serializable so they can be:
//!
//! - produced by the normalizers
//! - written straight to the unified CSV (column names come from the serde renames)
//! - pivoted for the dashboard charts

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::AppError;

/// Inclusive calendar-date range `[start, end]` requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AppError> {
        if end < start {
            return Err(AppError::Validation(format!(
                "end date {end} is before start date {start}."
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days in the range, both ends included.
    pub fn num_days(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    /// Every day of the range in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take(self.num_days())
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Reject ranges the networks cannot report on yet.
    ///
    /// MoPub never returns complete same-day data, so the end date must be
    /// strictly before `today` (the run's local date).
    pub fn ensure_reportable(&self, today: NaiveDate) -> Result<(), AppError> {
        if self.end == today {
            return Err(AppError::Validation(
                "end date can't be today: MoPub doesn't provide same-day data via its API.".into(),
            ));
        }
        if self.end > today {
            return Err(AppError::Validation(format!(
                "end date {} is in the future (today is {today}).",
                self.end
            )));
        }
        Ok(())
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Canonical app + platform label.
///
/// Each network spells the app differently; the normalizers collapse every
/// known variant onto one of these two values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum App {
    #[serde(rename = "IMVU Android")]
    Android,
    #[serde(rename = "IMVU iOS")]
    Ios,
}

impl App {
    pub const ALL: [App; 2] = [App::Android, App::Ios];

    pub fn label(self) -> &'static str {
        match self {
            App::Android => "IMVU Android",
            App::Ios => "IMVU iOS",
        }
    }

    /// Short platform name used in chart legends and tooltips.
    pub fn platform(self) -> &'static str {
        match self {
            App::Android => "Android",
            App::Ios => "iOS",
        }
    }
}

impl fmt::Display for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ad format category after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    Banner,
    Native,
    Video,
}

impl UnitType {
    pub const ALL: [UnitType; 3] = [UnitType::Banner, UnitType::Native, UnitType::Video];

    pub fn label(self) -> &'static str {
        match self {
            UnitType::Banner => "banner",
            UnitType::Native => "native",
            UnitType::Video => "video",
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The ad network a row was reported by.
///
/// Variant order matches the alphabetical column order of the partner pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Partner {
    #[serde(rename = "Fyber")]
    Fyber,
    #[serde(rename = "Fyber_Video")]
    FyberVideo,
    #[serde(rename = "MoPub")]
    MoPub,
}

impl Partner {
    pub const ALL: [Partner; 3] = [Partner::Fyber, Partner::FyberVideo, Partner::MoPub];

    pub fn label(self) -> &'static str {
        match self {
            Partner::Fyber => "Fyber",
            Partner::FyberVideo => "Fyber_Video",
            Partner::MoPub => "MoPub",
        }
    }

    /// Human-facing name (tooltips, log lines).
    pub fn display_name(self) -> &'static str {
        match self {
            Partner::Fyber => "Fyber Display",
            Partner::FyberVideo => "Fyber Video",
            Partner::MoPub => "MoPub",
        }
    }
}

impl fmt::Display for Partner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the common schema all three networks converge to.
///
/// Field order is the column order of the unified CSV and must not change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnifiedRecord {
    #[serde(rename = "Day")]
    pub day: NaiveDate,
    #[serde(rename = "App")]
    pub app: App,
    #[serde(rename = "AdUnit")]
    pub ad_unit: String,
    #[serde(rename = "UnitType")]
    pub unit_type: UnitType,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Total_Code_Served")]
    pub total_code_served: u64,
    #[serde(rename = "Requests")]
    pub requests: u64,
    #[serde(rename = "Impressions")]
    pub impressions: u64,
    #[serde(rename = "Clicks")]
    pub clicks: u64,
    #[serde(rename = "Revenue")]
    pub revenue: f64,
    #[serde(rename = "Partner")]
    pub partner: Partner,
}

impl UnifiedRecord {
    pub const COLUMNS: [&'static str; 11] = [
        "Day",
        "App",
        "AdUnit",
        "UnitType",
        "Country",
        "Total_Code_Served",
        "Requests",
        "Impressions",
        "Clicks",
        "Revenue",
        "Partner",
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn range_days_are_inclusive_and_ascending() {
        let range = DateRange::new(date(2021, 2, 27), date(2021, 3, 2)).unwrap();
        let days: Vec<_> = range.days().collect();
        assert_eq!(range.num_days(), 4);
        assert_eq!(
            days,
            vec![date(2021, 2, 27), date(2021, 2, 28), date(2021, 3, 1), date(2021, 3, 2)]
        );
    }

    #[test]
    fn single_day_range() {
        let range = DateRange::new(date(2021, 3, 1), date(2021, 3, 1)).unwrap();
        assert_eq!(range.days().count(), 1);
    }

    #[test]
    fn reversed_range_is_rejected() {
        let err = DateRange::new(date(2021, 3, 2), date(2021, 3, 1)).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn end_date_today_or_later_is_not_reportable() {
        let today = date(2021, 3, 10);
        let ending_today = DateRange::new(date(2021, 3, 1), today).unwrap();
        assert!(matches!(
            ending_today.ensure_reportable(today),
            Err(AppError::Validation(_))
        ));

        let future = DateRange::new(date(2021, 3, 1), date(2021, 3, 11)).unwrap();
        assert!(future.ensure_reportable(today).is_err());

        let past = DateRange::new(date(2021, 3, 1), date(2021, 3, 9)).unwrap();
        assert!(past.ensure_reportable(today).is_ok());
    }

    #[test]
    fn enum_labels_match_serde_names() {
        for app in App::ALL {
            assert_eq!(serde_json::to_string(&app).unwrap(), format!("\"{}\"", app.label()));
        }
        for unit in UnitType::ALL {
            assert_eq!(serde_json::to_string(&unit).unwrap(), format!("\"{}\"", unit.label()));
        }
        for partner in Partner::ALL {
            assert_eq!(
                serde_json::to_string(&partner).unwrap(),
                format!("\"{}\"", partner.label())
            );
        }
    }
}
