//! Raw report → unified record normalization.
//!
//! One pure function per network. Each one:
//! - drops the columns that have no place in the common schema
//! - renames the rest onto the unified column names
//! - fills in the constants the network cannot supply (partner, unit type, ...)
//! - collapses the network's app spellings onto [`App`]
//!
//! Nothing here touches the network or the filesystem, so every normalizer is
//! safe to run twice on the same table.

use chrono::NaiveDate;

use crate::data::{RawRow, RawTable};
use crate::domain::{App, Partner, UnifiedRecord};
use crate::error::AppError;

pub mod fyber_display;
pub mod fyber_video;
pub mod mopub;

/// Dispatch to the normalizer for `partner`.
pub fn normalize(partner: Partner, raw: RawTable) -> Result<Vec<UnifiedRecord>, AppError> {
    match partner {
        Partner::MoPub => mopub::normalize(raw),
        Partner::FyberVideo => fyber_video::normalize(raw),
        Partner::Fyber => fyber_display::normalize(raw),
    }
}

/// Map a raw app label through `remap`, falling back to the canonical labels.
pub(crate) fn remap_app(label: &str, remap: &[(&str, App)]) -> Result<App, AppError> {
    let label = label.trim();
    remap
        .iter()
        .find(|(raw, _)| *raw == label)
        .map(|(_, app)| *app)
        .or_else(|| App::ALL.into_iter().find(|app| app.label() == label))
        .ok_or_else(|| AppError::Schema(format!("unknown app label: {label:?}")))
}

/// `YYYY-MM-DD` day cell.
pub(crate) fn parse_day(row: &RawRow<'_>, column: &str) -> Result<NaiveDate, AppError> {
    let text = row.text(column)?;
    // Some exports append a time component; only the calendar date matters.
    let date_part = text.split(['T', ' ']).next().unwrap_or_default();
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|e| {
        AppError::Schema(format!(
            "row {}: `{column}` is not a date ({text:?}): {e}",
            row.position() + 1
        ))
    })
}
