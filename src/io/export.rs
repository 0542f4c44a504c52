//! Write run artifacts: the unified CSV, the pivot audit CSVs and the dashboard.
//!
//! Every file is created fresh (truncating any previous run's output). The
//! pipeline only calls into this module after all fetching and normalization
//! has succeeded, so a failed run never leaves a partial dataset behind.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::domain::UnifiedRecord;
use crate::error::AppError;
use crate::report::UnifiedDataset;
use crate::report::pivot::{AppDay, PartnerDay, Pivots, UnitTypeDay};

pub const UNIFIED_CSV: &str = "revenue_performance_data.csv";
pub const PARTNER_PIVOT_CSV: &str = "revenue-by-day-by-partner.csv";
pub const UNIT_TYPE_PIVOT_CSV: &str = "revenue-by-day-by-adtype.csv";
pub const APP_PIVOT_CSV: &str = "revenue-by-day-by-app.csv";
pub const DASHBOARD_HTML: &str = "dashboard.html";

/// Write the unified dataset, one row per record, header included.
pub fn write_unified_csv(path: &Path, dataset: &UnifiedDataset) -> Result<(), AppError> {
    write_csv(path, &UnifiedRecord::COLUMNS, &dataset.records)?;
    info!("Wrote {} rows to {}", dataset.len(), path.display());
    Ok(())
}

/// Write the three pivot tables into `dir`; returns the paths written.
pub fn write_pivot_csvs(dir: &Path, pivots: &Pivots) -> Result<Vec<PathBuf>, AppError> {
    let partner = dir.join(PARTNER_PIVOT_CSV);
    let unit_type = dir.join(UNIT_TYPE_PIVOT_CSV);
    let app = dir.join(APP_PIVOT_CSV);

    write_csv(&partner, &PartnerDay::COLUMNS, &pivots.by_partner)?;
    write_csv(&unit_type, &UnitTypeDay::COLUMNS, &pivots.by_unit_type)?;
    write_csv(&app, &AppDay::COLUMNS, &pivots.by_app)?;

    Ok(vec![partner, unit_type, app])
}

pub fn write_dashboard_html(path: &Path, html: &str) -> Result<(), AppError> {
    fs::write(path, html)
        .map_err(|e| AppError::Output(format!("failed to write '{}': {e}", path.display())))?;
    info!("Wrote dashboard to {}", path.display());
    Ok(())
}

/// Create the output directory if it does not exist yet.
pub fn ensure_output_dir(dir: &Path) -> Result<(), AppError> {
    fs::create_dir_all(dir)
        .map_err(|e| AppError::Output(format!("failed to create output directory '{}': {e}", dir.display())))
}

/// `header` is only written explicitly for empty tables; otherwise the csv
/// writer derives it from the first serialized row.
fn write_csv<T: Serialize>(path: &Path, header: &[&str], rows: &[T]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::Output(format!("failed to create '{}': {e}", path.display())))?;

    if rows.is_empty() {
        writer
            .write_record(header)
            .map_err(|e| AppError::Output(format!("failed to write header to '{}': {e}", path.display())))?;
    }

    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::Output(format!("failed to write row to '{}': {e}", path.display())))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::Output(format!("failed to flush '{}': {e}", path.display())))
}
