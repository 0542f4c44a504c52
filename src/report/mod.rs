//! Reporting: the combined dataset, daily pivots, and terminal output.

use tracing::warn;

use crate::domain::{DateRange, Partner, UnifiedRecord};

pub mod format;
pub mod pivot;

/// All normalized records of one run, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnifiedDataset {
    pub records: Vec<UnifiedRecord>,
}

/// Per-network totals for the run summary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartnerSummary {
    pub partner: Partner,
    pub rows: usize,
    pub impressions: u64,
    pub revenue: f64,
}

impl UnifiedDataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// One entry per partner (including partners with no rows).
    pub fn summary(&self) -> Vec<PartnerSummary> {
        Partner::ALL
            .into_iter()
            .map(|partner| {
                let rows = self.records.iter().filter(|r| r.partner == partner);
                PartnerSummary {
                    partner,
                    rows: rows.clone().count(),
                    impressions: rows.clone().map(|r| r.impressions).sum(),
                    revenue: rows.map(|r| r.revenue).sum(),
                }
            })
            .collect()
    }
}

/// Concatenate normalized record sets in the order given.
///
/// Rows dated outside `range` are dropped with a warning; the networks
/// occasionally return a boundary day when their time zone differs from ours.
pub fn combine(range: &DateRange, parts: Vec<Vec<UnifiedRecord>>) -> UnifiedDataset {
    let mut records = Vec::with_capacity(parts.iter().map(Vec::len).sum());
    for part in parts {
        for record in part {
            if range.contains(record.day) {
                records.push(record);
            } else {
                warn!(
                    partner = %record.partner,
                    day = %record.day,
                    "dropping row outside {range}"
                );
            }
        }
    }
    UnifiedDataset { records }
}
