//! Formatted terminal output for a finished run.
//!
//! Formatting lives here so the pipeline stays free of presentation details.

use crate::app::pipeline::RunOutput;
use crate::report::PartnerSummary;

/// Format the end-of-run summary: per-partner totals and the files written.
pub fn format_run_summary(output: &RunOutput) -> String {
    let mut out = String::new();

    out.push_str("=== revdash - Mobile Ad Revenue Dashboard ===\n");
    out.push_str(&format!("Range: {}\n", output.range));
    out.push_str(&format!("Rows: {}\n", output.rows));
    out.push('\n');
    out.push_str(&format_partner_table(&output.partners));
    out.push('\n');

    out.push_str("Written:\n");
    for path in &output.written {
        out.push_str(&format!("- {}\n", path.display()));
    }

    out
}

fn format_partner_table(rows: &[PartnerSummary]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<14} {:>8} {:>14} {:>14}\n", "partner", "rows", "impressions", "revenue"));
    out.push_str(&format!("{:-<14} {:-<8} {:-<14} {:-<14}\n", "", "", "", ""));

    for r in rows {
        out.push_str(&format!(
            "{:<14} {:>8} {:>14} {:>14}\n",
            r.partner.display_name(),
            r.rows,
            r.impressions,
            fmt_usd(r.revenue),
        ));
    }

    let rows_total: usize = rows.iter().map(|r| r.rows).sum();
    let impressions_total: u64 = rows.iter().map(|r| r.impressions).sum();
    let revenue_total: f64 = rows.iter().map(|r| r.revenue).sum();
    out.push_str(&format!(
        "{:<14} {:>8} {:>14} {:>14}\n",
        "total",
        rows_total,
        impressions_total,
        fmt_usd(revenue_total),
    ));

    out
}

fn fmt_usd(v: f64) -> String {
    format!("${v:.2}")
}
