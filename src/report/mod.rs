//! Reporting utilities: pt-BR figures and the full text report.

use crate::domain::{AggregateResult, PeriodFilter};

pub mod format;

pub use format::{format_brl, format_count, format_counts, format_daily, format_percent, format_summary};

/// Timestamp layout used for "last update" (pt-BR order).
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Summary cards followed by the status, traffic and daily tables.
pub fn format_report(result: &AggregateResult, period: PeriodFilter, fetched_at: Option<&str>) -> String {
    let mut out = format_summary(result, period, fetched_at);
    out.push('\n');
    out.push_str(&format_counts("Lead status", &result.status_counts));
    out.push('\n');
    out.push_str(&format_counts("Traffic source", &result.traffic_counts));
    out.push('\n');
    out.push_str(&format_daily(result));
    out
}

/// The month index as printed by `leads months`.
pub fn format_months(months: &[PeriodFilter]) -> String {
    let mut out = String::new();
    for m in months {
        out.push_str(&m.display_name());
        out.push('\n');
    }
    out
}
