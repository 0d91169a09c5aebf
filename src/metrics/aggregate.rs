//! Single-pass aggregation of leads into dashboard metrics.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::warn;

use crate::domain::{AggregateResult, LeadRecord, RawRow};
use crate::metrics::normalize::to_leads;

/// A status counts as a completed sale if it mentions `FECHADO` or `PAGO`
/// anywhere, or is exactly `OK`. Expects an already upper-cased status.
pub fn is_closed(status: &str) -> bool {
    status.contains("FECHADO") || status.contains("PAGO") || status == "OK"
}

/// Reduce leads to an `AggregateResult`.
///
/// A closed lead without a parseable amount still raises `total_closed` but
/// adds nothing to revenue. An amount that would overflow the running sums is
/// treated the same way, so the daily series always adds up to the total.
pub fn aggregate<'a, I>(leads: I) -> AggregateResult
where
    I: IntoIterator<Item = &'a LeadRecord>,
{
    let mut out = AggregateResult::default();

    for lead in leads {
        out.total_leads += 1;
        *out.status_counts.entry(lead.status.clone()).or_insert(0) += 1;
        *out.traffic_counts.entry(lead.traffic_source.clone()).or_insert(0) += 1;

        if !is_closed(&lead.status) {
            continue;
        }
        out.total_closed += 1;
        if let Some(amount) = lead.amount {
            add_revenue(&mut out, lead, amount);
        }
    }

    out.conversion_rate = conversion_rate(out.total_closed, out.total_leads);
    out.average_ticket = average_ticket(out.total_revenue, out.total_closed);
    out
}

fn add_revenue(out: &mut AggregateResult, lead: &LeadRecord, amount: Decimal) {
    let day = out.daily_revenue.get(&lead.date).copied().unwrap_or(Decimal::ZERO);
    match (out.total_revenue.checked_add(amount), day.checked_add(amount)) {
        (Some(total), Some(day)) => {
            out.total_revenue = total;
            out.daily_revenue.insert(lead.date, day);
        }
        _ => warn!(date = %lead.date, %amount, "amount overflows revenue; skipped"),
    }
}

/// Classify, normalize and aggregate raw rows in one call.
pub fn aggregate_rows(rows: &[RawRow]) -> AggregateResult {
    aggregate(&to_leads(rows))
}

fn conversion_rate(closed: u64, leads: u64) -> f64 {
    if leads == 0 {
        return 0.0;
    }
    closed as f64 / leads as f64 * 100.0
}

fn average_ticket(revenue: Decimal, closed: u64) -> Decimal {
    if closed == 0 {
        return Decimal::ZERO;
    }
    revenue / Decimal::from(closed)
}

/// Lossy conversion for chart axes; exact values stay in `Decimal`.
pub fn decimal_to_f64(v: Decimal) -> f64 {
    v.to_f64().unwrap_or(0.0)
}
