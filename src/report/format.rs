//! pt-BR display formatting and the plain-text summary.
//!
//! We keep formatting code in one place so:
//! - the aggregation code stays free of presentation concerns
//! - the TUI and the text report print identical figures

use num_format::{Locale, ToFormattedString};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::{AggregateResult, PeriodFilter};

/// CLDR `pt` is Brazilian Portuguese: `.` groups thousands.
const LOCALE: Locale = Locale::pt;

/// Group an integer with pt-BR thousands separators (`1.234`).
pub fn format_count(n: u64) -> String {
    n.to_formatted_string(&LOCALE)
}

/// Brazilian real, two decimals, rounded half away from zero: `R$ 1.367,63`.
pub fn format_brl(v: Decimal) -> String {
    let rounded = v.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let abs = rounded.abs();

    let units = abs.trunc();
    let cents = ((abs - units) * Decimal::ONE_HUNDRED).trunc();
    let units = units.to_u64().unwrap_or(u64::MAX);
    let cents = cents.to_u64().unwrap_or(0);

    format!("{sign}R$ {},{cents:02}", format_count(units))
}

/// One-decimal percentage with a decimal comma: `33,3%`.
pub fn format_percent(v: f64) -> String {
    let v = if v.is_finite() { v } else { 0.0 };
    format!("{v:.1}%").replace('.', ",")
}

/// Format the summary cards.
pub fn format_summary(result: &AggregateResult, period: PeriodFilter, fetched_at: Option<&str>) -> String {
    let mut out = String::new();

    out.push_str("=== leads - sales dashboard ===\n");
    out.push_str(&format!("Period: {}\n", period.display_name()));
    if let Some(ts) = fetched_at {
        out.push_str(&format!("Last update: {ts}\n"));
    }
    out.push('\n');

    let cards = [
        ("Total sales", format_brl(result.total_revenue)),
        ("Closed", format_count(result.total_closed)),
        ("Leads", format_count(result.total_leads)),
        ("Conversion", format_percent(result.conversion_rate)),
        ("Average ticket", format_brl(result.average_ticket)),
    ];
    for (label, value) in cards {
        out.push_str(&format!("{label:<16} {value:>18}\n"));
    }

    out
}

/// Format a category→count table (largest first, ties by name).
pub fn format_counts(title: &str, counts: &std::collections::BTreeMap<String, u64>) -> String {
    let mut out = String::new();
    out.push_str(title);
    out.push_str(":\n");

    if counts.is_empty() {
        out.push_str("  (none)\n");
        return out;
    }

    let total: u64 = counts.values().sum();
    let mut rows: Vec<(&String, &u64)> = counts.iter().collect();
    rows.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    for (name, n) in rows {
        let share = *n as f64 / total as f64 * 100.0;
        out.push_str(&format!(
            "  {:<24} {:>8} {:>8}\n",
            truncate(name, 24),
            format_count(*n),
            format_percent(share)
        ));
    }
    out
}

/// Format the daily sales series in calendar order.
pub fn format_daily(result: &AggregateResult) -> String {
    let mut out = String::from("Sales per day:\n");
    if result.daily_revenue.is_empty() {
        out.push_str("  (none)\n");
        return out;
    }
    for (date, revenue) in result.daily_series() {
        out.push_str(&format!("  {date}  {:>18}\n", format_brl(revenue)));
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn brl_formatting() {
        assert_eq!(format_brl(Decimal::new(136763, 2)), "R$ 1.367,63");
        assert_eq!(format_brl(Decimal::new(10, 0)), "R$ 10,00");
        assert_eq!(format_brl(Decimal::ZERO), "R$ 0,00");
        assert_eq!(format_brl(Decimal::new(1234567895, 3)), "R$ 1.234.567,90");
        assert_eq!(format_brl(Decimal::new(-5, 1)), "-R$ 0,50");
    }

    #[test]
    fn percent_and_count_formatting() {
        assert_eq!(format_percent(50.0), "50,0%");
        assert_eq!(format_percent(100.0 / 3.0), "33,3%");
        assert_eq!(format_percent(f64::NAN), "0,0%");
        assert_eq!(format_count(1234567), "1.234.567");
        assert_eq!(format_count(12), "12");
    }

    #[test]
    fn summary_lists_cards() {
        let result = AggregateResult {
            total_leads: 2,
            total_closed: 1,
            total_revenue: Decimal::new(100, 0),
            conversion_rate: 50.0,
            average_ticket: Decimal::new(100, 0),
            ..AggregateResult::default()
        };
        let txt = format_summary(&result, PeriodFilter::All, None);
        assert!(txt.contains("Period: all periods"));
        assert!(txt.contains("R$ 100,00"));
        assert!(txt.contains("50,0%"));
    }

    #[test]
    fn counts_sorted_by_size() {
        let counts = BTreeMap::from([("A".to_string(), 1), ("B".to_string(), 3)]);
        let txt = format_counts("Status", &counts);
        let a = txt.find("A ").unwrap();
        let b = txt.find("B ").unwrap();
        assert!(b < a);
        assert!(txt.contains("75,0%"));
    }
}
