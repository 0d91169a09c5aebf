//! Field normalization: categorical buckets and BRL amounts.

use rust_decimal::Decimal;

use crate::domain::{COLUMNS, LeadRecord, MISSING_CATEGORY, RawRow};
use crate::metrics::classify::parse_day_stamp;

/// Trim + uppercase a categorical field; missing or empty fields land in the
/// `N/A` bucket. A whitespace-only field trims to the empty bucket.
pub fn normalize_category(field: Option<&str>) -> String {
    match field {
        Some(s) if !s.is_empty() => s.trim().to_uppercase(),
        _ => MISSING_CATEGORY.to_string(),
    }
}

/// Parse a pt-BR currency string such as `R$ 1.367,63`.
///
/// `.` is a thousands separator and `,` the decimal separator. After cleaning,
/// the longest leading number is used and any trailing text is ignored
/// (`R$ 1.500,00 à vista` is 1500). Returns `None` when the field is empty or
/// does not start with a number.
pub fn parse_currency(field: Option<&str>) -> Option<Decimal> {
    let raw = field.filter(|s| !s.trim().is_empty())?;
    let cleaned = raw
        .replacen("R$", "", 1)
        .replace('.', "")
        .replacen(',', ".", 1);
    leading_number(cleaned.trim_start())?.parse::<Decimal>().ok()
}

/// The `[+-]?digits[.digits]` prefix of `s`, normalized so `Decimal` can parse
/// it (`.5` becomes `0.5`, `7.` becomes `7`).
fn leading_number(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut i = 0;
    let mut out = String::new();

    if let Some(&sign @ (b'+' | b'-')) = bytes.first() {
        if sign == b'-' {
            out.push('-');
        }
        i += 1;
    }

    let int_start = i;
    while bytes.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    let int_part = &s[int_start..i];

    let mut frac_part = "";
    if bytes.get(i) == Some(&b'.') {
        let frac_start = i + 1;
        let mut j = frac_start;
        while bytes.get(j).is_some_and(u8::is_ascii_digit) {
            j += 1;
        }
        frac_part = &s[frac_start..j];
    }

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    out.push_str(if int_part.is_empty() { "0" } else { int_part });
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    Some(out)
}

/// Classify and normalize a raw row. Non-lead rows yield `None`.
pub fn to_lead(row: &RawRow) -> Option<LeadRecord> {
    let date = parse_day_stamp(row.field_or_empty(COLUMNS.date))?;
    Some(LeadRecord {
        date,
        traffic_source: normalize_category(row.field(COLUMNS.traffic_source)),
        status: normalize_category(row.field(COLUMNS.status)),
        amount: parse_currency(row.field(COLUMNS.amount)),
    })
}

/// Classify and normalize every row, dropping non-leads.
pub fn to_leads(rows: &[RawRow]) -> Vec<LeadRecord> {
    rows.iter().filter_map(to_lead).collect()
}
