//! Lead metrics.
//!
//! - `classify`: which raw rows are leads
//! - `normalize`: categorical buckets + currency amounts
//! - `aggregate`: the single-pass reducer
//! - `months`: month index + period filter

pub mod aggregate;
pub mod classify;
pub mod months;
pub mod normalize;

pub use aggregate::{aggregate, aggregate_rows, decimal_to_f64, is_closed};
pub use classify::{is_lead_row, parse_day_stamp};
pub use months::{filter_leads, month_index};
pub use normalize::{normalize_category, parse_currency, to_lead, to_leads};
