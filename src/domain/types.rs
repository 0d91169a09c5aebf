//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - produced once per fetch and held in memory for the session
//! - aggregated from scratch on every period change
//! - exported to JSON/CSV

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

/// Number of positional fields a raw row keeps. Anything past this is dropped.
pub const RAW_ROW_ARITY: usize = 6;

/// Published sheet consumed when neither `--url`, `--file` nor
/// `LEADS_SHEET_URL` is given.
pub const DEFAULT_SHEET_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vR8_SOwxi2ang2xisCsvzKoCcM7isb47BDCo-SUNvMa2ljobp1FvkjRr0AUi9RCEpl9qhnDV2g9lWFd/pub?output=csv";

/// Placeholder bucket for a missing status or traffic source.
pub const MISSING_CATEGORY: &str = "N/A";

/// Fixed positional column mapping of the sheet export.
///
/// The export carries no reliable header row; the date pattern on `date` is
/// the only thing that separates data rows from titles, totals and blanks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub date: usize,
    pub traffic_source: usize,
    pub status: usize,
    pub amount: usize,
}

pub const COLUMNS: ColumnMap = ColumnMap {
    date: 0,
    traffic_source: 3,
    status: 4,
    amount: 5,
};

/// One source record as read from the CSV: six optional text fields.
///
/// Short records leave trailing fields as `None`; extra fields are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    fields: [Option<String>; RAW_ROW_ARITY],
}

impl RawRow {
    pub fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row = Self::default();
        for (slot, value) in row.fields.iter_mut().zip(fields) {
            *slot = Some(value.into());
        }
        row
    }

    /// Field at `idx`, or `None` when absent (short row or out of range).
    pub fn field(&self, idx: usize) -> Option<&str> {
        self.fields.get(idx)?.as_deref()
    }

    /// Field at `idx`, treating an absent field as the empty string.
    pub fn field_or_empty(&self, idx: usize) -> &str {
        self.field(idx).unwrap_or("")
    }
}

/// A `DD/MM/YYYY` date as it appears in the sheet.
///
/// No calendar validation is applied (`99/99/9999` is a legal stamp). Field
/// order is `(year, month, day)` so the derived ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayStamp {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl DayStamp {
    pub fn period(self) -> Period {
        Period {
            year: self.year,
            month: self.month,
        }
    }
}

impl fmt::Display for DayStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}/{:04}", self.day, self.month, self.year)
    }
}

impl Serialize for DayStamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A `MM/YYYY` month, ordered by `(year, month)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    pub year: u16,
    pub month: u8,
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:04}", self.month, self.year)
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || format!("Invalid period '{s}'. Expected MM/YYYY (e.g. 07/2024).");
        let (month, year) = s.split_once('/').ok_or_else(err)?;
        if month.len() != 2 || year.len() != 4 {
            return Err(err());
        }
        if !month.bytes().chain(year.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        Ok(Period {
            month: month.parse().map_err(|_| err())?,
            year: year.parse().map_err(|_| err())?,
        })
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Optional restriction of the dataset to one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PeriodFilter {
    /// Sentinel: every period.
    #[default]
    All,
    Month(Period),
}

impl PeriodFilter {
    pub fn matches(self, date: DayStamp) -> bool {
        match self {
            PeriodFilter::All => true,
            PeriodFilter::Month(period) => date.period() == period,
        }
    }

    pub fn display_name(self) -> String {
        match self {
            PeriodFilter::All => "all periods".to_string(),
            PeriodFilter::Month(period) => period.to_string(),
        }
    }
}

impl FromStr for PeriodFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(PeriodFilter::All);
        }
        s.parse().map(PeriodFilter::Month)
    }
}

impl Serialize for PeriodFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PeriodFilter::All => serializer.serialize_str("all"),
            PeriodFilter::Month(period) => period.serialize(serializer),
        }
    }
}

/// A classified, normalized lead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadRecord {
    pub date: DayStamp,
    /// Upper-cased, trimmed; `N/A` when missing.
    pub traffic_source: String,
    /// Upper-cased, trimmed; `N/A` when missing.
    pub status: String,
    /// `None` when the amount field is empty or not a number.
    pub amount: Option<Decimal>,
}

/// Metrics produced by one aggregation pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AggregateResult {
    pub total_leads: u64,
    pub total_closed: u64,
    pub total_revenue: Decimal,
    pub status_counts: BTreeMap<String, u64>,
    pub traffic_counts: BTreeMap<String, u64>,
    /// Keyed by `DayStamp`, so iteration is in calendar order.
    #[serde(serialize_with = "serialize_daily")]
    pub daily_revenue: BTreeMap<DayStamp, Decimal>,
    /// `total_closed / total_leads * 100`, or 0 with no leads.
    pub conversion_rate: f64,
    /// `total_revenue / total_closed`, or 0 with nothing closed.
    pub average_ticket: Decimal,
}

impl AggregateResult {
    /// Daily revenue as a time series, ascending by calendar date.
    pub fn daily_series(&self) -> Vec<(DayStamp, Decimal)> {
        self.daily_revenue.iter().map(|(d, v)| (*d, *v)).collect()
    }
}

fn serialize_daily<S: Serializer>(
    daily: &BTreeMap<DayStamp, Decimal>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(daily.iter().map(|(date, revenue)| DailyPoint {
        date: *date,
        revenue: *revenue,
    }))
}

#[derive(Serialize)]
struct DailyPoint {
    date: DayStamp,
    revenue: Decimal,
}

/// Where raw rows come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Url(String),
    File(PathBuf),
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Url(url) => write!(f, "{url}"),
            DataSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}
