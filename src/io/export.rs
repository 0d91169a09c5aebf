//! Export dashboard results.
//!
//! - JSON: the full aggregate for the selected period, for scripts
//! - CSV: the daily sales series, for spreadsheets

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::domain::{AggregateResult, PeriodFilter};
use crate::error::{AppError, EXIT_INPUT};

/// Portable snapshot of one aggregation run.
#[derive(Debug, Serialize)]
pub struct DashboardExport<'a> {
    pub tool: &'static str,
    pub fetched_at: Option<String>,
    pub period: PeriodFilter,
    pub aggregate: &'a AggregateResult,
}

/// Write the aggregate snapshot as pretty JSON.
pub fn write_json<W: Write>(writer: W, export: &DashboardExport<'_>) -> Result<(), AppError> {
    serde_json::to_writer_pretty(writer, export)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write export JSON: {e}")))
}

/// Write the daily series as `date,revenue` CSV rows, oldest first.
pub fn write_daily_csv<W: Write>(writer: W, result: &AggregateResult) -> Result<(), AppError> {
    #[derive(Serialize)]
    struct Row {
        date: String,
        revenue: String,
    }

    let mut wtr = csv::Writer::from_writer(writer);
    for (date, revenue) in result.daily_series() {
        wtr.serialize(Row {
            date: date.to_string(),
            revenue: format!("{revenue:.2}"),
        })
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write export CSV row: {e}")))?;
    }
    wtr.flush()
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to flush export CSV: {e}")))
}

pub fn write_json_file(path: &Path, export: &DashboardExport<'_>) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to create export JSON '{}': {e}", path.display())))?;
    write_json(file, export)
}

pub fn write_daily_csv_file(path: &Path, result: &AggregateResult) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_daily_csv(file, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RawRow;
    use crate::metrics::aggregate_rows;

    fn result() -> AggregateResult {
        aggregate_rows(&[
            RawRow::from_fields(["05/01/2024", "", "", "google", "pago", "R$ 1.000,50"]),
            RawRow::from_fields(["20/12/2023", "", "", "facebook", "fechado", "R$ 2,00"]),
        ])
    }

    #[test]
    fn daily_csv_is_calendar_ordered() {
        let mut buf = Vec::new();
        write_daily_csv(&mut buf, &result()).unwrap();
        let txt = String::from_utf8(buf).unwrap();
        assert_eq!(txt, "date,revenue\n20/12/2023,2.00\n05/01/2024,1000.50\n");
    }

    #[test]
    fn json_has_aggregate_fields() {
        let r = result();
        let export = DashboardExport {
            tool: "leads",
            fetched_at: None,
            period: PeriodFilter::All,
            aggregate: &r,
        };
        let mut buf = Vec::new();
        write_json(&mut buf, &export).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(v["period"], "all");
        assert_eq!(v["aggregate"]["total_leads"], 2);
        assert_eq!(v["aggregate"]["total_closed"], 2);
        assert_eq!(v["aggregate"]["daily_revenue"][0]["date"], "20/12/2023");
        assert_eq!(v["aggregate"]["status_counts"]["PAGO"], 1);
    }
}
