//! Shared "load" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! fetch -> parse -> classify/normalize -> month index -> filter -> aggregate -> charts
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use tracing::info;

use crate::dashboard::DashboardState;
use crate::data::SheetClient;
use crate::domain::{PeriodFilter, RawRow};
use crate::error::AppError;

/// Fetch from the client's source and run one full load into `state`.
///
/// On failure `state` is left exactly as it was.
pub fn refresh(client: &SheetClient, state: &mut DashboardState) -> Result<(), AppError> {
    let rows = client.fetch_rows()?;
    load_rows(state, &rows);
    Ok(())
}

/// Load already-fetched rows into `state` and log the outcome.
pub fn load_rows(state: &mut DashboardState, rows: &[RawRow]) {
    state.load(rows);
    if let Some(result) = state.result() {
        info!(
            period = %state.selected().display_name(),
            leads = result.total_leads,
            closed = result.total_closed,
            revenue = %result.total_revenue,
            "aggregated leads"
        );
    }
}

/// One-shot load for the non-interactive commands.
pub fn load(client: &SheetClient, period: PeriodFilter) -> Result<DashboardState, AppError> {
    let mut state = DashboardState::new(period);
    refresh(client, &mut state)?;
    Ok(state)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use rust_decimal::Decimal;

    use super::*;
    use crate::domain::{DataSource, Period};
    use crate::io::ingest::parse_rows;

    const SHEET: &str = "\
VENDAS JULHO,,,,,
DIA,NOME,TELEFONE,TRAFEGO,SITUACAO,VALOR
05/07/2024,,,FACEBOOK,FECHADO,\"R$ 100,00\"
06/07/2024,,,GOOGLE,PENDENTE,
MAIO,,,,,
";

    #[test]
    fn csv_text_end_to_end() {
        let rows = parse_rows(SHEET).unwrap();
        let mut state = DashboardState::new(PeriodFilter::All);
        load_rows(&mut state, &rows);

        let r = state.result().unwrap();
        assert_eq!(r.total_leads, 2);
        assert_eq!(r.total_closed, 1);
        assert_eq!(r.total_revenue, Decimal::new(100, 0));
        assert_eq!(
            r.status_counts,
            BTreeMap::from([("FECHADO".to_string(), 1), ("PENDENTE".to_string(), 1)])
        );
        assert_eq!(r.daily_revenue.len(), 1);
        assert_eq!(
            state.months(),
            &[PeriodFilter::All, PeriodFilter::Month(Period { year: 2024, month: 7 })]
        );
    }

    #[test]
    fn failed_refresh_keeps_previous_results() {
        let rows = parse_rows(SHEET).unwrap();
        let mut state = DashboardState::new(PeriodFilter::All);
        load_rows(&mut state, &rows);
        let before = state.result().cloned();

        let broken = SheetClient::new(DataSource::File(PathBuf::from("/nonexistent/leads.csv")));
        assert!(refresh(&broken, &mut state).is_err());
        assert_eq!(state.result().cloned(), before);
    }
}
