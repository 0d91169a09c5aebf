//! Dashboard session state.
//!
//! `DashboardState` is the single owner of everything that survives between
//! refreshes: the leads from the last successful fetch, the month index built
//! from them, the selected period, the current aggregate and the charts bound
//! to it. Loading replaces the cache wholesale; changing the period recomputes
//! from the cache without touching the source.

use chrono::{DateTime, Local};
use tracing::debug;

use crate::domain::{AggregateResult, LeadRecord, PeriodFilter, RawRow};
use crate::metrics::{aggregate, filter_leads, month_index, to_leads};

pub mod charts;

pub use charts::{ChartBoard, ChartKind, ChartSpec, ChartTarget};

#[derive(Debug, Default)]
pub struct DashboardState {
    leads: Vec<LeadRecord>,
    fetched_at: Option<DateTime<Local>>,
    months: Vec<PeriodFilter>,
    selected: PeriodFilter,
    result: Option<AggregateResult>,
    charts: ChartBoard,
}

impl DashboardState {
    pub fn new(selected: PeriodFilter) -> Self {
        Self {
            selected,
            months: vec![PeriodFilter::All],
            ..Self::default()
        }
    }

    /// Replace the cached rows with a fresh fetch and recompute.
    ///
    /// A period browsed from the previous month index that vanished from the
    /// new data falls back to `All`. A requested period that was never in the
    /// data is kept and aggregates to zeros.
    pub fn load(&mut self, rows: &[RawRow]) {
        let was_indexed = self.months.contains(&self.selected);
        self.leads = to_leads(rows);
        self.fetched_at = Some(Local::now());
        self.months = month_index(&self.leads);
        if was_indexed && !self.months.contains(&self.selected) {
            self.selected = PeriodFilter::All;
        }
        debug!(
            rows = rows.len(),
            leads = self.leads.len(),
            periods = self.months.len() - 1,
            "dashboard cache replaced"
        );
        self.recompute();
    }

    /// Select a period and recompute from the cache.
    pub fn select(&mut self, filter: PeriodFilter) {
        self.selected = filter;
        if self.is_loaded() {
            self.recompute();
        }
    }

    /// Step towards older periods (down the month index).
    pub fn next_period(&mut self) {
        self.step(1);
    }

    /// Step towards newer periods (up the month index, ending at `All`).
    pub fn prev_period(&mut self) {
        self.step(-1);
    }

    fn step(&mut self, delta: isize) {
        let pos = self.months.iter().position(|m| *m == self.selected).unwrap_or(0);
        let last = self.months.len().saturating_sub(1);
        let next = pos.saturating_add_signed(delta).min(last);
        if let Some(filter) = self.months.get(next).copied() {
            self.select(filter);
        }
    }

    fn recompute(&mut self) {
        let result = aggregate(filter_leads(&self.leads, self.selected));
        self.charts.publish(&result);
        self.result = Some(result);
    }

    pub fn is_loaded(&self) -> bool {
        self.fetched_at.is_some()
    }

    pub fn result(&self) -> Option<&AggregateResult> {
        self.result.as_ref()
    }

    pub fn charts(&self) -> &ChartBoard {
        &self.charts
    }

    pub fn months(&self) -> &[PeriodFilter] {
        &self.months
    }

    pub fn selected(&self) -> PeriodFilter {
        self.selected
    }

    pub fn fetched_at(&self) -> Option<DateTime<Local>> {
        self.fetched_at
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::domain::Period;

    fn rows() -> Vec<RawRow> {
        vec![
            RawRow::from_fields(["JULHO", "", "", "", "", ""]),
            RawRow::from_fields(["05/07/2024", "", "", "facebook", "fechado", "R$ 100,00"]),
            RawRow::from_fields(["06/07/2024", "", "", "google", "pendente", ""]),
            RawRow::from_fields(["10/06/2024", "", "", "google", "pago", "R$ 50,00"]),
        ]
    }

    fn july() -> PeriodFilter {
        PeriodFilter::Month(Period { year: 2024, month: 7 })
    }

    #[test]
    fn load_aggregates_everything() {
        let mut state = DashboardState::new(PeriodFilter::All);
        assert!(state.result().is_none());

        state.load(&rows());
        let r = state.result().unwrap();
        assert_eq!(r.total_leads, 3);
        assert_eq!(r.total_revenue, Decimal::new(150, 0));
        assert_eq!(state.months().len(), 3);
        assert_eq!(state.charts().len(), 3);
    }

    #[test]
    fn select_recomputes_from_cache() {
        let mut state = DashboardState::new(PeriodFilter::All);
        state.load(&rows());
        state.select(july());

        let r = state.result().unwrap();
        assert_eq!(r.total_leads, 2);
        assert_eq!(r.total_revenue, Decimal::new(100, 0));

        state.select(PeriodFilter::All);
        assert_eq!(state.result().unwrap().total_leads, 3);
    }

    #[test]
    fn stepping_walks_the_month_index() {
        let mut state = DashboardState::new(PeriodFilter::All);
        state.load(&rows());

        state.next_period();
        assert_eq!(state.selected(), july());
        state.next_period();
        assert_eq!(state.selected(), PeriodFilter::Month(Period { year: 2024, month: 6 }));
        state.next_period();
        assert_eq!(state.selected(), PeriodFilter::Month(Period { year: 2024, month: 6 }));

        state.prev_period();
        state.prev_period();
        state.prev_period();
        assert_eq!(state.selected(), PeriodFilter::All);
    }

    #[test]
    fn reload_drops_vanished_period() {
        let mut state = DashboardState::new(july());
        state.load(&rows());
        assert_eq!(state.selected(), july());

        state.load(&[RawRow::from_fields(["10/06/2024", "", "", "x", "ok", "R$ 1,00"])]);
        assert_eq!(state.selected(), PeriodFilter::All);
        assert_eq!(state.result().unwrap().total_leads, 1);
    }

    #[test]
    fn requested_period_without_rows_aggregates_to_zero() {
        let jan_2020 = PeriodFilter::Month(Period { year: 2020, month: 1 });
        let mut state = DashboardState::new(jan_2020);
        state.load(&[RawRow::from_fields(["05/07/2024", "", "", "x", "ok", "R$ 100,00"])]);

        assert_eq!(state.selected(), jan_2020);
        let r = state.result().unwrap();
        assert_eq!(r.total_leads, 0);
        assert_eq!(r.total_revenue, Decimal::ZERO);
        assert!(r.daily_revenue.is_empty());

        state.load(&rows());
        assert_eq!(state.selected(), jan_2020);
    }

    #[test]
    fn reload_with_same_rows_is_stable() {
        let mut state = DashboardState::new(PeriodFilter::All);
        state.load(&rows());
        let first = state.result().cloned();
        let charts = state.charts().clone();

        state.load(&rows());
        assert_eq!(state.result().cloned(), first);
        assert_eq!(state.charts(), &charts);
    }
}
