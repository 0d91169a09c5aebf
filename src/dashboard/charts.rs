//! Chart descriptions and the redraw registry.
//!
//! Renderers never keep their own chart state. They read from a `ChartBoard`,
//! where each target holds at most one chart; binding a new chart to a target
//! drops whatever was there first, so an update can never leave two
//! overlapping charts behind.

use std::collections::BTreeMap;

use crate::domain::AggregateResult;
use crate::metrics::decimal_to_f64;

/// Visualization kind requested from a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    CategoryBar,
    ProportionPie,
    TimeSeriesLine,
}

/// Where a chart is drawn on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChartTarget {
    Status,
    Traffic,
    DailyRevenue,
}

impl ChartTarget {
    pub const ALL: [ChartTarget; 3] = [ChartTarget::Status, ChartTarget::Traffic, ChartTarget::DailyRevenue];
}

/// Render-only chart description: labelled values in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub label: String,
    pub points: Vec<(String, f64)>,
}

impl ChartSpec {
    pub fn total(&self) -> f64 {
        self.points.iter().map(|(_, v)| v).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

pub fn status_chart(result: &AggregateResult) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::CategoryBar,
        label: "Lead status".to_string(),
        points: counts_to_points(&result.status_counts),
    }
}

pub fn traffic_chart(result: &AggregateResult) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::ProportionPie,
        label: "Traffic source".to_string(),
        points: counts_to_points(&result.traffic_counts),
    }
}

pub fn daily_revenue_chart(result: &AggregateResult) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::TimeSeriesLine,
        label: "Sales per day".to_string(),
        points: result
            .daily_series()
            .into_iter()
            .map(|(date, revenue)| (date.to_string(), decimal_to_f64(revenue)))
            .collect(),
    }
}

fn counts_to_points(counts: &BTreeMap<String, u64>) -> Vec<(String, f64)> {
    counts.iter().map(|(k, v)| (k.clone(), *v as f64)).collect()
}

/// Charts currently bound to dashboard targets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartBoard {
    charts: BTreeMap<ChartTarget, ChartSpec>,
}

impl ChartBoard {
    /// Bind `spec` to `target`, releasing any chart already bound there.
    ///
    /// Returns the released chart, if any.
    pub fn redraw(&mut self, target: ChartTarget, spec: ChartSpec) -> Option<ChartSpec> {
        let released = self.charts.remove(&target);
        self.charts.insert(target, spec);
        released
    }

    /// Redraw all three dashboard charts from an aggregate.
    pub fn publish(&mut self, result: &AggregateResult) {
        self.redraw(ChartTarget::Status, status_chart(result));
        self.redraw(ChartTarget::Traffic, traffic_chart(result));
        self.redraw(ChartTarget::DailyRevenue, daily_revenue_chart(result));
    }

    pub fn get(&self, target: ChartTarget) -> Option<&ChartSpec> {
        self.charts.get(&target)
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RawRow;
    use crate::metrics::aggregate_rows;

    fn result() -> AggregateResult {
        aggregate_rows(&[
            RawRow::from_fields(["05/01/2024", "", "", "google", "pago", "R$ 1,50"]),
            RawRow::from_fields(["20/12/2023", "", "", "facebook", "fechado", "R$ 2,00"]),
            RawRow::from_fields(["21/12/2023", "", "", "facebook", "pendente", ""]),
        ])
    }

    #[test]
    fn publish_binds_one_chart_per_target() {
        let mut board = ChartBoard::default();
        board.publish(&result());
        assert_eq!(board.len(), 3);

        let status = board.get(ChartTarget::Status).unwrap();
        assert_eq!(status.kind, ChartKind::CategoryBar);
        assert_eq!(status.total(), 3.0);

        let traffic = board.get(ChartTarget::Traffic).unwrap();
        assert_eq!(traffic.kind, ChartKind::ProportionPie);
        assert_eq!(traffic.points, vec![("FACEBOOK".to_string(), 2.0), ("GOOGLE".to_string(), 1.0)]);

        let daily = board.get(ChartTarget::DailyRevenue).unwrap();
        assert_eq!(daily.kind, ChartKind::TimeSeriesLine);
        assert_eq!(daily.points, vec![("20/12/2023".to_string(), 2.0), ("05/01/2024".to_string(), 1.5)]);
    }

    #[test]
    fn redraw_is_idempotent() {
        let r = result();
        let mut once = ChartBoard::default();
        once.publish(&r);

        let mut twice = once.clone();
        twice.publish(&r);
        assert_eq!(once, twice);
        assert_eq!(twice.len(), 3);
    }

    #[test]
    fn redraw_releases_previous_chart() {
        let mut board = ChartBoard::default();
        let first = status_chart(&result());
        assert!(board.redraw(ChartTarget::Status, first.clone()).is_none());

        let empty = status_chart(&AggregateResult::default());
        let released = board.redraw(ChartTarget::Status, empty.clone());
        assert_eq!(released, Some(first));
        assert_eq!(board.get(ChartTarget::Status), Some(&empty));
        assert_eq!(board.len(), 1);
    }
}
