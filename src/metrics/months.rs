//! Month index and period filtering.

use std::collections::BTreeSet;

use crate::domain::{LeadRecord, Period, PeriodFilter};

/// Distinct `MM/YYYY` periods present in `leads`, most recent first, preceded
/// by the `All` sentinel.
pub fn month_index(leads: &[LeadRecord]) -> Vec<PeriodFilter> {
    let periods: BTreeSet<Period> = leads.iter().map(|l| l.date.period()).collect();

    std::iter::once(PeriodFilter::All)
        .chain(periods.into_iter().rev().map(PeriodFilter::Month))
        .collect()
}

/// Leads that fall in the selected period. `All` keeps everything.
pub fn filter_leads(leads: &[LeadRecord], filter: PeriodFilter) -> Vec<&LeadRecord> {
    leads.iter().filter(|l| filter.matches(l.date)).collect()
}
