use chrono::NaiveDate;
use core_types::{AggregatedPoint, SymbolPortfolio};
use std::collections::BTreeMap;

/// A running sum that stays `None` until a finite value arrives.
#[derive(Debug, Default, Clone, Copy)]
struct Component(Option<f64>);

impl Component {
    fn add(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.0 = Some(self.0.unwrap_or(0.0) + v);
        }
    }
}

#[derive(Debug, Default)]
struct DateGroup {
    holdings: Component,
    cash: Component,
    total: Component,
}

/// Maps non-finite values to missing so they never reach a sum.
pub fn finite_or_missing(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Sums holdings, cash and total across symbols for every date any symbol reports.
///
/// Each date only sees the symbols that have a row for it; there is no forward-fill
/// or zero-fill across symbols. Symbols are summed in name order, so the result does
/// not depend on the order of `portfolios`. Output is ascending by date.
pub fn aggregate(portfolios: &[SymbolPortfolio]) -> Vec<AggregatedPoint> {
    let mut ordered: Vec<&SymbolPortfolio> = portfolios.iter().collect();
    ordered.sort_by(|a, b| a.symbol.cmp(&b.symbol));

    let mut groups: BTreeMap<NaiveDate, DateGroup> = BTreeMap::new();
    let mut anomalies = 0usize;

    for portfolio in ordered {
        for row in &portfolio.rows {
            let holdings = finite_or_missing(row.holdings);
            let cash = finite_or_missing(row.cash);
            let total = finite_or_missing(row.total);
            anomalies += [holdings, cash, total].iter().filter(|v| v.is_none()).count();

            let group = groups.entry(row.date).or_default();
            group.holdings.add(holdings);
            group.cash.add(cash);
            group.total.add(total);
        }
    }

    if anomalies > 0 {
        tracing::warn!(anomalies, "Non-finite portfolio values excluded from aggregation");
    }

    groups
        .into_iter()
        .map(|(date, group)| AggregatedPoint {
            date,
            holdings: group.holdings.0,
            cash: group.cash.0,
            total: group.total.0,
        })
        .collect()
}
