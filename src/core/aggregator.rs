//! Read-only reporting over a [`Ledger`].
//!
//! Every function borrows the ledger and returns freshly built values. A row
//! whose amount is not a number fails the whole computation; a row whose date
//! carries no usable day is left out of per-day views with a warning.

use std::collections::BTreeMap;

use tracing::warn;

use crate::{
    errors::Result,
    ledger::{date, Ledger, Partition, Row},
};

/// Label of the slice appended by [`Aggregator::pie_slices`].
pub const REMAINING_LABEL: &str = "Remaining";

pub type CategoryTotals = BTreeMap<String, f64>;
pub type DayTotals = BTreeMap<u32, f64>;

/// Figures shown next to the budget: what was set, spent and is left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetSummary {
    pub budget: f64,
    pub spent: f64,
    pub remaining: f64,
}

pub struct Aggregator;

impl Aggregator {
    /// Sum of amounts per category over both partitions. Only categories
    /// that have rows appear.
    pub fn by_category(ledger: &Ledger) -> Result<CategoryTotals> {
        sum_by_category(ledger.iter_rows().map(|(_, row)| row))
    }

    pub fn by_category_in(ledger: &Ledger, partition: Partition) -> Result<CategoryTotals> {
        sum_by_category(ledger.rows(partition).iter())
    }

    /// Per-day sums for one category of one partition, covering every day of
    /// the current month.
    pub fn by_day(ledger: &Ledger, category: &str, partition: Partition) -> Result<DayTotals> {
        Self::by_day_in_month(ledger, category, partition, date::days_in_current_month())
    }

    /// Like [`Aggregator::by_day`] for a month of `days_in_month` days. The
    /// result always holds exactly one entry per day, zero when idle.
    pub fn by_day_in_month(
        ledger: &Ledger,
        category: &str,
        partition: Partition,
        days_in_month: u32,
    ) -> Result<DayTotals> {
        sum_by_day(
            ledger.rows_in_category(category, partition),
            days_in_month,
        )
    }

    /// Per-day sums of every category in a partition.
    pub fn daily_totals(
        ledger: &Ledger,
        partition: Partition,
        days_in_month: u32,
    ) -> Result<DayTotals> {
        sum_by_day(ledger.rows(partition).iter(), days_in_month)
    }

    pub fn summary(ledger: &Ledger) -> Result<BudgetSummary> {
        let spent = ledger.total_spent()?;
        Ok(BudgetSummary {
            budget: ledger.budget(),
            spent,
            remaining: ledger.budget() - spent,
        })
    }

    /// Category totals followed by a final `"Remaining"` slice holding the
    /// remaining budget, in chart order.
    pub fn pie_slices(ledger: &Ledger) -> Result<Vec<(String, f64)>> {
        let mut slices: Vec<(String, f64)> = Self::by_category(ledger)?.into_iter().collect();
        slices.push((REMAINING_LABEL.to_string(), ledger.remaining_budget()?));
        Ok(slices)
    }
}

fn sum_by_category<'a>(rows: impl Iterator<Item = &'a Row>) -> Result<CategoryTotals> {
    let mut totals = CategoryTotals::new();
    for row in rows {
        let amount = row.amount_value()?;
        *totals.entry(row.category().to_string()).or_insert(0.0) += amount;
    }
    Ok(totals)
}

fn sum_by_day<'a>(rows: impl Iterator<Item = &'a Row>, days_in_month: u32) -> Result<DayTotals> {
    let mut totals: DayTotals = (1..=days_in_month).map(|day| (day, 0.0)).collect();
    for row in rows {
        let amount = row.amount_value()?;
        match row.day().and_then(|day| totals.get_mut(&day)) {
            Some(total) => *total += amount,
            None => warn!(
                date = row.date(),
                name = row.name(),
                days_in_month,
                "row date has no day in this month; left out of daily totals"
            ),
        }
    }
    Ok(totals)
}
