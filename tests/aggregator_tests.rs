mod common;

use common::sample_ledger;
use monthly_budget::{
    core::{BudgetSummary, REMAINING_LABEL},
    ledger::{Ledger, Partition, Row},
    Aggregator,
};

#[test]
fn category_totals_match_rows() {
    let mut ledger = Ledger::new();
    ledger.add_row(Partition::Variable, Row::new("May 2", "Food", "Lunch", "-10"));
    ledger.add_row(Partition::Variable, Row::new("May 5", "Food", "Snack", "-5"));
    ledger.add_row(Partition::Fixed, Row::new("May 1", "Rent", "Rent", "-100"));

    let totals = Aggregator::by_category(&ledger).unwrap();
    assert_eq!(
        totals.into_iter().collect::<Vec<_>>(),
        [("Food".to_string(), -15.0), ("Rent".to_string(), -100.0)]
    );
}

#[test]
fn day_totals_have_one_entry_per_day() {
    let ledger = sample_ledger();
    for days in [28, 29, 30, 31] {
        let totals = Aggregator::by_day_in_month(&ledger, "Food", Partition::Variable, days).unwrap();
        assert_eq!(totals.len(), days as usize);
        assert_eq!(totals[&2], -30.0);
    }
}

#[test]
fn all_category_view_sums_partition() {
    let totals = Aggregator::daily_totals(&sample_ledger(), Partition::Fixed, 31).unwrap();
    assert_eq!(totals[&1], -250.0);
    assert_eq!(totals[&3], -40.0);
    assert_eq!(totals.values().sum::<f64>(), -290.0);
}

#[test]
fn pie_ends_with_remaining_budget() {
    let ledger = sample_ledger();
    let summary = Aggregator::summary(&ledger).unwrap();
    assert_eq!(
        summary,
        BudgetSummary {
            budget: 500.0,
            spent: 320.0,
            remaining: 180.0,
        }
    );

    let slices = Aggregator::pie_slices(&ledger).unwrap();
    let labels: Vec<_> = slices.iter().map(|(label, _)| label.as_str()).collect();
    assert_eq!(labels, ["Food", "Rent", "Utility", REMAINING_LABEL]);
    assert_eq!(slices[3].1, 180.0);
}
