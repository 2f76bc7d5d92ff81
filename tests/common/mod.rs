#![allow(dead_code)]

use std::path::PathBuf;

use monthly_budget::{
    ledger::{CategoryList, Ledger, Partition, Row},
    storage,
};
use tempfile::TempDir;

/// A small ledger with rows in both partitions.
pub fn sample_ledger() -> Ledger {
    let mut ledger = Ledger::with_categories(CategoryList::from_names([
        "Food", "Rent", "Utility",
    ]));
    ledger.set_budget(500.0);
    ledger.add_row(Partition::Fixed, Row::new("May 1", "Rent", "Flat", "-250"));
    ledger.add_row(Partition::Fixed, Row::new("May 3", "Utility", "Power", "-40"));
    ledger.add_row(Partition::Variable, Row::new("May 2", "Food", "Lunch", "-10"));
    ledger.add_row(Partition::Variable, Row::new("May 2", "Food", "Groceries", "-20"));
    ledger
}

/// Writes `ledger` into a fresh temporary directory and returns the file path
/// together with the guard keeping the directory alive.
pub fn saved_ledger(ledger: &Ledger) -> (TempDir, PathBuf) {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().join("budget.mbf");
    storage::mbf_backend::save_to_path(ledger, &path).expect("seed ledger file");
    (temp, path)
}
