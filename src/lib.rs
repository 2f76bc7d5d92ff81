#![doc(test(attr(deny(warnings))))]

//! Monthly Budget keeps a month of dated, categorized money movements split
//! into fixed and variable expenses, stores them in `.mbf` files and derives
//! per-category and per-day totals for reporting.

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

pub use crate::core::{Aggregator, LedgerManager};
pub use errors::{LedgerError, Result};
pub use ledger::{CategoryList, Ledger, Partition, Row};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("monthly_budget tracing initialized");
    });
}
