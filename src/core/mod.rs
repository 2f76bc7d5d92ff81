pub mod aggregator;
pub mod ledger_manager;
pub mod utils;

pub use aggregator::{Aggregator, BudgetSummary, CategoryTotals, DayTotals, REMAINING_LABEL};
pub use ledger_manager::{LedgerManager, LoadMetadata};
