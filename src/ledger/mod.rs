//! Ledger model: rows, categories, the two partitions and change notification.

pub mod category;
pub mod date;
pub mod events;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod partition;
pub mod row;

pub use category::{CategoryList, DEFAULT_CATEGORIES};
pub use events::{Deferred, LedgerEvent, LedgerListener, ListenerId, Mutation};
pub use ledger::{Ledger, SortKey};
pub use partition::Partition;
pub use row::Row;
