//! Change notification for [`Ledger`].
//!
//! Listeners see the ledger by shared reference only. A listener that wants to
//! change the ledger in response to an event pushes a [`Mutation`] onto the
//! [`Deferred`] queue it is handed; queued mutations run after the current
//! notification has reached every listener.

use std::collections::VecDeque;

use super::{Ledger, Partition, Row, SortKey};

/// What changed in a ledger.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerEvent {
    RowAdded { partition: Partition, index: usize },
    RowRemoved { partition: Partition, index: usize },
    RowReplaced { partition: Partition, index: usize },
    RowsSorted { partition: Partition, key: SortKey },
    BudgetChanged { budget: f64 },
    CategoriesChanged,
    Cleared,
    /// The whole contents were swapped for a freshly loaded ledger.
    Reloaded,
}

impl LedgerEvent {
    pub fn is_category_change(&self) -> bool {
        matches!(self, LedgerEvent::CategoriesChanged | LedgerEvent::Reloaded)
    }

    /// Whether the event can move any total shown to the user.
    pub fn affects_totals(&self) -> bool {
        !matches!(
            self,
            LedgerEvent::CategoriesChanged | LedgerEvent::RowsSorted { .. }
        )
    }
}

/// A ledger change requested from inside a listener.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    AddRow(Partition, Row),
    RemoveRow(Partition, usize),
    ReplaceRow(Partition, usize, Row),
    SortRows(Partition, SortKey),
    SetBudget(f64),
    AddCategory(String),
    RemoveCategory(String),
    ReplaceCategories(Vec<String>),
    Clear,
}

/// Queue of mutations collected while listeners are being notified.
#[derive(Debug, Default)]
pub struct Deferred {
    queue: VecDeque<Mutation>,
}

impl Deferred {
    pub fn push(&mut self, mutation: Mutation) {
        self.queue.push_back(mutation);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub(crate) fn pop(&mut self) -> Option<Mutation> {
        self.queue.pop_front()
    }

    pub(crate) fn append(&mut self, other: &mut Deferred) {
        self.queue.append(&mut other.queue);
    }

    pub(crate) fn clear(&mut self) {
        self.queue.clear();
    }
}

/// Receives ledger change notifications.
pub trait LedgerListener {
    fn ledger_changed(&mut self, event: &LedgerEvent, ledger: &Ledger, deferred: &mut Deferred);
}

impl<F> LedgerListener for F
where
    F: FnMut(&LedgerEvent, &Ledger, &mut Deferred),
{
    fn ledger_changed(&mut self, event: &LedgerEvent, ledger: &Ledger, deferred: &mut Deferred) {
        self(event, ledger, deferred)
    }
}

/// Handle returned by [`Ledger::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);
