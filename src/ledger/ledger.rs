use std::{cmp::Ordering, fmt, str::FromStr};

use tracing::{debug, warn};

use super::{
    category::CategoryList,
    date,
    events::{Deferred, LedgerEvent, LedgerListener, ListenerId, Mutation},
    partition::Partition,
    row::Row,
};
use crate::errors::{LedgerError, Result};

/// Upper bound on listener-requested mutations applied after one change.
const MAX_DEFERRED_MUTATIONS: usize = 1024;

/// Row orderings offered to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// By row name.
    Alphabetical,
    /// By month, then day.
    ByDate,
    /// By signed amount.
    ByMoney,
    /// By absolute amount, ignoring sign.
    ByMoneyAbs,
}

impl FromStr for SortKey {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "name" | "alphabetical" => Ok(SortKey::Alphabetical),
            "date" => Ok(SortKey::ByDate),
            "money" | "amount" => Ok(SortKey::ByMoney),
            "money-abs" | "amount-abs" => Ok(SortKey::ByMoneyAbs),
            other => Err(LedgerError::InvalidInput(format!("unknown sort key `{other}`"))),
        }
    }
}

/// The in-memory budget: fixed and variable rows, a budget figure and the
/// category list.
///
/// Amounts are signed money movements: negative values are money spent,
/// positive values money gained. Every mutating call notifies subscribed
/// listeners, in subscription order, before it returns.
pub struct Ledger {
    fixed: Vec<Row>,
    variable: Vec<Row>,
    budget: f64,
    categories: CategoryList,
    listeners: Vec<(ListenerId, Box<dyn LedgerListener>)>,
    next_listener: u64,
    dispatching: bool,
    pending: Deferred,
}

impl Ledger {
    /// Empty ledger seeded with the default categories.
    pub fn new() -> Self {
        Self::with_categories(CategoryList::with_defaults())
    }

    pub fn with_categories(categories: CategoryList) -> Self {
        Self {
            fixed: Vec::new(),
            variable: Vec::new(),
            budget: 0.0,
            categories,
            listeners: Vec::new(),
            next_listener: 0,
            dispatching: false,
            pending: Deferred::default(),
        }
    }

    pub fn budget(&self) -> f64 {
        self.budget
    }

    pub fn categories(&self) -> &CategoryList {
        &self.categories
    }

    pub fn rows(&self, partition: Partition) -> &[Row] {
        match partition {
            Partition::Fixed => &self.fixed,
            Partition::Variable => &self.variable,
        }
    }

    /// All rows tagged with their partition, fixed rows first.
    pub fn iter_rows(&self) -> impl Iterator<Item = (Partition, &Row)> {
        Partition::ALL
            .into_iter()
            .flat_map(move |partition| self.rows(partition).iter().map(move |row| (partition, row)))
    }

    pub fn row_count(&self) -> usize {
        self.fixed.len() + self.variable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    pub fn rows_in_category<'a>(
        &'a self,
        category: &'a str,
        partition: Partition,
    ) -> impl Iterator<Item = &'a Row> + 'a {
        self.rows(partition)
            .iter()
            .filter(move |row| row.category() == category)
    }

    pub fn add_row(&mut self, partition: Partition, row: Row) {
        debug!(%partition, row = %row, "adding row");
        let rows = self.rows_mut(partition);
        rows.push(row);
        let index = rows.len() - 1;
        self.notify(LedgerEvent::RowAdded { partition, index });
    }

    pub fn remove_row(&mut self, partition: Partition, index: usize) -> Result<Row> {
        let rows = self.rows_mut(partition);
        if index >= rows.len() {
            return Err(LedgerError::IndexOutOfRange {
                partition,
                index,
                len: rows.len(),
            });
        }
        let removed = rows.remove(index);
        self.notify(LedgerEvent::RowRemoved { partition, index });
        Ok(removed)
    }

    /// Swaps the row at `index` for `row`, returning the previous value. Used
    /// to re-categorise or correct a row.
    pub fn replace_row(&mut self, partition: Partition, index: usize, row: Row) -> Result<Row> {
        let rows = self.rows_mut(partition);
        let len = rows.len();
        let slot = rows.get_mut(index).ok_or(LedgerError::IndexOutOfRange {
            partition,
            index,
            len,
        })?;
        let previous = std::mem::replace(slot, row);
        self.notify(LedgerEvent::RowReplaced { partition, index });
        Ok(previous)
    }

    /// Sorts one partition in place. Fails without reordering anything when a
    /// money sort meets a non-numeric amount.
    pub fn sort_rows(&mut self, partition: Partition, key: SortKey) -> Result<()> {
        let rows = self.rows_mut(partition);
        match key {
            SortKey::Alphabetical => rows.sort_by(|a, b| a.name().cmp(b.name())),
            SortKey::ByDate => rows.sort_by_key(|row| date::sort_key(row.date())),
            SortKey::ByMoney | SortKey::ByMoneyAbs => {
                let values = rows
                    .iter()
                    .map(Row::amount_value)
                    .collect::<Result<Vec<f64>>>()?;
                let abs = key == SortKey::ByMoneyAbs;
                let mut keyed: Vec<(f64, Row)> = values.into_iter().zip(rows.drain(..)).collect();
                keyed.sort_by(|(a, _), (b, _)| compare_amounts(*a, *b, abs));
                rows.extend(keyed.into_iter().map(|(_, row)| row));
            }
        }
        self.notify(LedgerEvent::RowsSorted { partition, key });
        Ok(())
    }

    /// Stores the absolute value of `amount`. A NaN or infinite amount is
    /// stored as 0.
    pub fn set_budget(&mut self, amount: f64) {
        self.budget = budget_value(amount);
        self.notify(LedgerEvent::BudgetChanged {
            budget: self.budget,
        });
    }

    /// Adds a category if it is not already present. Empty names are rejected.
    pub fn add_category(&mut self, name: &str) -> Result<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::InvalidCategory("name may not be empty".into()));
        }
        let changed = self.categories.add(name);
        self.notify(LedgerEvent::CategoriesChanged);
        Ok(changed)
    }

    pub fn remove_category(&mut self, name: &str) -> bool {
        let changed = self.categories.remove(name);
        self.notify(LedgerEvent::CategoriesChanged);
        changed
    }

    pub fn replace_categories<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories.replace(names);
        self.notify(LedgerEvent::CategoriesChanged);
    }

    /// Empties both partitions and zeroes the budget, notifying once.
    pub fn clear(&mut self) {
        debug!("clearing ledger");
        self.fixed.clear();
        self.variable.clear();
        self.budget = 0.0;
        self.notify(LedgerEvent::Cleared);
    }

    /// Money spent across both partitions: `-Σ amount`. Inflows reduce it.
    pub fn total_spent(&self) -> Result<f64> {
        let mut spent = 0.0;
        for (_, row) in self.iter_rows() {
            spent -= row.amount_value()?;
        }
        Ok(spent)
    }

    pub fn remaining_budget(&self) -> Result<f64> {
        Ok(self.budget - self.total_spent()?)
    }

    pub fn subscribe<L>(&mut self, listener: L) -> ListenerId
    where
        L: LedgerListener + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Number of subscribed listeners. Reads 0 from inside a listener
    /// callback, while the list is detached for dispatch.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Takes over the data of `other` while keeping this ledger's listeners,
    /// then notifies once.
    pub fn replace_contents(&mut self, other: Ledger) {
        self.fixed = other.fixed;
        self.variable = other.variable;
        self.budget = other.budget;
        self.categories = other.categories;
        self.notify(LedgerEvent::Reloaded);
    }

    pub(crate) fn from_parts(
        budget: f64,
        categories: CategoryList,
        fixed: Vec<Row>,
        variable: Vec<Row>,
    ) -> Self {
        let mut ledger = Self::with_categories(categories);
        ledger.budget = budget_value(budget);
        ledger.fixed = fixed;
        ledger.variable = variable;
        ledger
    }

    fn rows_mut(&mut self, partition: Partition) -> &mut Vec<Row> {
        match partition {
            Partition::Fixed => &mut self.fixed,
            Partition::Variable => &mut self.variable,
        }
    }

    fn notify(&mut self, event: LedgerEvent) {
        if self.listeners.is_empty() {
            return;
        }
        debug!(?event, listeners = self.listeners.len(), "notifying ledger listeners");
        let mut listeners = std::mem::take(&mut self.listeners);
        let mut requested = Deferred::default();
        for (_, listener) in listeners.iter_mut() {
            listener.ledger_changed(&event, self, &mut requested);
        }
        self.listeners = listeners;
        self.pending.append(&mut requested);

        if self.dispatching {
            // an outer call is already draining the queue
            return;
        }
        self.dispatching = true;
        let mut applied = 0;
        while let Some(mutation) = self.pending.pop() {
            if applied == MAX_DEFERRED_MUTATIONS {
                warn!(
                    dropped = self.pending.len() + 1,
                    "deferred ledger mutations exceeded limit; dropping the rest"
                );
                self.pending.clear();
                break;
            }
            applied += 1;
            if let Err(err) = self.apply(mutation) {
                warn!(%err, "deferred ledger mutation rejected");
            }
        }
        self.dispatching = false;
    }

    fn apply(&mut self, mutation: Mutation) -> Result<()> {
        match mutation {
            Mutation::AddRow(partition, row) => self.add_row(partition, row),
            Mutation::RemoveRow(partition, index) => {
                self.remove_row(partition, index)?;
            }
            Mutation::ReplaceRow(partition, index, row) => {
                self.replace_row(partition, index, row)?;
            }
            Mutation::SortRows(partition, key) => self.sort_rows(partition, key)?,
            Mutation::SetBudget(amount) => self.set_budget(amount),
            Mutation::AddCategory(name) => {
                self.add_category(&name)?;
            }
            Mutation::RemoveCategory(name) => {
                self.remove_category(&name);
            }
            Mutation::ReplaceCategories(names) => self.replace_categories(names),
            Mutation::Clear => self.clear(),
        }
        Ok(())
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ledger")
            .field("budget", &self.budget)
            .field("categories", &self.categories)
            .field("fixed", &self.fixed)
            .field("variable", &self.variable)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

fn budget_value(amount: f64) -> f64 {
    if amount.is_finite() {
        amount.abs()
    } else {
        warn!(amount, "budget is not a finite number; using 0");
        0.0
    }
}

fn compare_amounts(a: f64, b: f64, abs: bool) -> Ordering {
    if abs {
        a.abs().total_cmp(&b.abs())
    } else {
        a.total_cmp(&b)
    }
}
