//! Application context: the single owner of every store and the active month.

use std::path::Path;

use chrono::NaiveDateTime;

use crate::{
    errors::Result,
    ledger::{
        BudgetBook, BudgetStatus, CategorySet, Debt, DebtBook, DebtDirection, DebtTotals, Ledger,
        MonthKey, MonthSummary, Rollover, SortKey, SortedView, Split, SplitBook, Transaction,
        TransactionPatch,
    },
    storage::{load_or_default, save_value, BackupDocument, StorageBackend, StoreKey},
};

/// Owns the tracked data and persists each store right after it changes.
///
/// Every command either succeeds and persists, or fails and leaves the
/// in-memory stores as they were. A failed save reverts the change it carried.
pub struct AppContext {
    ledger: Ledger,
    budgets: BudgetBook,
    categories: CategorySet,
    debts: DebtBook,
    splits: SplitBook,
    active_month: MonthKey,
    storage: Box<dyn StorageBackend>,
}

impl AppContext {
    /// Loads every store from `storage`; the active month starts at today's month.
    pub fn open(storage: Box<dyn StorageBackend>) -> Result<Self> {
        let backend = storage.as_ref();
        let ledger: Ledger = load_or_default(backend, StoreKey::Transactions)?;
        let budgets = load_or_default(backend, StoreKey::Budgets)?;
        let categories = load_or_default(backend, StoreKey::Categories)?;
        let debts = load_or_default(backend, StoreKey::Debts)?;
        let splits = load_or_default(backend, StoreKey::Splits)?;
        tracing::info!(
            months = ledger.month_count(),
            transactions = ledger.transaction_count(),
            "loaded tracker state"
        );
        Ok(Self {
            ledger,
            budgets,
            categories,
            debts,
            splits,
            active_month: MonthKey::current(),
            storage,
        })
    }

    pub fn with_active_month(mut self, month: MonthKey) -> Self {
        self.active_month = month;
        self
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn budgets(&self) -> &BudgetBook {
        &self.budgets
    }

    pub fn categories(&self) -> &CategorySet {
        &self.categories
    }

    pub fn debts(&self) -> &DebtBook {
        &self.debts
    }

    pub fn splits(&self) -> &SplitBook {
        &self.splits
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    pub fn active_month(&self) -> MonthKey {
        self.active_month
    }

    pub fn set_active_month(&mut self, month: MonthKey) {
        tracing::debug!(%month, "active month changed");
        self.active_month = month;
    }

    // Transactions

    /// Records `transaction` in the active month, returning its storage index.
    pub fn add_transaction(&mut self, transaction: Transaction) -> Result<usize> {
        let month = self.active_month;
        let previous = Snapshot::Transactions(self.ledger.clone());
        let index = self.ledger.add_transaction(month, transaction)?;
        self.commit(previous)?;
        tracing::info!(%month, index, "transaction added");
        Ok(index)
    }

    pub fn quick_add(&mut self, category: &str, amount: f64, now: NaiveDateTime) -> Result<usize> {
        self.add_transaction(Transaction::quick_add(now, category.trim(), amount))
    }

    pub fn edit_transaction(&mut self, index: usize, patch: &TransactionPatch) -> Result<Transaction> {
        let month = self.active_month;
        let previous = Snapshot::Transactions(self.ledger.clone());
        let updated = self.ledger.edit_transaction(month, index, patch)?.clone();
        self.commit(previous)?;
        tracing::info!(%month, index, "transaction edited");
        Ok(updated)
    }

    pub fn delete_transaction(&mut self, index: usize) -> Result<Transaction> {
        let month = self.active_month;
        let previous = Snapshot::Transactions(self.ledger.clone());
        let removed = self.ledger.delete_transaction(month, index)?;
        self.commit(previous)?;
        tracing::info!(%month, index, "transaction deleted");
        Ok(removed)
    }

    pub fn sorted_transactions(&self, key: SortKey) -> SortedView<'_> {
        self.ledger.sorted_view(self.active_month, key)
    }

    pub fn active_total(&self) -> f64 {
        self.ledger.month_total(self.active_month)
    }

    pub fn month_summaries(&self) -> Vec<MonthSummary> {
        self.ledger.month_summaries()
    }

    pub fn start_next_month(&mut self) -> Result<Rollover> {
        self.start_next_month_at(chrono::Local::now().naive_local())
    }

    /// Carries recurring transactions forward and makes the next month active.
    pub fn start_next_month_at(&mut self, now: NaiveDateTime) -> Result<Rollover> {
        let from = self.active_month;
        let previous = Snapshot::Transactions(self.ledger.clone());
        let rollover = self.ledger.rollover_to_next_month_at(from, now);
        self.commit(previous)?;
        self.active_month = rollover.month;
        tracing::info!(
            %from,
            to = %rollover.month,
            carried = rollover.carried,
            "started new month"
        );
        Ok(rollover)
    }

    // Categories

    pub fn add_category(&mut self, name: &str) -> Result<bool> {
        let previous = Snapshot::Categories(self.categories.clone());
        let added = self.categories.add_category(name)?;
        if added {
            self.commit(previous)?;
            tracing::info!(category = name.trim(), "category added");
        }
        Ok(added)
    }

    pub fn remove_category(&mut self, name: &str) -> Result<bool> {
        let previous = Snapshot::Categories(self.categories.clone());
        let removed = self.categories.remove_category(name);
        if removed {
            self.commit(previous)?;
            tracing::info!(category = name.trim(), "category removed");
        }
        Ok(removed)
    }

    // Budgets

    pub fn set_budget(&mut self, category: &str, limit: f64) -> Result<()> {
        let previous = Snapshot::Budgets(self.budgets.clone());
        self.budgets.set_budget(category, limit)?;
        self.commit(previous)?;
        tracing::info!(category = category.trim(), limit, "budget set");
        Ok(())
    }

    pub fn remove_budget(&mut self, category: &str) -> Result<bool> {
        let previous = Snapshot::Budgets(self.budgets.clone());
        let removed = self.budgets.remove_budget(category);
        if removed {
            self.commit(previous)?;
            tracing::info!(category = category.trim(), "budget removed");
        }
        Ok(removed)
    }

    pub fn budget_status(&self, category: &str) -> Option<BudgetStatus> {
        self.budgets
            .status(category, self.active_month, &self.ledger)
    }

    pub fn budget_statuses(&self) -> Vec<BudgetStatus> {
        self.budgets.statuses(self.active_month, &self.ledger)
    }

    // Debts

    pub fn add_debt(
        &mut self,
        description: &str,
        amount: f64,
        direction: DebtDirection,
    ) -> Result<Debt> {
        let previous = Snapshot::Debts(self.debts.clone());
        let debt = self.debts.add_debt(description, amount, direction)?.clone();
        self.commit(previous)?;
        tracing::info!(direction = ?direction, amount, "debt added");
        Ok(debt)
    }

    pub fn remove_debt(&mut self, index: usize) -> Result<Debt> {
        let previous = Snapshot::Debts(self.debts.clone());
        let removed = self.debts.remove_debt(index)?;
        self.commit(previous)?;
        tracing::info!(index, "debt removed");
        Ok(removed)
    }

    pub fn debt_totals(&self) -> DebtTotals {
        self.debts.totals()
    }

    // Splits

    pub fn add_split(&mut self, description: &str, total: f64, participants: &str) -> Result<Split> {
        let previous = Snapshot::Splits(self.splits.clone());
        let split = self.splits.add_split(description, total, participants)?.clone();
        self.commit(previous)?;
        tracing::info!(
            total,
            participants = split.participants.len(),
            "split added"
        );
        Ok(split)
    }

    pub fn remove_split(&mut self, index: usize) -> Result<Split> {
        let previous = Snapshot::Splits(self.splits.clone());
        let removed = self.splits.remove_split(index)?;
        self.commit(previous)?;
        tracing::info!(index, "split removed");
        Ok(removed)
    }

    // Backup & restore

    pub fn backup_document(&self) -> BackupDocument {
        BackupDocument {
            transactions: self.ledger.clone(),
            debts: self.debts.clone(),
            splits: self.splits.clone(),
            budgets: self.budgets.clone(),
            categories: self.categories.clone(),
        }
    }

    pub fn export_backup(&self, path: &Path) -> Result<()> {
        self.backup_document().write_to(path)?;
        tracing::info!(path = %path.display(), "backup exported");
        Ok(())
    }

    /// Parses `raw` completely before replacing any state.
    pub fn restore_from_str(&mut self, raw: &str) -> Result<()> {
        let document = BackupDocument::parse(raw)?;
        self.restore(document)
    }

    pub fn restore_from_path(&mut self, path: &Path) -> Result<()> {
        let document = BackupDocument::read_from(path)?;
        self.restore(document)?;
        tracing::info!(path = %path.display(), "backup restored");
        Ok(())
    }

    /// Replaces all five stores with `document`, then persists each of them.
    ///
    /// If a save fails the previous in-memory state comes back; store files
    /// written before the failure keep the restored content.
    pub fn restore(&mut self, document: BackupDocument) -> Result<()> {
        let previous = self.backup_document();
        let BackupDocument {
            transactions,
            debts,
            splits,
            budgets,
            categories,
        } = document;
        self.ledger = transactions;
        self.debts = debts;
        self.splits = splits;
        self.budgets = budgets;
        self.categories = categories;
        for key in StoreKey::ALL {
            if let Err(err) = self.persist(key) {
                tracing::warn!(store = %key, error = %err, "restore not saved; keeping previous state");
                self.replace_all(previous);
                return Err(err);
            }
        }
        Ok(())
    }

    fn replace_all(&mut self, document: BackupDocument) {
        self.ledger = document.transactions;
        self.debts = document.debts;
        self.splits = document.splits;
        self.budgets = document.budgets;
        self.categories = document.categories;
    }

    /// Persists the store `previous` was taken from, putting it back if the save fails.
    fn commit(&mut self, previous: Snapshot) -> Result<()> {
        let key = previous.key();
        if let Err(err) = self.persist(key) {
            tracing::warn!(store = %key, error = %err, "save failed; change reverted");
            match previous {
                Snapshot::Transactions(ledger) => self.ledger = ledger,
                Snapshot::Debts(debts) => self.debts = debts,
                Snapshot::Splits(splits) => self.splits = splits,
                Snapshot::Budgets(budgets) => self.budgets = budgets,
                Snapshot::Categories(categories) => self.categories = categories,
            }
            return Err(err);
        }
        Ok(())
    }

    fn persist(&self, key: StoreKey) -> Result<()> {
        let backend = self.storage.as_ref();
        match key {
            StoreKey::Transactions => save_value(backend, key, &self.ledger),
            StoreKey::Debts => save_value(backend, key, &self.debts),
            StoreKey::Splits => save_value(backend, key, &self.splits),
            StoreKey::Budgets => save_value(backend, key, &self.budgets),
            StoreKey::Categories => save_value(backend, key, &self.categories),
        }
    }
}

/// One store as it was before a mutation.
enum Snapshot {
    Transactions(Ledger),
    Debts(DebtBook),
    Splits(SplitBook),
    Budgets(BudgetBook),
    Categories(CategorySet),
}

impl Snapshot {
    fn key(&self) -> StoreKey {
        match self {
            Snapshot::Transactions(_) => StoreKey::Transactions,
            Snapshot::Debts(_) => StoreKey::Debts,
            Snapshot::Splits(_) => StoreKey::Splits,
            Snapshot::Budgets(_) => StoreKey::Budgets,
            Snapshot::Categories(_) => StoreKey::Categories,
        }
    }
}
