use std::{cmp::Ordering, collections::BTreeMap, fmt, str::FromStr};

use chrono::NaiveDateTime;
use serde::{
    de::{self, MapAccess, Visitor},
    Deserialize, Deserializer, Serialize,
};

use super::{
    month_key::MonthKey,
    transaction::{Transaction, TransactionPatch},
};
use crate::errors::{LedgerError, Result};

/// Month-keyed collection of transactions.
///
/// Each month keeps its transactions in the order they were added; sorted
/// listings are produced by [`Ledger::sorted_view`] and never reorder storage.
/// Reading a document where two keys name the same month (`"2024-3"` and
/// `"2024-03"`) is an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Ledger {
    months: BTreeMap<MonthKey, Vec<Transaction>>,
}

impl<'de> Deserialize<'de> for Ledger {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct MonthsVisitor;

        impl<'de> Visitor<'de> for MonthsVisitor {
            type Value = Ledger;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of YEAR-MONTH keys to transaction lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Ledger, A::Error> {
                let mut months = BTreeMap::new();
                while let Some((month, entries)) = access.next_entry::<MonthKey, Vec<Transaction>>()? {
                    if months.insert(month, entries).is_some() {
                        return Err(de::Error::custom(format!(
                            "month {} appears under more than one key",
                            month
                        )));
                    }
                }
                Ok(Ledger { months })
            }
        }

        deserializer.deserialize_map(MonthsVisitor)
    }
}

/// Total spend recorded for one month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthSummary {
    pub month: MonthKey,
    pub total: f64,
}

/// Outcome of carrying recurring transactions into the following month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rollover {
    pub month: MonthKey,
    pub carried: usize,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_transaction(&mut self, month: MonthKey, transaction: Transaction) -> Result<usize> {
        transaction.validate()?;
        let entries = self.months.entry(month).or_default();
        entries.push(transaction);
        Ok(entries.len() - 1)
    }

    pub fn edit_transaction(
        &mut self,
        month: MonthKey,
        index: usize,
        patch: &TransactionPatch,
    ) -> Result<&Transaction> {
        let entries = self
            .months
            .get_mut(&month)
            .ok_or(LedgerError::out_of_range(index, 0))?;
        let len = entries.len();
        let slot = entries
            .get_mut(index)
            .ok_or(LedgerError::out_of_range(index, len))?;
        *slot = patch.applied_to(slot)?;
        Ok(slot)
    }

    pub fn delete_transaction(&mut self, month: MonthKey, index: usize) -> Result<Transaction> {
        let entries = self
            .months
            .get_mut(&month)
            .ok_or(LedgerError::out_of_range(index, 0))?;
        if index >= entries.len() {
            return Err(LedgerError::out_of_range(index, entries.len()));
        }
        Ok(entries.remove(index))
    }

    /// Transactions of `month` in storage order; empty when the month is unknown.
    pub fn transactions(&self, month: MonthKey) -> &[Transaction] {
        self.months.get(&month).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn transaction(&self, month: MonthKey, index: usize) -> Option<&Transaction> {
        self.transactions(month).get(index)
    }

    pub fn contains_month(&self, month: MonthKey) -> bool {
        self.months.contains_key(&month)
    }

    pub fn sorted_view(&self, month: MonthKey, key: SortKey) -> SortedView<'_> {
        SortedView::new(self.transactions(month), key)
    }

    pub fn month_total(&self, month: MonthKey) -> f64 {
        self.transactions(month).iter().map(|txn| txn.amount).sum()
    }

    /// Sum of the month's transactions filed under `category`.
    pub fn category_total(&self, month: MonthKey, category: &str) -> f64 {
        self.transactions(month)
            .iter()
            .filter(|txn| txn.category == category)
            .map(|txn| txn.amount)
            .sum()
    }

    pub fn month_summaries(&self) -> Vec<MonthSummary> {
        self.months
            .keys()
            .map(|&month| MonthSummary {
                month,
                total: self.month_total(month),
            })
            .collect()
    }

    pub fn months_newest_first(&self) -> Vec<MonthKey> {
        self.months.keys().rev().copied().collect()
    }

    pub fn rollover_to_next_month(&mut self, current: MonthKey) -> Rollover {
        self.rollover_to_next_month_at(current, chrono::Local::now().naive_local())
    }

    /// Copies the recurring transactions of `current` into the following month,
    /// stamped with `now`. The following month's sequence is replaced by the
    /// copies; `current` itself is left untouched.
    pub fn rollover_to_next_month_at(&mut self, current: MonthKey, now: NaiveDateTime) -> Rollover {
        let next = current.next();
        let carried: Vec<Transaction> = self
            .transactions(current)
            .iter()
            .filter(|txn| txn.recurring)
            .map(|txn| txn.restamped(now))
            .collect();
        let count = carried.len();
        self.months.insert(next, carried);
        Rollover {
            month: next,
            carried: count,
        }
    }

    pub fn month_count(&self) -> usize {
        self.months.len()
    }

    pub fn transaction_count(&self) -> usize {
        self.months.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}

/// Display orderings for a month's transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    DateDesc,
    DateAsc,
    AmountDesc,
    AmountAsc,
    Category,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::DateDesc,
        SortKey::DateAsc,
        SortKey::AmountDesc,
        SortKey::AmountAsc,
        SortKey::Category,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::DateDesc => "date-desc",
            SortKey::DateAsc => "date-asc",
            SortKey::AmountDesc => "amount-desc",
            SortKey::AmountAsc => "amount-asc",
            SortKey::Category => "category",
        }
    }

    fn compare(&self, a: &Transaction, b: &Transaction) -> Ordering {
        match self {
            SortKey::DateDesc => b.date.cmp(&a.date),
            SortKey::DateAsc => a.date.cmp(&b.date),
            SortKey::AmountDesc => b.amount.total_cmp(&a.amount),
            SortKey::AmountAsc => a.amount.total_cmp(&b.amount),
            SortKey::Category => a.category.cmp(&b.category),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_ascii_lowercase();
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == needle)
            .ok_or_else(|| {
                LedgerError::InvalidInput(format!(
                    "unknown sort `{}` (expected one of: date-desc, date-asc, amount-desc, amount-asc, category)",
                    s
                ))
            })
    }
}

/// Sorted, read-only view over one month's transactions.
///
/// Holds a stable permutation of storage indices; iterate as often as needed.
#[derive(Debug, Clone)]
pub struct SortedView<'a> {
    entries: &'a [Transaction],
    order: Vec<usize>,
}

impl<'a> SortedView<'a> {
    fn new(entries: &'a [Transaction], key: SortKey) -> Self {
        let mut order: Vec<usize> = (0..entries.len()).collect();
        // `sort_by` is stable, so equal keys keep insertion order.
        order.sort_by(|&a, &b| key.compare(&entries[a], &entries[b]));
        Self { entries, order }
    }

    /// Yields `(storage_index, transaction)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &'a Transaction)> + '_ {
        let entries = self.entries;
        self.order.iter().map(move |&index| (index, &entries[index]))
    }

    pub fn transactions(&self) -> impl Iterator<Item = &'a Transaction> + '_ {
        self.iter().map(|(_, txn)| txn)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
