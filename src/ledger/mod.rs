//! Ledger domain models, persistence-friendly types, and derived views.

pub mod budget;
pub mod category;
pub mod debt;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod month_key;
pub mod split;
pub mod transaction;

pub use budget::{BudgetBand, BudgetBook, BudgetStatus};
pub use category::{CategorySet, DEFAULT_CATEGORIES};
pub use debt::{Debt, DebtBook, DebtDirection, DebtTotals};
pub use ledger::{Ledger, MonthSummary, Rollover, SortKey, SortedView};
pub use month_key::MonthKey;
pub use split::{parse_participants, Split, SplitBook};
pub use transaction::{Transaction, TransactionPatch};
