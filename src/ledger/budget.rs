use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use super::{ledger::Ledger, month_key::MonthKey};
use crate::errors::{ensure_finite, require_text, LedgerError, Result};

const DANGER_RATIO: f64 = 0.9;
const WARNING_RATIO: f64 = 0.75;

/// Spending limits keyed by category name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BudgetBook {
    limits: BTreeMap<String, f64>,
}

/// Spend-versus-limit snapshot for one category and month.
///
/// `remaining` and `ratio` are `None` when the limit is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetStatus {
    pub category: String,
    pub limit: f64,
    pub spent: f64,
    pub remaining: Option<f64>,
    pub ratio: Option<f64>,
    pub band: BudgetBand,
}

/// Named signalling bands derived from the spend ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetBand {
    Normal,
    Warning,
    Danger,
    Undefined,
}

impl BudgetBand {
    pub fn classify(ratio: Option<f64>) -> Self {
        match ratio {
            Some(r) if r >= DANGER_RATIO => BudgetBand::Danger,
            Some(r) if r >= WARNING_RATIO => BudgetBand::Warning,
            Some(r) if r.is_finite() => BudgetBand::Normal,
            _ => BudgetBand::Undefined,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetBand::Normal => "normal",
            BudgetBand::Warning => "warning",
            BudgetBand::Danger => "danger",
            BudgetBand::Undefined => "undefined",
        }
    }
}

impl fmt::Display for BudgetBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl BudgetStatus {
    pub fn from_parts(category: impl Into<String>, limit: f64, spent: f64) -> Self {
        let (remaining, ratio) = if limit == 0.0 {
            (None, None)
        } else {
            (Some(limit - spent), Some(spent / limit))
        };
        Self {
            category: category.into(),
            limit,
            spent,
            remaining,
            ratio,
            band: BudgetBand::classify(ratio),
        }
    }

    /// Ratio as a percentage clamped to `0..=100`, for progress bars.
    pub fn progress_percent(&self) -> Option<f64> {
        self.ratio.map(|ratio| (ratio * 100.0).clamp(0.0, 100.0))
    }
}

impl BudgetBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_budget(&mut self, category: &str, limit: f64) -> Result<()> {
        let category = require_text(category, "budget category")?;
        let limit = ensure_finite(limit)?;
        if limit <= 0.0 {
            return Err(LedgerError::InvalidAmount(format!(
                "budget limit must be positive, got {}",
                limit
            )));
        }
        self.limits.insert(category, limit);
        Ok(())
    }

    /// Removes the limit for `category`, reporting whether one existed.
    pub fn remove_budget(&mut self, category: &str) -> bool {
        self.limits.remove(category.trim()).is_some()
    }

    pub fn limit(&self, category: &str) -> Option<f64> {
        self.limits.get(category).copied()
    }

    pub fn status(&self, category: &str, month: MonthKey, ledger: &Ledger) -> Option<BudgetStatus> {
        let limit = self.limit(category)?;
        let spent = ledger.category_total(month, category);
        Some(BudgetStatus::from_parts(category, limit, spent))
    }

    pub fn statuses(&self, month: MonthKey, ledger: &Ledger) -> Vec<BudgetStatus> {
        self.limits
            .iter()
            .map(|(category, &limit)| {
                BudgetStatus::from_parts(category.clone(), limit, ledger.category_total(month, category))
            })
            .collect()
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.limits.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.limits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Transaction;
    use chrono::NaiveDate;

    fn jan() -> MonthKey {
        "2024-1".parse().unwrap()
    }

    fn ledger_with_food_spend(amounts: &[f64]) -> Ledger {
        let mut ledger = Ledger::new();
        let moment = NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        for amount in amounts {
            ledger
                .add_transaction(jan(), Transaction::at(moment, "meal", *amount, "Food"))
                .unwrap();
        }
        ledger
            .add_transaction(jan(), Transaction::at(moment, "power", 60.0, "Bills"))
            .unwrap();
        ledger
    }

    #[test]
    fn bands_follow_ratio_thresholds() {
        let mut book = BudgetBook::new();
        book.set_budget("Food", 100.0).unwrap();
        let cases = [
            (95.0, BudgetBand::Danger),
            (80.0, BudgetBand::Warning),
            (50.0, BudgetBand::Normal),
        ];
        for (spent, band) in cases {
            let ledger = ledger_with_food_spend(&[spent]);
            let status = book.status("Food", jan(), &ledger).unwrap();
            assert_eq!(status.band, band, "spent {spent}");
            assert_eq!(status.remaining, Some(100.0 - spent));
            assert_eq!(status.ratio, Some(spent / 100.0));
        }
    }

    #[test]
    fn classify_boundaries_are_inclusive() {
        assert_eq!(BudgetBand::classify(Some(0.9)), BudgetBand::Danger);
        assert_eq!(BudgetBand::classify(Some(0.75)), BudgetBand::Warning);
        assert_eq!(BudgetBand::classify(Some(0.7499)), BudgetBand::Normal);
        assert_eq!(BudgetBand::classify(None), BudgetBand::Undefined);
    }

    #[test]
    fn spent_only_counts_matching_category() {
        let mut book = BudgetBook::new();
        book.set_budget("Food", 200.0).unwrap();
        let ledger = ledger_with_food_spend(&[30.0, 20.0]);
        let status = book.status("Food", jan(), &ledger).unwrap();
        assert_eq!(status.spent, 50.0);
        assert_eq!(status.progress_percent(), Some(25.0));
    }

    #[test]
    fn zero_limit_reports_undefined() {
        let status = BudgetStatus::from_parts("Food", 0.0, 12.0);
        assert_eq!(status.remaining, None);
        assert_eq!(status.ratio, None);
        assert_eq!(status.band, BudgetBand::Undefined);
        assert_eq!(status.progress_percent(), None);
    }

    #[test]
    fn set_budget_requires_positive_limit() {
        let mut book = BudgetBook::new();
        for limit in [0.0, -5.0, f64::NAN] {
            assert!(matches!(
                book.set_budget("Food", limit),
                Err(LedgerError::InvalidAmount(_))
            ));
        }
        assert!(matches!(
            book.set_budget(" ", 10.0),
            Err(LedgerError::InvalidInput(_))
        ));
        assert!(book.is_empty());
    }

    #[test]
    fn set_upserts_and_remove_is_idempotent() {
        let mut book = BudgetBook::new();
        book.set_budget("Food", 100.0).unwrap();
        book.set_budget("Food", 150.0).unwrap();
        assert_eq!(book.limit("Food"), Some(150.0));
        assert!(book.remove_budget("Food"));
        assert!(!book.remove_budget("Food"));
        assert!(book.status("Food", jan(), &Ledger::new()).is_none());
    }

    #[test]
    fn statuses_list_every_budget_in_name_order() {
        let mut book = BudgetBook::new();
        book.set_budget("Transport", 40.0).unwrap();
        book.set_budget("Bills", 100.0).unwrap();
        let ledger = ledger_with_food_spend(&[]);
        let statuses = book.statuses(jan(), &ledger);
        let names: Vec<_> = statuses.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(names, ["Bills", "Transport"]);
        assert_eq!(statuses[0].spent, 60.0);
        assert_eq!(statuses[1].spent, 0.0);
    }
}
