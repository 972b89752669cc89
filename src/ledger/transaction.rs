use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::errors::{ensure_non_negative, require_text, Result};

/// A single recorded expense.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub date: NaiveDate,
    #[serde(with = "clock_time")]
    pub time: NaiveTime,
    pub description: String,
    pub amount: f64,
    pub category: String,
    #[serde(default)]
    pub recurring: bool,
}

impl Transaction {
    pub fn new(
        date: NaiveDate,
        time: NaiveTime,
        description: impl Into<String>,
        amount: f64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            date,
            time,
            description: description.into(),
            amount,
            category: category.into(),
            recurring: false,
        }
    }

    /// Builds a transaction stamped with the given moment.
    pub fn at(
        moment: NaiveDateTime,
        description: impl Into<String>,
        amount: f64,
        category: impl Into<String>,
    ) -> Self {
        Self::new(moment.date(), clock(moment.time()), description, amount, category)
    }

    /// Quick-add entries are described after their category.
    pub fn quick_add(moment: NaiveDateTime, category: impl Into<String>, amount: f64) -> Self {
        let category = category.into();
        let description = format!("Quick Add - {}", category);
        Self::at(moment, description, amount, category)
    }

    pub fn with_recurring(mut self, recurring: bool) -> Self {
        self.recurring = recurring;
        self
    }

    /// Copy of this transaction with date and time replaced by `moment`.
    pub fn restamped(&self, moment: NaiveDateTime) -> Self {
        Self {
            date: moment.date(),
            time: clock(moment.time()),
            ..self.clone()
        }
    }

    /// Checks the invariants a stored transaction must satisfy.
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative(self.amount)?;
        require_text(&self.category, "category")?;
        Ok(())
    }
}

/// Structured edit request; `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<String>,
}

impl TransactionPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.amount.is_none() && self.category.is_none()
    }

    /// Returns the patched copy of `target`, validated, without touching `target`.
    pub(crate) fn applied_to(&self, target: &Transaction) -> Result<Transaction> {
        let mut updated = target.clone();
        if let Some(description) = &self.description {
            updated.description = description.clone();
        }
        if let Some(amount) = self.amount {
            updated.amount = ensure_non_negative(amount)?;
        }
        if let Some(category) = &self.category {
            updated.category = require_text(category, "category")?;
        }
        Ok(updated)
    }
}

fn clock(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

/// Stores clock times as `HH:MM`, accepting `HH:MM:SS` on read and dropping the seconds.
mod clock_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map(super::clock)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LedgerError;

    fn sample() -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            "Groceries",
            42.5,
            "Food",
        )
    }

    #[test]
    fn serializes_in_stored_shape() {
        let json = serde_json::to_value(sample().with_recurring(true)).unwrap();
        assert_eq!(json["date"], "2024-01-05");
        assert_eq!(json["time"], "09:30");
        assert_eq!(json["amount"], 42.5);
        assert_eq!(json["recurring"], true);
    }

    #[test]
    fn reads_records_without_recurring_flag_or_with_seconds() {
        let raw = r#"{"date":"2024-02-01","time":"18:05:30","description":"Bus","amount":2.5,"category":"Transport"}"#;
        let txn: Transaction = serde_json::from_str(raw).unwrap();
        assert!(!txn.recurring);
        assert_eq!(txn.time, NaiveTime::from_hms_opt(18, 5, 0).unwrap());
    }

    #[test]
    fn restamp_drops_seconds_and_keeps_other_fields() {
        let moment = NaiveDate::from_ymd_opt(2024, 2, 1)
            .unwrap()
            .and_hms_opt(7, 15, 42)
            .unwrap();
        let copy = sample().with_recurring(true).restamped(moment);
        assert_eq!(copy.date, moment.date());
        assert_eq!(copy.time, NaiveTime::from_hms_opt(7, 15, 0).unwrap());
        assert_eq!(copy.description, "Groceries");
        assert!(copy.recurring);
    }

    #[test]
    fn quick_add_describes_after_category() {
        let moment = NaiveDate::from_ymd_opt(2024, 2, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let txn = Transaction::quick_add(moment, "Transport", 3.0);
        assert_eq!(txn.description, "Quick Add - Transport");
        assert_eq!(txn.category, "Transport");
    }

    #[test]
    fn patch_validates_before_applying() {
        let txn = sample();
        let err = TransactionPatch::new()
            .amount(f64::NAN)
            .applied_to(&txn)
            .expect_err("NaN rejected");
        assert!(matches!(err, LedgerError::InvalidAmount(_)));

        let updated = TransactionPatch::new()
            .description("Market")
            .applied_to(&txn)
            .unwrap();
        assert_eq!(updated.description, "Market");
        assert_eq!(updated.amount, 42.5);
    }
}
