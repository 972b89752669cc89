use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::{ensure_finite, LedgerError, Result};

/// Which side of an informal debt the user is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebtDirection {
    #[serde(rename = "i-owe")]
    OwedByMe,
    #[serde(rename = "owed-to-me", alias = "owed")]
    OwedToMe,
}

impl DebtDirection {
    pub fn label(&self) -> &'static str {
        match self {
            DebtDirection::OwedByMe => "I Owe",
            DebtDirection::OwedToMe => "Owed to me",
        }
    }
}

impl fmt::Display for DebtDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DebtDirection {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "i-owe" | "owe" | "mine" => Ok(DebtDirection::OwedByMe),
            "owed-to-me" | "owed" | "theirs" => Ok(DebtDirection::OwedToMe),
            other => Err(LedgerError::InvalidInput(format!(
                "unknown debt direction `{}` (use i-owe or owed-to-me)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    pub description: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub direction: DebtDirection,
}

/// Running balance across all recorded debts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DebtTotals {
    pub owed_by_me: f64,
    pub owed_to_me: f64,
}

impl DebtTotals {
    /// Positive when others owe the user more than the user owes.
    pub fn net(&self) -> f64 {
        self.owed_to_me - self.owed_by_me
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DebtBook {
    entries: Vec<Debt>,
}

impl DebtBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_debt(
        &mut self,
        description: impl Into<String>,
        amount: f64,
        direction: DebtDirection,
    ) -> Result<&Debt> {
        let amount = ensure_finite(amount)?;
        self.entries.push(Debt {
            description: description.into(),
            amount,
            direction,
        });
        Ok(&self.entries[self.entries.len() - 1])
    }

    pub fn remove_debt(&mut self, index: usize) -> Result<Debt> {
        if index >= self.entries.len() {
            return Err(LedgerError::out_of_range(index, self.entries.len()));
        }
        Ok(self.entries.remove(index))
    }

    pub fn list(&self) -> &[Debt] {
        &self.entries
    }

    pub fn totals(&self) -> DebtTotals {
        self.entries
            .iter()
            .fold(DebtTotals::default(), |mut totals, debt| {
                match debt.direction {
                    DebtDirection::OwedByMe => totals.owed_by_me += debt.amount,
                    DebtDirection::OwedToMe => totals.owed_to_me += debt.amount,
                }
                totals
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_remove_by_position() {
        let mut book = DebtBook::new();
        book.add_debt("Lunch", 12.0, DebtDirection::OwedToMe).unwrap();
        book.add_debt("Concert", 40.0, DebtDirection::OwedByMe).unwrap();
        let removed = book.remove_debt(0).unwrap();
        assert_eq!(removed.description, "Lunch");
        assert_eq!(book.list()[0].description, "Concert");
    }

    #[test]
    fn remove_out_of_range_leaves_book_untouched() {
        let mut book = DebtBook::new();
        book.add_debt("Taxi", 9.0, DebtDirection::OwedByMe).unwrap();
        let err = book.remove_debt(3).expect_err("no such debt");
        assert!(matches!(err, LedgerError::IndexOutOfRange { index: 3, len: 1 }));
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn rejects_non_numeric_amount() {
        let mut book = DebtBook::new();
        assert!(matches!(
            book.add_debt("?", f64::NAN, DebtDirection::OwedByMe),
            Err(LedgerError::InvalidAmount(_))
        ));
        assert!(book.is_empty());
    }

    #[test]
    fn totals_split_by_direction() {
        let mut book = DebtBook::new();
        book.add_debt("a", 10.0, DebtDirection::OwedByMe).unwrap();
        book.add_debt("b", 25.0, DebtDirection::OwedToMe).unwrap();
        book.add_debt("c", 5.0, DebtDirection::OwedByMe).unwrap();
        let totals = book.totals();
        assert_eq!(totals.owed_by_me, 15.0);
        assert_eq!(totals.owed_to_me, 25.0);
        assert_eq!(totals.net(), 10.0);
    }

    #[test]
    fn persists_direction_under_type_field() {
        let debt = Debt {
            description: "Rent share".into(),
            amount: 300.0,
            direction: DebtDirection::OwedByMe,
        };
        let json = serde_json::to_value(&debt).unwrap();
        assert_eq!(json["type"], "i-owe");
        let parsed: Debt =
            serde_json::from_str(r#"{"description":"x","amount":1,"type":"owed-to-me"}"#).unwrap();
        assert_eq!(parsed.direction, DebtDirection::OwedToMe);
    }

    #[test]
    fn direction_parses_cli_spellings() {
        assert_eq!("I-OWE".parse::<DebtDirection>().unwrap(), DebtDirection::OwedByMe);
        assert_eq!("owed".parse::<DebtDirection>().unwrap(), DebtDirection::OwedToMe);
        assert!("maybe".parse::<DebtDirection>().is_err());
    }
}
