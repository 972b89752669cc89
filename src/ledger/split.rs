use serde::{Deserialize, Serialize};

use crate::errors::{ensure_finite, LedgerError, Result};

/// An even division of a shared bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split {
    pub description: String,
    pub total: f64,
    pub participants: Vec<String>,
    /// Per-person share, `total / participants.len()`.
    pub each: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SplitBook {
    entries: Vec<Split>,
}

/// Splits a comma separated list into trimmed, non-empty names.
pub fn parse_participants(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

impl SplitBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_split(
        &mut self,
        description: impl Into<String>,
        total: f64,
        raw_participants: &str,
    ) -> Result<&Split> {
        let total = ensure_finite(total)?;
        let participants = parse_participants(raw_participants);
        if participants.is_empty() {
            return Err(LedgerError::InvalidInput(
                "a split needs at least one participant".into(),
            ));
        }
        let each = total / participants.len() as f64;
        self.entries.push(Split {
            description: description.into(),
            total,
            participants,
            each,
        });
        Ok(&self.entries[self.entries.len() - 1])
    }

    pub fn remove_split(&mut self, index: usize) -> Result<Split> {
        if index >= self.entries.len() {
            return Err(LedgerError::out_of_range(index, self.entries.len()));
        }
        Ok(self.entries.remove(index))
    }

    pub fn list(&self) -> &[Split] {
        &self.entries
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
    fn dinner_for_three() {
        let mut book = SplitBook::new();
        let split = book.add_split("Dinner", 90.0, "Alice, Bob, Carol").unwrap();
        assert_eq!(split.each, 30.0);
        assert_eq!(split.participants, ["Alice", "Bob", "Carol"]);
    }

    #[test]
    fn blank_tokens_are_dropped() {
        assert_eq!(parse_participants(" Ann ,, ,Ben,"), ["Ann", "Ben"]);
    }

    #[test]
    fn empty_participant_list_is_rejected() {
        let mut book = SplitBook::new();
        for raw in ["", " , ,"] {
            assert!(matches!(
                book.add_split("Cab", 20.0, raw),
                Err(LedgerError::InvalidInput(_))
            ));
        }
        assert!(book.is_empty());
    }

    #[test]
    fn non_numeric_total_is_rejected() {
        let mut book = SplitBook::new();
        assert!(matches!(
            book.add_split("Cab", f64::INFINITY, "Ann"),
            Err(LedgerError::InvalidAmount(_))
        ));
    }

    #[test]
    fn remove_by_position() {
        let mut book = SplitBook::new();
        book.add_split("A", 10.0, "x,y").unwrap();
        book.add_split("B", 12.0, "x,y,z").unwrap();
        assert_eq!(book.remove_split(0).unwrap().description, "A");
        assert_eq!(book.list()[0].each, 4.0);
        assert!(matches!(
            book.remove_split(1),
            Err(LedgerError::IndexOutOfRange { index: 1, len: 1 })
        ));
    }
}
