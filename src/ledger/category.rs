use serde::{Deserialize, Serialize};

use crate::errors::{require_text, Result};

/// Labels offered when no category list has been stored yet.
pub const DEFAULT_CATEGORIES: [&str; 5] = ["Food", "Bills", "Transport", "Entertainment", "Other"];

/// Ordered set of category labels.
///
/// Transactions and budgets refer to categories by name only; removing a
/// label never rewrites them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategorySet {
    names: Vec<String>,
}

impl Default for CategorySet {
    fn default() -> Self {
        Self {
            names: DEFAULT_CATEGORIES.iter().map(|name| name.to_string()).collect(),
        }
    }
}

impl CategorySet {
    pub fn empty() -> Self {
        Self { names: Vec::new() }
    }

    /// Adds a trimmed label; returns `false` when it was already present.
    pub fn add_category(&mut self, name: &str) -> Result<bool> {
        let name = require_text(name, "category name")?;
        if self.contains(&name) {
            return Ok(false);
        }
        self.names.push(name);
        Ok(true)
    }

    pub fn remove_category(&mut self, name: &str) -> bool {
        let before = self.names.len();
        self.names.retain(|existing| existing != name.trim());
        self.names.len() != before
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|existing| existing == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LedgerError;

    #[test]
    fn default_set_has_five_labels() {
        let set = CategorySet::default();
        let names: Vec<_> = set.iter().collect();
        assert_eq!(names, DEFAULT_CATEGORIES);
    }

    #[test]
    fn add_trims_and_ignores_duplicates() {
        let mut set = CategorySet::default();
        assert!(set.add_category("  Health ").unwrap());
        assert!(!set.add_category("Health").unwrap());
        assert_eq!(set.len(), 6);
        assert!(set.contains("Health"));
    }

    #[test]
    fn add_rejects_blank_names() {
        let mut set = CategorySet::empty();
        assert!(matches!(
            set.add_category("   "),
            Err(LedgerError::InvalidInput(_))
        ));
        assert!(set.is_empty());
    }

    #[test]
    fn remove_reports_presence() {
        let mut set = CategorySet::default();
        assert!(set.remove_category("Other"));
        assert!(!set.remove_category("Other"));
        assert_eq!(set.len(), 4);
    }
}
