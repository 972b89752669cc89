pub mod backup;
pub mod json_backend;

use std::{collections::HashMap, fmt, sync::Mutex};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::errors::{LedgerError, Result};

/// The independently persisted top-level stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Transactions,
    Debts,
    Splits,
    Budgets,
    Categories,
}

impl StoreKey {
    pub const ALL: [StoreKey; 5] = [
        StoreKey::Transactions,
        StoreKey::Debts,
        StoreKey::Splits,
        StoreKey::Budgets,
        StoreKey::Categories,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::Transactions => "transactions",
            StoreKey::Debts => "debts",
            StoreKey::Splits => "splits",
            StoreKey::Budgets => "budgets",
            StoreKey::Categories => "categories",
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key-value persistence of JSON documents.
pub trait StorageBackend: Send + Sync {
    /// Returns the stored value, or `None` when nothing was saved under `key`.
    fn load(&self, key: StoreKey) -> Result<Option<Value>>;
    fn save(&self, key: StoreKey, value: &Value) -> Result<()>;
}

/// Loads and decodes `key`, falling back to `T::default()` when absent.
pub fn load_or_default<T>(backend: &dyn StorageBackend, key: StoreKey) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    match backend.load(key)? {
        Some(value) => serde_json::from_value(value).map_err(|err| {
            LedgerError::Storage(format!("stored `{}` is unreadable: {}", key, err))
        }),
        None => Ok(T::default()),
    }
}

pub fn save_value<T: Serialize>(backend: &dyn StorageBackend, key: StoreKey, value: &T) -> Result<()> {
    let json = serde_json::to_value(value)?;
    backend.save(key, &json)?;
    tracing::debug!(store = %key, "persisted store");
    Ok(())
}

/// Volatile backend that keeps documents in memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<StoreKey, Value>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the raw stored value, if any.
    pub fn snapshot(&self, key: StoreKey) -> Option<Value> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(&key).cloned())
    }
}

impl StorageBackend for MemoryStorage {
    fn load(&self, key: StoreKey) -> Result<Option<Value>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| LedgerError::Storage("memory store lock poisoned".into()))?;
        Ok(entries.get(&key).cloned())
    }

    fn save(&self, key: StoreKey, value: &Value) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| LedgerError::Storage("memory store lock poisoned".into()))?;
        entries.insert(key, value.clone());
        Ok(())
    }
}

pub use backup::{BackupArchive, BackupDocument, BackupInfo, BACKUP_FILE_NAME};
pub use json_backend::JsonStorage;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::CategorySet;
    use serde_json::json;

    #[test]
    fn missing_key_falls_back_to_default() {
        let storage = MemoryStorage::new();
        let categories: CategorySet = load_or_default(&storage, StoreKey::Categories).unwrap();
        assert_eq!(categories, CategorySet::default());
    }

    #[test]
    fn saved_values_round_trip() {
        let storage = MemoryStorage::new();
        save_value(&storage, StoreKey::Categories, &vec!["Rent"]).unwrap();
        assert_eq!(storage.snapshot(StoreKey::Categories), Some(json!(["Rent"])));
        let categories: CategorySet = load_or_default(&storage, StoreKey::Categories).unwrap();
        assert_eq!(categories.iter().collect::<Vec<_>>(), ["Rent"]);
    }

    #[test]
    fn undecodable_value_is_a_storage_error() {
        let storage = MemoryStorage::new();
        storage.save(StoreKey::Categories, &json!({"not": "a list"})).unwrap();
        let err = load_or_default::<CategorySet>(&storage, StoreKey::Categories)
            .expect_err("shape mismatch");
        assert!(matches!(err, LedgerError::Storage(message) if message.contains("categories")));
    }
}
