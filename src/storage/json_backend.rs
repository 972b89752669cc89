use serde_json::Value;
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    core::utils::{app_data_dir, ensure_dir},
    errors::{LedgerError, Result},
};

use super::{StorageBackend, StoreKey};

const STORE_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// Stores each top-level store as a pretty-printed JSON file under one directory.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let root = root.unwrap_or_else(app_data_dir);
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn store_path(&self, key: StoreKey) -> PathBuf {
        self.root
            .join(format!("{}.{}", key.as_str(), STORE_EXTENSION))
    }
}

impl StorageBackend for JsonStorage {
    fn load(&self, key: StoreKey) -> Result<Option<Value>> {
        let path = self.store_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path)?;
        let value = serde_json::from_str(&data).map_err(|err| {
            LedgerError::Storage(format!("`{}` is not valid JSON: {}", path.display(), err))
        })?;
        Ok(Some(value))
    }

    fn save(&self, key: StoreKey, value: &Value) -> Result<()> {
        let path = self.store_path(key);
        let json = serde_json::to_string_pretty(value)?;
        write_atomic(&path, &json)
    }
}

pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Writes `data` to a sibling temp file, then renames it over `path`.
pub(crate) fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}
