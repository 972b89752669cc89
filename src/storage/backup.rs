use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    core::utils::ensure_dir,
    errors::{LedgerError, Result},
    ledger::{BudgetBook, CategorySet, DebtBook, Ledger, SplitBook},
};

use super::json_backend::write_atomic;

/// Default file name for exported backups.
pub const BACKUP_FILE_NAME: &str = "expense_tracker_backup.json";

const ARCHIVE_PREFIX: &str = "expense_tracker_";
const ARCHIVE_EXTENSION: &str = "json";
const ARCHIVE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const DEFAULT_RETENTION: usize = 5;

/// Complete application state as written to a backup file.
///
/// Missing or `null` keys restore as empty stores; categories fall back to the
/// default set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackupDocument {
    #[serde(default, deserialize_with = "null_as_default")]
    pub transactions: Ledger,
    #[serde(default, deserialize_with = "null_as_default")]
    pub debts: DebtBook,
    #[serde(default, deserialize_with = "null_as_default")]
    pub splits: SplitBook,
    #[serde(default, deserialize_with = "null_as_default")]
    pub budgets: BudgetBook,
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: CategorySet,
}

fn restore_error(err: serde_json::Error) -> LedgerError {
    LedgerError::RestoreParse(err.to_string())
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl BackupDocument {
    /// Parses a backup, mapping any JSON or shape error to `RestoreParse`.
    pub fn parse(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw).map_err(restore_error)?;
        if !value.is_object() {
            return Err(LedgerError::RestoreParse(
                "a backup must be a JSON object".into(),
            ));
        }
        serde_json::from_value(value).map_err(restore_error)
    }

    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reads a backup file; content that is not UTF-8 text is `RestoreParse`.
    pub fn read_from(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let data = String::from_utf8(bytes).map_err(|err| {
            LedgerError::RestoreParse(format!("backup is not UTF-8 text: {}", err))
        })?;
        Self::parse(&data)
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        write_atomic(path, &self.to_pretty_json()?)
    }
}

/// A managed backup file.
#[derive(Debug, Clone, PartialEq)]
pub struct BackupInfo {
    pub path: PathBuf,
    pub file_name: String,
    pub created_at: DateTime<Utc>,
    pub note: Option<String>,
}

/// Timestamped backups kept in one directory, pruned to a retention count.
#[derive(Debug, Clone)]
pub struct BackupArchive {
    dir: PathBuf,
    retention: usize,
}

impl BackupArchive {
    pub fn new(dir: PathBuf, retention: Option<usize>) -> Result<Self> {
        ensure_dir(&dir)?;
        Ok(Self {
            dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    pub fn create(&self, document: &BackupDocument, note: Option<&str>) -> Result<PathBuf> {
        self.create_at(document, note, Utc::now())
    }

    pub fn create_at(
        &self,
        document: &BackupDocument,
        note: Option<&str>,
        created_at: DateTime<Utc>,
    ) -> Result<PathBuf> {
        let mut stem = format!(
            "{}{}",
            ARCHIVE_PREFIX,
            created_at.format(ARCHIVE_TIMESTAMP_FORMAT)
        );
        if let Some(label) = sanitize_backup_note(note) {
            stem.push('_');
            stem.push_str(&label);
        }
        let path = self.dir.join(format!("{}.{}", stem, ARCHIVE_EXTENSION));
        document.write_to(&path)?;
        tracing::info!(path = %path.display(), "backup written");
        self.prune()?;
        Ok(path)
    }

    /// Lists managed backups, newest first.
    pub fn list(&self) -> Result<Vec<BackupInfo>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            let Some((created_at, note)) = parse_backup_name(file_name) else {
                continue;
            };
            entries.push(BackupInfo {
                file_name: file_name.to_string(),
                path: path.clone(),
                created_at,
                note,
            });
        }
        entries.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.file_name.cmp(&a.file_name))
        });
        Ok(entries)
    }

    /// Resolves a backup by file name within the archive or by explicit path.
    pub fn resolve(&self, name_or_path: &str) -> PathBuf {
        let candidate = self.dir.join(name_or_path);
        if candidate.exists() {
            candidate
        } else {
            PathBuf::from(name_or_path)
        }
    }

    fn prune(&self) -> Result<()> {
        let backups = self.list()?;
        for stale in backups.iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(&stale.path) {
                tracing::warn!(path = %stale.path.display(), %err, "failed to prune backup");
            }
        }
        Ok(())
    }
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.' | '_'))
            && !sanitized.is_empty()
            && !last_dash
        {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn parse_backup_name(name: &str) -> Option<(DateTime<Utc>, Option<String>)> {
    let stem = name
        .strip_prefix(ARCHIVE_PREFIX)?
        .strip_suffix(&format!(".{}", ARCHIVE_EXTENSION))?;
    let mut parts = stem.splitn(3, '_');
    let date_part = parts.next()?;
    let time_part = parts.next()?;
    let note = parts.next().map(str::to_string);
    if !is_digits(date_part, 8) || !is_digits(time_part, 6) {
        return None;
    }
    let raw = format!("{}{}", date_part, time_part);
    let naive = NaiveDateTime::parse_from_str(&raw, "%Y%m%d%H%M%S").ok()?;
    Some((DateTime::from_naive_utc_and_offset(naive, Utc), note))
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}
