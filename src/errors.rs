use thiserror::Error;

/// Error type that captures ledger, budget and persistence failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Index {index} is out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid month key `{0}` (expected YEAR-MONTH)")]
    InvalidMonthKey(String),
    #[error("Failed to restore data: {0}")]
    RestoreParse(String),
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

impl LedgerError {
    pub(crate) fn out_of_range(index: usize, len: usize) -> Self {
        LedgerError::IndexOutOfRange { index, len }
    }
}

/// Parses a user-entered amount, rejecting anything that is not a finite number.
pub fn parse_amount(raw: &str) -> Result<f64> {
    let trimmed = raw.trim().trim_start_matches('$');
    let value: f64 = trimmed
        .parse()
        .map_err(|_| LedgerError::InvalidAmount(format!("`{}` is not a number", raw.trim())))?;
    ensure_finite(value)
}

pub(crate) fn ensure_finite(value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(LedgerError::InvalidAmount(format!(
            "`{}` is not a finite number",
            value
        )))
    }
}

pub(crate) fn ensure_non_negative(value: f64) -> Result<f64> {
    let value = ensure_finite(value)?;
    if value < 0.0 {
        return Err(LedgerError::InvalidAmount(format!(
            "{} must not be negative",
            value
        )));
    }
    Ok(value)
}

pub(crate) fn require_text(value: &str, what: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(LedgerError::InvalidInput(format!("{} must not be empty", what)))
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_amount_accepts_plain_and_dollar_prefixed_numbers() {
        assert_eq!(parse_amount("12.5").unwrap(), 12.5);
        assert_eq!(parse_amount(" $7 ").unwrap(), 7.0);
    }

    #[test]
    fn parse_amount_rejects_garbage_and_non_finite_values() {
        for raw in ["abc", "", "NaN", "inf", "-inf"] {
            let err = parse_amount(raw).expect_err("should reject");
            assert!(
                matches!(err, LedgerError::InvalidAmount(_)),
                "unexpected error for `{raw}`: {err:?}"
            );
        }
    }

    #[test]
    fn non_negative_rejects_negative_values() {
        assert!(ensure_non_negative(0.0).is_ok());
        assert!(matches!(
            ensure_non_negative(-1.0),
            Err(LedgerError::InvalidAmount(_))
        ));
    }
}
