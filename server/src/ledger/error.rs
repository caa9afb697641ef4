//! Ledger operation errors

use thiserror::Error;

use crate::db::repository::RepoError;
use crate::utils::AppError;

/// Failure taxonomy for ledger application and settlement
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Ledger not found: {0}")]
    LedgerNotFound(String),

    #[error("Invalid settlement amount: {0}")]
    InvalidAmount(String),

    #[error("Partial settlement not permitted: {0}")]
    PartialNotPermitted(String),

    #[error("Settlement amount exceeds balance: {0}")]
    AmountExceedsBalance(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] RepoError),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

// THROW codes raised inside the settlement transaction
pub(crate) const THROW_LEDGER_NOT_FOUND: &str = "LEDGER_NOT_FOUND";
pub(crate) const THROW_INVALID_AMOUNT: &str = "INVALID_AMOUNT";
pub(crate) const THROW_PARTIAL_NOT_PERMITTED: &str = "PARTIAL_NOT_PERMITTED";
pub(crate) const THROW_AMOUNT_EXCEEDS_BALANCE: &str = "AMOUNT_EXCEEDS_BALANCE";

/// Classify a settlement-transaction failure by its THROW code
pub(crate) fn map_settlement_error(ledger_id: &str, err: surrealdb::Error) -> LedgerError {
    let text = err.to_string();
    if text.contains(THROW_LEDGER_NOT_FOUND) {
        return LedgerError::LedgerNotFound(ledger_id.to_string());
    }
    if text.contains(THROW_INVALID_AMOUNT) {
        return LedgerError::InvalidAmount("amount must be greater than zero".to_string());
    }
    if text.contains(THROW_PARTIAL_NOT_PERMITTED) {
        return LedgerError::PartialNotPermitted(
            "this ledger must be settled in full".to_string(),
        );
    }
    if text.contains(THROW_AMOUNT_EXCEEDS_BALANCE) {
        return LedgerError::AmountExceedsBalance(
            "amount is larger than the outstanding balance".to_string(),
        );
    }
    LedgerError::Storage(RepoError::Database(text))
}

impl From<LedgerError> for AppError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::LedgerNotFound(msg) => AppError::NotFound(format!("Ledger: {msg}")),
            LedgerError::InvalidAmount(msg)
            | LedgerError::PartialNotPermitted(msg)
            | LedgerError::AmountExceedsBalance(msg) => AppError::BusinessRule(msg),
            LedgerError::Validation(msg) => AppError::Validation(msg),
            LedgerError::Storage(repo) => AppError::from(repo),
        }
    }
}
