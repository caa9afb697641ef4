//! Order placement errors

use thiserror::Error;

use crate::db::repository::RepoError;
use crate::utils::AppError;

/// Failure taxonomy surfaced to order-placement callers
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Item not available: {0}")]
    ItemUnavailable(String),

    #[error("Item not offered at the requested meal time: {0}")]
    MealTimeMismatch(String),

    #[error("Item not available for pre-order: {0}")]
    NotAvailableForPreOrder(String),

    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),

    #[error("Invalid scheduling: {0}")]
    InvalidScheduling(String),

    #[error("Storage error: {0}")]
    Storage(#[from] RepoError),
}

pub type OrderResult<T> = Result<T, OrderError>;

// THROW codes raised inside the placement transaction. The engine error
// text carries them back out; map_transaction_error recovers the typed
// variant.
pub(crate) const THROW_ITEM_NOT_FOUND: &str = "ITEM_NOT_FOUND";
pub(crate) const THROW_INSUFFICIENT_STOCK: &str = "INSUFFICIENT_STOCK";

/// Classify a placement-transaction failure by its THROW code
pub(crate) fn map_transaction_error(err: surrealdb::Error) -> OrderError {
    let text = err.to_string();
    if let Some(pos) = text.find(THROW_INSUFFICIENT_STOCK) {
        let detail = text[pos + THROW_INSUFFICIENT_STOCK.len()..]
            .trim_start_matches(':')
            .trim_end_matches('"')
            .trim();
        return OrderError::InsufficientStock(detail.to_string());
    }
    if text.contains(THROW_ITEM_NOT_FOUND) {
        return OrderError::ItemNotFound("item removed during placement".to_string());
    }
    OrderError::Storage(RepoError::Database(text))
}

impl From<OrderError> for AppError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::Validation(msg) => AppError::Validation(msg),
            OrderError::ItemNotFound(msg) => AppError::NotFound(format!("Menu item: {msg}")),
            OrderError::ItemUnavailable(msg)
            | OrderError::MealTimeMismatch(msg)
            | OrderError::NotAvailableForPreOrder(msg)
            | OrderError::InsufficientStock(msg)
            | OrderError::InvalidScheduling(msg) => AppError::BusinessRule(msg),
            OrderError::Storage(repo) => AppError::from(repo),
        }
    }
}
