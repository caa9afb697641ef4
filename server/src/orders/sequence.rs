//! Order number sequencing
//!
//! One counter record per calendar day, incremented atomically by the
//! storage engine. The count-orders-created-today approach used before
//! could hand two concurrent placements the same sequence; a dedicated
//! counter cannot.

use serde::Deserialize;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use crate::db::repository::{RepoError, RepoResult};
use crate::utils::time;

const COUNTER_TABLE: &str = "order_counter";

/// Per-day sequence record
#[derive(Debug, Deserialize)]
struct OrderCounter {
    value: i64,
}

/// Allocate the next order number for today: `TM{YY}{MM}{DD}{seq:03}`
///
/// The sequence is allocated before the placement transaction commits, so
/// a failed placement burns its number - gaps are possible, duplicates
/// are not.
pub async fn next_order_number(db: &Surreal<Db>) -> RepoResult<String> {
    let counter_id = RecordId::from_table_key(COUNTER_TABLE, time::local_day_key());

    let mut result = db
        .query("UPSERT $id SET value += 1 RETURN AFTER")
        .bind(("id", counter_id))
        .await?;
    let counters: Vec<OrderCounter> = result.take(0)?;
    let seq = counters
        .into_iter()
        .next()
        .map(|c| c.value)
        .ok_or_else(|| RepoError::Database("Failed to allocate order sequence".to_string()))?;

    Ok(format!("TM{}{:03}", time::local_day_prefix(), seq))
}
