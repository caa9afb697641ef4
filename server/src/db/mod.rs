//! Database Module
//!
//! Owns the embedded SurrealDB instance and the schema/index definitions.

pub mod models;
pub mod repository;

use std::path::Path;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use crate::core::ServerError;

const NAMESPACE: &str = "tablemate";
const DATABASE: &str = "main";

/// Database service - owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the embedded database at `path` and apply schema
    pub async fn new(path: impl AsRef<Path>) -> Result<Self, ServerError> {
        let db: Surreal<Db> = Surreal::new::<RocksDb>(path.as_ref())
            .await
            .map_err(|e| ServerError::Database(format!("Failed to open database: {e}")))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| ServerError::Database(format!("Failed to select namespace: {e}")))?;

        define_schema(&db)
            .await
            .map_err(|e| ServerError::Database(format!("Failed to define schema: {e}")))?;

        tracing::info!("Database ready (embedded SurrealDB, ns={NAMESPACE} db={DATABASE})");

        Ok(Self { db })
    }
}

/// Table and index definitions, idempotent across restarts.
///
/// The engine has no partial unique indexes, so the single-open-ledger
/// guarantee is enforced by the ledger service's transactions rather than
/// an index; the indexes below are for lookups plus the one real
/// uniqueness constraint we can express (`order_number`).
async fn define_schema(db: &Surreal<Db>) -> surrealdb::Result<()> {
    db.query(
        r#"
        DEFINE TABLE IF NOT EXISTS menu_item SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS menu_item_name ON menu_item FIELDS name;

        DEFINE TABLE IF NOT EXISTS order SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS order_number_unique ON order FIELDS order_number UNIQUE;
        DEFINE INDEX IF NOT EXISTS order_customer_phone ON order FIELDS customer_phone;
        DEFINE INDEX IF NOT EXISTS order_created_at ON order FIELDS created_at;

        DEFINE TABLE IF NOT EXISTS account_ledger SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS ledger_customer_bucket ON account_ledger FIELDS account_type, customer_phone, status;
        DEFINE INDEX IF NOT EXISTS ledger_employee_bucket ON account_ledger FIELDS account_type, employee_key, period_year, period_month;

        DEFINE TABLE IF NOT EXISTS order_counter SCHEMALESS;
        "#,
    )
    .await?
    .check()?;
    Ok(())
}
