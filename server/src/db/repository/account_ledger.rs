//! Account Ledger Repository
//!
//! Read access to ledgers. All ledger mutation (apply-order upserts,
//! settlements) goes through the ledger service's transactions.

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{AccountLedger, AccountType, LedgerStatus};

#[derive(Clone)]
pub struct AccountLedgerRepository {
    base: BaseRepository,
}

impl AccountLedgerRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn record_id(id: &str) -> RepoResult<RecordId> {
        id.parse::<RecordId>()
            .map_err(|_| RepoError::NotFound(format!("Invalid ledger id format: {}", id)))
    }

    /// Find a ledger by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<AccountLedger>> {
        let ledger: Option<AccountLedger> = self.base.db().select(Self::record_id(id)?).await?;
        Ok(ledger)
    }

    /// List ledgers with optional filters, most recently touched first
    pub async fn find_all(
        &self,
        account_type: Option<AccountType>,
        status: Option<LedgerStatus>,
    ) -> RepoResult<Vec<AccountLedger>> {
        let mut conditions: Vec<&str> = Vec::new();
        if account_type.is_some() {
            conditions.push("account_type = $account_type");
        }
        if status.is_some() {
            conditions.push("status = $status");
        }

        let query_str = if conditions.is_empty() {
            "SELECT * FROM account_ledger ORDER BY updated_at DESC".to_string()
        } else {
            format!(
                "SELECT * FROM account_ledger WHERE {} ORDER BY updated_at DESC",
                conditions.join(" AND ")
            )
        };

        let mut query = self.base.db().query(query_str);
        if let Some(t) = account_type {
            query = query.bind(("account_type", t));
        }
        if let Some(s) = status {
            query = query.bind(("status", s));
        }

        let ledgers: Vec<AccountLedger> = query.await?.take(0)?;
        Ok(ledgers)
    }

    /// The single open customer ledger for a phone number, if any
    pub async fn find_open_customer(&self, phone: &str) -> RepoResult<Option<AccountLedger>> {
        let ledgers: Vec<AccountLedger> = self
            .base
            .db()
            .query(
                "SELECT * FROM account_ledger \
                 WHERE account_type = 'customer' AND customer_phone = $phone AND status = 'open' \
                 LIMIT 1",
            )
            .bind(("phone", phone.to_string()))
            .await?
            .take(0)?;
        Ok(ledgers.into_iter().next())
    }

    /// The employee ledger for one (employee, month, year) bucket, if any
    pub async fn find_employee_bucket(
        &self,
        employee_key: &str,
        month: u32,
        year: i32,
    ) -> RepoResult<Option<AccountLedger>> {
        let ledgers: Vec<AccountLedger> = self
            .base
            .db()
            .query(
                "SELECT * FROM account_ledger \
                 WHERE account_type = 'employee' AND employee_key = $key \
                 AND period_month = $month AND period_year = $year \
                 LIMIT 1",
            )
            .bind(("key", employee_key.to_string()))
            .bind(("month", month))
            .bind(("year", year))
            .await?
            .take(0)?;
        Ok(ledgers.into_iter().next())
    }

    /// Every ledger touching a phone number (customer or employee side),
    /// newest first - feeds the profile view
    pub async fn find_by_phone(&self, phone: &str) -> RepoResult<Vec<AccountLedger>> {
        let ledgers: Vec<AccountLedger> = self
            .base
            .db()
            .query(
                "SELECT * FROM account_ledger \
                 WHERE customer_phone = $phone OR employee_phone = $phone OR employee_key = $phone \
                 ORDER BY updated_at DESC",
            )
            .bind(("phone", phone.to_string()))
            .await?
            .take(0)?;
        Ok(ledgers)
    }
}
