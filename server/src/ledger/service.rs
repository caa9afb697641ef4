//! Ledger Service
//!
//! Two independent operations, each in its own storage transaction:
//!
//! - [`LedgerService::apply_order`] - fold a committed order into its
//!   account bucket (create-if-missing, then increment the running
//!   counters);
//! - [`LedgerService::record_settlement`] - record a payment against a
//!   ledger under the balance invariants.
//!
//! Bucketing: in-house orders land in an employee ledger scoped to one
//! calendar month; everything else lands in the customer's single open
//! ledger, creating a fresh one if the previous was settled.

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use crate::db::models::{AccountLedger, Order, PricingTier};
use crate::db::repository::{AccountLedgerRepository, RepoError};
use crate::utils::time::{now_millis, period_of};

use super::error::{
    LedgerError, LedgerResult, THROW_AMOUNT_EXCEEDS_BALANCE, THROW_INVALID_AMOUNT,
    THROW_LEDGER_NOT_FOUND, THROW_PARTIAL_NOT_PERMITTED, map_settlement_error,
};

/// Settlement request as resolved by the call site
///
/// `allow_partial` policy: customer settlements pass the caller's flag
/// (default false - the balance must be zeroed in one call); employee
/// settlements always allow partial but require an explicit amount.
#[derive(Debug, Clone)]
pub struct SettlementRequest {
    pub ledger_id: String,
    /// Defaults to the full current balance when omitted
    pub amount: Option<f64>,
    pub note: Option<String>,
    pub payment_method: Option<String>,
    pub recorded_by: Option<String>,
    pub allow_partial: bool,
}

/// Ledger application and settlement over an injected storage handle
#[derive(Clone)]
pub struct LedgerService {
    db: Surreal<Db>,
    repo: AccountLedgerRepository,
}

impl LedgerService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            repo: AccountLedgerRepository::new(db.clone()),
            db,
        }
    }

    /// Fold a committed order into its ledger bucket.
    ///
    /// The bucket lookup, create-if-missing and counter increments run in
    /// one transaction, so concurrent appliers can never produce two rows
    /// for the same bucket.
    pub async fn apply_order(&self, order: &Order) -> LedgerResult<AccountLedger> {
        match order.pricing_tier {
            PricingTier::Inhouse => self.apply_to_employee_ledger(order).await,
            PricingTier::Standard => self.apply_to_customer_ledger(order).await,
        }
    }

    async fn apply_to_customer_ledger(&self, order: &Order) -> LedgerResult<AccountLedger> {
        let now = now_millis();
        let fresh = AccountLedger::new_customer(
            &order.customer_phone,
            &order.customer_name,
            order.customer_id.clone(),
            now,
        );

        self.db
            .query(
                "BEGIN TRANSACTION;
                 LET $existing = (SELECT * FROM account_ledger \
                     WHERE account_type = 'customer' AND customer_phone = $phone AND status = 'open' \
                     LIMIT 1);
                 IF array::len($existing) == 0 { CREATE account_ledger CONTENT $fresh };
                 UPDATE account_ledger SET \
                     total_orders_amount += $amount, \
                     balance += $amount, \
                     customer_name = $name, \
                     customer_id = $customer_id, \
                     last_order_at = $order_at, \
                     updated_at = $now \
                 WHERE account_type = 'customer' AND customer_phone = $phone AND status = 'open';
                 COMMIT TRANSACTION;",
            )
            .bind(("phone", order.customer_phone.clone()))
            .bind(("fresh", fresh))
            .bind(("amount", order.total))
            .bind(("name", order.customer_name.clone()))
            .bind(("customer_id", order.customer_id.clone()))
            .bind(("order_at", order.created_at))
            .bind(("now", now))
            .await
            .map_err(RepoError::from)?
            .check()
            .map_err(RepoError::from)?;

        self.repo
            .find_open_customer(&order.customer_phone)
            .await?
            .ok_or_else(|| {
                LedgerError::Storage(RepoError::Database(
                    "customer ledger missing after apply".into(),
                ))
            })
    }

    async fn apply_to_employee_ledger(&self, order: &Order) -> LedgerResult<AccountLedger> {
        let now = now_millis();
        let (month, year) = period_of(order.created_at);
        // Employee identity: user id when the order carries one, else phone
        let key = order
            .customer_id
            .clone()
            .unwrap_or_else(|| order.customer_phone.clone());
        if key.trim().is_empty() {
            return Err(LedgerError::Validation(
                "employee ledger requires an employee id or phone".into(),
            ));
        }
        let fresh = AccountLedger::new_employee(
            &key,
            order.customer_id.clone(),
            Some(order.customer_phone.clone()),
            &order.customer_name,
            month,
            year,
            now,
        );

        self.db
            .query(
                "BEGIN TRANSACTION;
                 LET $existing = (SELECT * FROM account_ledger \
                     WHERE account_type = 'employee' AND employee_key = $key \
                     AND period_month = $month AND period_year = $year \
                     LIMIT 1);
                 IF array::len($existing) == 0 { CREATE account_ledger CONTENT $fresh };
                 UPDATE account_ledger SET \
                     total_orders_amount += $amount, \
                     balance += $amount, \
                     customer_name = $name, \
                     last_order_at = $order_at, \
                     updated_at = $now \
                 WHERE account_type = 'employee' AND employee_key = $key \
                 AND period_month = $month AND period_year = $year;
                 COMMIT TRANSACTION;",
            )
            .bind(("key", key.clone()))
            .bind(("month", month))
            .bind(("year", year))
            .bind(("fresh", fresh))
            .bind(("amount", order.total))
            .bind(("name", order.customer_name.clone()))
            .bind(("order_at", order.created_at))
            .bind(("now", now))
            .await
            .map_err(RepoError::from)?
            .check()
            .map_err(RepoError::from)?;

        self.repo
            .find_employee_bucket(&key, month, year)
            .await?
            .ok_or_else(|| {
                LedgerError::Storage(RepoError::Database(
                    "employee ledger missing after apply".into(),
                ))
            })
    }

    /// Record a settlement against a ledger.
    ///
    /// The read, invariant checks, counter arithmetic and settlement
    /// append run in one transaction; a rejected settlement leaves the
    /// ledger byte-for-byte unchanged.
    pub async fn record_settlement(&self, req: SettlementRequest) -> LedgerResult<AccountLedger> {
        let ledger_id: RecordId = req
            .ledger_id
            .parse()
            .map_err(|_| LedgerError::LedgerNotFound(req.ledger_id.clone()))?;

        if let Some(amount) = req.amount
            && (!amount.is_finite() || amount <= 0.0)
        {
            return Err(LedgerError::InvalidAmount(format!(
                "amount must be greater than zero, got {amount}"
            )));
        }

        let statements = format!(
            "BEGIN TRANSACTION;
             LET $ledger = (SELECT * FROM $id)[0];
             IF $ledger == NONE {{ THROW \"{THROW_LEDGER_NOT_FOUND}\" }};
             LET $amount = $req_amount ?? $ledger.balance;
             IF $amount <= 0 {{ THROW \"{THROW_INVALID_AMOUNT}\" }};
             IF $allow_partial == false AND $amount < $ledger.balance {{ THROW \"{THROW_PARTIAL_NOT_PERMITTED}\" }};
             IF $amount > $ledger.balance {{ THROW \"{THROW_AMOUNT_EXCEEDS_BALANCE}\" }};
             LET $stype = IF $amount == $ledger.balance {{ 'full' }} ELSE {{ 'partial' }};
             UPDATE $id SET \
                 total_payments_amount += $amount, \
                 balance -= $amount, \
                 last_settlement_at = $now, \
                 updated_at = $now, \
                 settlements += {{ \
                     amount: $amount, \
                     type: $stype, \
                     note: $note, \
                     payment_method: $payment_method, \
                     recorded_by: $recorded_by, \
                     recorded_at: $now \
                 }}, \
                 status = IF $stype == 'full' {{ 'settled' }} ELSE {{ $ledger.status }};
             COMMIT TRANSACTION;"
        );

        let id_text = req.ledger_id.clone();
        self.db
            .query(statements)
            .bind(("id", ledger_id))
            .bind(("req_amount", req.amount))
            .bind(("allow_partial", req.allow_partial))
            .bind(("note", req.note))
            .bind(("payment_method", req.payment_method))
            .bind(("recorded_by", req.recorded_by))
            .bind(("now", now_millis()))
            .await
            .map_err(|e| map_settlement_error(&id_text, e))?
            .check()
            .map_err(|e| map_settlement_error(&id_text, e))?;

        self.repo.find_by_id(&id_text).await?.ok_or_else(|| {
            LedgerError::Storage(RepoError::Database("ledger missing after settlement".into()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::models::{
        CreatedBy, LedgerStatus, MealTime, OrderStatus, OrderType, SettlementType,
    };
    use crate::db::repository::AccountLedgerRepository;

    async fn test_db() -> (tempfile::TempDir, Surreal<Db>) {
        let tmp = tempfile::tempdir().unwrap();
        let service = DbService::new(tmp.path().join("db")).await.unwrap();
        (tmp, service.db)
    }

    fn order(
        phone: &str,
        total: f64,
        tier: PricingTier,
        customer_id: Option<&str>,
        created_at: i64,
    ) -> Order {
        Order {
            id: None,
            order_number: "TM260808001".to_string(),
            customer_name: "Marta Ruiz".to_string(),
            customer_phone: phone.to_string(),
            customer_id: customer_id.map(str::to_string),
            created_by: CreatedBy::Customer,
            pricing_tier: tier,
            items: Vec::new(),
            total,
            meal_time: MealTime::Lunch,
            status: OrderStatus::Pending,
            order_type: OrderType::Now,
            scheduled_for: None,
            special_instructions: None,
            actual_ready_time: None,
            created_at,
            updated_at: created_at,
        }
    }

    fn settle(ledger_id: &str, amount: Option<f64>, allow_partial: bool) -> SettlementRequest {
        SettlementRequest {
            ledger_id: ledger_id.to_string(),
            amount,
            note: None,
            payment_method: Some("cash".to_string()),
            recorded_by: Some("admin-1".to_string()),
            allow_partial,
        }
    }

    #[tokio::test]
    async fn test_apply_creates_and_accumulates_customer_ledger() {
        let (_tmp, db) = test_db().await;
        let service = LedgerService::new(db.clone());
        let now = now_millis();

        let first = service
            .apply_order(&order("600111222", 250.0, PricingTier::Standard, None, now))
            .await
            .unwrap();
        assert_eq!(first.status, LedgerStatus::Open);
        assert_eq!(first.total_orders_amount, 250.0);
        assert_eq!(first.balance, 250.0);

        let second = service
            .apply_order(&order("600111222", 100.0, PricingTier::Standard, None, now))
            .await
            .unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.total_orders_amount, 350.0);
        assert_eq!(second.balance, 350.0);
        assert_eq!(
            second.balance,
            second.total_orders_amount - second.total_payments_amount
        );

        // Still exactly one ledger for this phone
        let repo = AccountLedgerRepository::new(db);
        assert_eq!(repo.find_by_phone("600111222").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_employee_month_bucket_accumulates_one_row() {
        let (_tmp, db) = test_db().await;
        let service = LedgerService::new(db.clone());
        let now = now_millis();

        let first = service
            .apply_order(&order(
                "611000111",
                40.0,
                PricingTier::Inhouse,
                Some("emp-7"),
                now,
            ))
            .await
            .unwrap();
        let second = service
            .apply_order(&order(
                "611000111",
                35.0,
                PricingTier::Inhouse,
                Some("emp-7"),
                now,
            ))
            .await
            .unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.total_orders_amount, 75.0);
        assert_eq!(second.employee_key.as_deref(), Some("emp-7"));
        assert!(second.period_month.is_some());
        assert!(second.period_year.is_some());

        let repo = AccountLedgerRepository::new(db);
        let (month, year) = period_of(now);
        let bucket = repo
            .find_employee_bucket("emp-7", month, year)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(bucket.balance, 75.0);
    }

    #[tokio::test]
    async fn test_partial_settlement_rules() {
        let (_tmp, db) = test_db().await;
        let service = LedgerService::new(db.clone());
        let now = now_millis();

        let ledger = service
            .apply_order(&order("622333444", 250.0, PricingTier::Standard, None, now))
            .await
            .unwrap();
        let id = ledger.id.unwrap().to_string();

        // Partial without permission: rejected, ledger unchanged
        let err = service
            .record_settlement(settle(&id, Some(100.0), false))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::PartialNotPermitted(_)));
        let unchanged = AccountLedgerRepository::new(db.clone())
            .find_by_id(&id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(unchanged.balance, 250.0);
        assert!(unchanged.settlements.is_empty());

        // Same call with permission: applied, stays open
        let after = service
            .record_settlement(settle(&id, Some(100.0), true))
            .await
            .unwrap();
        assert_eq!(after.balance, 150.0);
        assert_eq!(after.total_payments_amount, 100.0);
        assert_eq!(after.status, LedgerStatus::Open);
        assert_eq!(after.settlements.len(), 1);
        assert_eq!(after.settlements[0].settlement_type, SettlementType::Partial);
        assert_eq!(
            after.balance,
            after.total_orders_amount - after.total_payments_amount
        );
    }

    #[tokio::test]
    async fn test_full_settlement_defaults_to_balance_and_settles() {
        let (_tmp, db) = test_db().await;
        let service = LedgerService::new(db);
        let now = now_millis();

        let ledger = service
            .apply_order(&order("633444555", 180.0, PricingTier::Standard, None, now))
            .await
            .unwrap();
        let id = ledger.id.unwrap().to_string();

        let settled = service
            .record_settlement(settle(&id, None, false))
            .await
            .unwrap();
        assert_eq!(settled.balance, 0.0);
        assert_eq!(settled.total_payments_amount, 180.0);
        assert_eq!(settled.status, LedgerStatus::Settled);
        assert_eq!(settled.settlements.len(), 1);
        assert_eq!(settled.settlements[0].settlement_type, SettlementType::Full);
        assert_eq!(settled.settlements[0].amount, 180.0);
    }

    #[tokio::test]
    async fn test_settled_ledger_gives_way_to_fresh_open_one() {
        let (_tmp, db) = test_db().await;
        let service = LedgerService::new(db.clone());
        let now = now_millis();

        let first = service
            .apply_order(&order("644555666", 90.0, PricingTier::Standard, None, now))
            .await
            .unwrap();
        let first_id = first.id.clone().unwrap().to_string();
        service
            .record_settlement(settle(&first_id, None, false))
            .await
            .unwrap();

        // Next order opens a brand-new ledger; the settled one stays inert
        let second = service
            .apply_order(&order("644555666", 60.0, PricingTier::Standard, None, now))
            .await
            .unwrap();
        assert_ne!(second.id, first.id);
        assert_eq!(second.balance, 60.0);
        assert_eq!(second.status, LedgerStatus::Open);

        let repo = AccountLedgerRepository::new(db);
        let all = repo.find_by_phone("644555666").await.unwrap();
        assert_eq!(all.len(), 2);
        let open_count = all
            .iter()
            .filter(|l| l.status == LedgerStatus::Open)
            .count();
        assert_eq!(open_count, 1);
        let settled = all
            .iter()
            .find(|l| l.status == LedgerStatus::Settled)
            .unwrap();
        assert_eq!(settled.balance, 0.0);
    }

    #[tokio::test]
    async fn test_settlement_never_overdraws() {
        let (_tmp, db) = test_db().await;
        let service = LedgerService::new(db.clone());
        let now = now_millis();

        let ledger = service
            .apply_order(&order("655666777", 50.0, PricingTier::Standard, None, now))
            .await
            .unwrap();
        let id = ledger.id.unwrap().to_string();

        let err = service
            .record_settlement(settle(&id, Some(80.0), true))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::AmountExceedsBalance(_)));

        let unchanged = AccountLedgerRepository::new(db)
            .find_by_id(&id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(unchanged.balance, 50.0);
        assert_eq!(unchanged.total_payments_amount, 0.0);
    }

    #[tokio::test]
    async fn test_settlement_rejects_bad_amounts_and_missing_ledger() {
        let (_tmp, db) = test_db().await;
        let service = LedgerService::new(db);
        let now = now_millis();

        let ledger = service
            .apply_order(&order("666777888", 50.0, PricingTier::Standard, None, now))
            .await
            .unwrap();
        let id = ledger.id.unwrap().to_string();

        let err = service
            .record_settlement(settle(&id, Some(0.0), true))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(_)));

        let err = service
            .record_settlement(settle(&id, Some(-5.0), true))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(_)));

        let err = service
            .record_settlement(settle("account_ledger:missing", Some(10.0), true))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::LedgerNotFound(_)));
    }
}
