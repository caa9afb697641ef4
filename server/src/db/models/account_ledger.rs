//! Account Ledger Model
//!
//! A ledger is a running balance for one account-period: a customer phone
//! number (open until fully settled) or an employee calendar month.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Customer,
    Employee,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LedgerStatus {
    Open,
    Settled,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SettlementType {
    Full,
    Partial,
}

/// One recorded payment against a ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settlement {
    pub amount: f64,
    #[serde(rename = "type")]
    pub settlement_type: SettlementType,
    pub note: Option<String>,
    pub payment_method: Option<String>,
    pub recorded_by: Option<String>,
    pub recorded_at: i64,
}

/// Account ledger entity
///
/// The aggregates are independent running counters - `balance` is
/// incremented and decremented alongside the totals, never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountLedger {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub account_type: AccountType,

    // Customer bucket key (account_type = customer)
    pub customer_phone: Option<String>,
    pub customer_name: Option<String>,
    pub customer_id: Option<String>,

    // Employee bucket key (account_type = employee)
    /// Derived key: employee id when known, else phone
    pub employee_key: Option<String>,
    pub employee_id: Option<String>,
    pub employee_phone: Option<String>,
    /// 1-12
    pub period_month: Option<u32>,
    pub period_year: Option<i32>,

    #[serde(default)]
    pub total_orders_amount: f64,
    #[serde(default)]
    pub total_payments_amount: f64,
    #[serde(default)]
    pub balance: f64,
    pub status: LedgerStatus,
    #[serde(default)]
    pub settlements: Vec<Settlement>,

    pub last_order_at: Option<i64>,
    pub last_settlement_at: Option<i64>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl AccountLedger {
    /// Fresh open ledger with zeroed aggregates for a customer bucket
    pub fn new_customer(phone: &str, name: &str, customer_id: Option<String>, now: i64) -> Self {
        Self {
            id: None,
            account_type: AccountType::Customer,
            customer_phone: Some(phone.to_string()),
            customer_name: Some(name.to_string()),
            customer_id,
            employee_key: None,
            employee_id: None,
            employee_phone: None,
            period_month: None,
            period_year: None,
            total_orders_amount: 0.0,
            total_payments_amount: 0.0,
            balance: 0.0,
            status: LedgerStatus::Open,
            settlements: Vec::new(),
            last_order_at: None,
            last_settlement_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Fresh open ledger with zeroed aggregates for an employee month
    pub fn new_employee(
        key: &str,
        employee_id: Option<String>,
        employee_phone: Option<String>,
        display_name: &str,
        month: u32,
        year: i32,
        now: i64,
    ) -> Self {
        Self {
            id: None,
            account_type: AccountType::Employee,
            customer_phone: None,
            customer_name: Some(display_name.to_string()),
            customer_id: None,
            employee_key: Some(key.to_string()),
            employee_id,
            employee_phone,
            period_month: Some(month),
            period_year: Some(year),
            total_orders_amount: 0.0,
            total_payments_amount: 0.0,
            balance: 0.0,
            status: LedgerStatus::Open,
            settlements: Vec::new(),
            last_order_at: None,
            last_settlement_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}
