//! Account Ledger API Handlers
//!
//! All ledger endpoints are admin-only; they back the admin panel's
//! balance and settlement views.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use http::HeaderMap;
use serde::{Deserialize, Serialize};

use crate::api::caller_context;
use crate::core::ServerState;
use crate::db::models::{AccountLedger, AccountType, LedgerStatus, Order};
use crate::db::repository::{AccountLedgerRepository, OrderRepository};
use crate::ledger::{LedgerService, SettlementRequest};
use crate::orders::CallerContext;
use crate::utils::validation::{MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult};

fn require_admin(headers: &HeaderMap) -> AppResult<CallerContext> {
    let caller = caller_context(headers);
    if !caller.is_admin() {
        return Err(AppError::forbidden(
            "only admins may access ledgers".to_string(),
        ));
    }
    Ok(caller)
}

/// Query params for listing ledgers
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub account_type: Option<AccountType>,
    pub status: Option<LedgerStatus>,
}

/// List ledgers with optional filters
pub async fn list(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<AccountLedger>>> {
    require_admin(&headers)?;
    let repo = AccountLedgerRepository::new(state.db.clone());
    let ledgers = repo.find_all(query.account_type, query.status).await?;
    Ok(Json(ledgers))
}

/// Get ledger by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> AppResult<Json<AccountLedger>> {
    require_admin(&headers)?;
    let repo = AccountLedgerRepository::new(state.db.clone());
    let ledger = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Ledger {} not found", id)))?;
    Ok(Json(ledger))
}

/// Settlement payload (camelCase wire format)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlePayload {
    pub amount: Option<f64>,
    pub note: Option<String>,
    pub payment_method: Option<String>,
    pub allow_partial: Option<bool>,
}

/// Record a settlement against a ledger (admin only)
///
/// Call-site policy: customer ledgers settle in full unless the caller
/// explicitly allows partial; employee ledgers always allow partial but
/// require an explicit amount.
pub async fn settle(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<SettlePayload>,
) -> AppResult<Json<AccountLedger>> {
    let caller = require_admin(&headers)?;

    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.payment_method, "paymentMethod", MAX_SHORT_TEXT_LEN)?;

    let repo = AccountLedgerRepository::new(state.db.clone());
    let ledger = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Ledger {} not found", id)))?;

    let (amount, allow_partial) = match ledger.account_type {
        AccountType::Employee => {
            let amount = payload.amount.ok_or_else(|| {
                AppError::validation("employee settlements require an explicit amount".to_string())
            })?;
            (Some(amount), true)
        }
        AccountType::Customer => (payload.amount, payload.allow_partial.unwrap_or(false)),
    };

    let service = LedgerService::new(state.db.clone());
    let updated = service
        .record_settlement(SettlementRequest {
            ledger_id: id,
            amount,
            note: payload.note,
            payment_method: payload.payment_method,
            recorded_by: caller.user_id,
            allow_partial,
        })
        .await?;
    Ok(Json(updated))
}

/// Profile view: all orders and ledgers attached to one phone number
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub orders: Vec<Order>,
    pub ledgers: Vec<AccountLedger>,
}

/// Aggregated account profile (admin only)
pub async fn profile(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Path(phone): Path<String>,
) -> AppResult<Json<ProfileResponse>> {
    require_admin(&headers)?;
    let orders = OrderRepository::new(state.db.clone())
        .find_by_phone(&phone)
        .await?;
    let ledgers = AccountLedgerRepository::new(state.db.clone())
        .find_by_phone(&phone)
        .await?;
    Ok(Json(ProfileResponse { orders, ledgers }))
}
