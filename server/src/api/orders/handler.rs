//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use http::HeaderMap;
use serde::Deserialize;

use crate::api::caller_context;
use crate::core::ServerState;
use crate::db::models::{Order, OrderStatus, PlaceOrderRequest};
use crate::db::repository::OrderRepository;
use crate::orders::OrderEngine;
use crate::utils::{AppError, AppResult};

/// Query params for listing orders
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// Submit a new order
pub async fn place(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(payload): Json<PlaceOrderRequest>,
) -> AppResult<Json<Order>> {
    let caller = caller_context(&headers);
    let engine = OrderEngine::new(state.db.clone());
    let order = engine.place_order(payload, &caller).await?;
    Ok(Json(order))
}

/// List orders (paginated, newest first)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.db.clone());
    let orders = repo.find_all(query.limit, query.offset).await?;
    Ok(Json(orders))
}

/// Get order by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?;
    Ok(Json(order))
}

/// Get order by order number
pub async fn get_by_number(
    State(state): State<ServerState>,
    Path(number): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_number(&number)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", number)))?;
    Ok(Json(order))
}

/// Status transition request
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// Set an order's status (admin only)
pub async fn update_status(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<Order>> {
    let caller = caller_context(&headers);
    if !caller.is_admin() {
        return Err(AppError::forbidden(
            "only admins may change order status".to_string(),
        ));
    }

    let repo = OrderRepository::new(state.db.clone());
    let order = repo.update_status(&id, payload.status).await?;
    Ok(Json(order))
}
