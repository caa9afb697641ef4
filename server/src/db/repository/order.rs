//! Order Repository
//!
//! Read access plus the administrative status transition. Order creation
//! goes through the order engine's placement transaction, never here.

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Order, OrderStatus};
use crate::utils::time::now_millis;

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn record_id(id: &str) -> RepoResult<RecordId> {
        id.parse::<RecordId>()
            .map_err(|_| RepoError::NotFound(format!("Invalid order id format: {}", id)))
    }

    /// List orders, newest first
    pub async fn find_all(&self, limit: i64, offset: i64) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order ORDER BY created_at DESC LIMIT $limit START $offset")
            .bind(("limit", limit))
            .bind(("offset", offset))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Find an order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let order: Option<Order> = self.base.db().select(Self::record_id(id)?).await?;
        Ok(order)
    }

    /// Find an order by its order number
    pub async fn find_by_number(&self, order_number: &str) -> RepoResult<Option<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE order_number = $number LIMIT 1")
            .bind(("number", order_number.to_string()))
            .await?
            .take(0)?;
        Ok(orders.into_iter().next())
    }

    /// All orders for one customer phone, newest first
    pub async fn find_by_phone(&self, phone: &str) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE customer_phone = $phone ORDER BY created_at DESC")
            .bind(("phone", phone.to_string()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Set an order's status (admin operation)
    ///
    /// Any enumerated status is accepted from any other - the state
    /// machine is intentionally permissive. A transition to `ready`
    /// stamps `actual_ready_time`.
    pub async fn update_status(&self, id: &str, status: OrderStatus) -> RepoResult<Order> {
        let thing = Self::record_id(id)?;
        let now = now_millis();

        let query_str = if status == OrderStatus::Ready {
            "UPDATE $thing SET status = $status, actual_ready_time = $now, updated_at = $now RETURN AFTER"
        } else {
            "UPDATE $thing SET status = $status, updated_at = $now RETURN AFTER"
        };

        let mut result = self
            .base
            .db()
            .query(query_str)
            .bind(("thing", thing))
            .bind(("status", status))
            .bind(("now", now))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }
}
