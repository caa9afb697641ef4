//! Order Engine
//!
//! Accepts a proposed order, resolves its pricing tier, and commits the
//! stock decrements plus the order record in one storage transaction -
//! or rejects with a typed reason and persists nothing.
//!
//! Ledger application happens after the commit as its own atomic unit;
//! see [`crate::ledger::LedgerService`].

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use uuid::Uuid;

use crate::db::models::{
    CreatedBy, MealTime, MenuItem, Order, OrderItem, OrderStatus, OrderType, PlaceOrderRequest,
    PricingTier,
};
use crate::db::repository::{MenuItemRepository, RepoError};
use crate::ledger::LedgerService;
use crate::utils::time::now_millis;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_order_optional_text,
    validate_order_required_text,
};

use super::error::{
    OrderError, OrderResult, THROW_INSUFFICIENT_STOCK, THROW_ITEM_NOT_FOUND,
    map_transaction_error,
};
use super::{CallerContext, money, sequence};

const ORDER_TABLE: &str = "order";

/// Pre-orders may be scheduled at most 72 hours ahead
const PRE_ORDER_WINDOW_MS: i64 = 72 * 60 * 60 * 1000;

/// Order placement service
///
/// Holds the storage handle explicitly - no ambient globals - so tests
/// can run it against a throwaway database.
pub struct OrderEngine {
    db: Surreal<Db>,
    menu_repo: MenuItemRepository,
    ledger: LedgerService,
}

/// Resolved scheduling facts for one request
struct Schedule {
    order_type: OrderType,
    meal_time: MealTime,
    scheduled_for: Option<i64>,
}

impl OrderEngine {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            menu_repo: MenuItemRepository::new(db.clone()),
            ledger: LedgerService::new(db.clone()),
            db,
        }
    }

    /// Validate, price and atomically commit an order.
    ///
    /// On success the committed order is handed to the ledger service;
    /// a ledger failure at that point does not roll the order back (the
    /// two are separate atomic units) - it is logged for reconciliation.
    pub async fn place_order(
        &self,
        req: PlaceOrderRequest,
        caller: &CallerContext,
    ) -> OrderResult<Order> {
        let now = now_millis();

        validate_order_required_text(&req.customer_name, "customerName", MAX_NAME_LEN)?;
        validate_order_required_text(&req.customer_phone, "customerPhone", MAX_SHORT_TEXT_LEN)?;
        validate_order_optional_text(&req.special_instructions, "specialInstructions", MAX_NOTE_LEN)?;
        if req.items.is_empty() {
            return Err(OrderError::Validation(
                "order must contain at least one item".into(),
            ));
        }
        for line in &req.items {
            if line.qty < 1 {
                return Err(OrderError::Validation(format!(
                    "qty must be at least 1, got {}",
                    line.qty
                )));
            }
            if line.qty > money::MAX_QUANTITY {
                return Err(OrderError::Validation(format!(
                    "qty exceeds maximum allowed ({}), got {}",
                    money::MAX_QUANTITY,
                    line.qty
                )));
            }
        }

        let schedule = resolve_schedule(&req, now)?;
        let created_by = resolve_created_by(req.created_by, caller);
        let pricing_tier = resolve_pricing_tier(req.pricing_tier, created_by, caller);

        // Load and check every line in submission order, pricing as we go.
        // These reads are advisory - stock is re-checked inside the commit
        // transaction, which is what actually guards against races.
        let mut items: Vec<OrderItem> = Vec::with_capacity(req.items.len());
        let mut line_totals: Vec<f64> = Vec::with_capacity(req.items.len());
        for line in &req.items {
            let item = self
                .menu_repo
                .find_by_id(&line.menu_item_id)
                .await?
                .ok_or_else(|| OrderError::ItemNotFound(line.menu_item_id.clone()))?;

            check_line(&item, schedule.meal_time, created_by, line.qty)?;

            let unit_price = effective_unit_price(&item, pricing_tier);
            money::validate_unit_price(unit_price)?;
            let total = money::line_total(unit_price, line.qty);
            line_totals.push(total);

            let item_id = item.id.clone().ok_or_else(|| {
                OrderError::Storage(RepoError::Database("menu item missing id".into()))
            })?;
            items.push(OrderItem {
                menu_item: item_id,
                name: item.name.clone(),
                qty: line.qty,
                price: unit_price,
                total,
            });
        }
        let total = money::order_total(&line_totals);

        // Sequence allocation is atomic on its own; a placement failure
        // below burns the number (gap, never a duplicate).
        let order_number = sequence::next_order_number(&self.db).await?;

        let order_id = RecordId::from_table_key(ORDER_TABLE, Uuid::new_v4().simple().to_string());
        let order = Order {
            id: None,
            order_number,
            customer_name: req.customer_name.trim().to_string(),
            customer_phone: req.customer_phone.trim().to_string(),
            customer_id: req.customer_id.clone(),
            created_by,
            pricing_tier,
            items,
            total,
            meal_time: schedule.meal_time,
            status: OrderStatus::Pending,
            order_type: schedule.order_type,
            scheduled_for: schedule.scheduled_for,
            special_instructions: req.special_instructions.clone(),
            actual_ready_time: None,
            created_at: now,
            updated_at: now,
        };

        self.commit(&order_id, &order).await?;

        let created: Order = self.db.select(order_id).await.map_err(RepoError::from)?.ok_or_else(
            || OrderError::Storage(RepoError::Database("order missing after commit".into())),
        )?;

        if let Err(e) = self.ledger.apply_order(&created).await {
            tracing::error!(
                order_number = %created.order_number,
                error = %e,
                "ledger application failed after order commit; ledger requires reconciliation"
            );
        }

        Ok(created)
    }

    /// The placement transaction: per line, re-check existence and stock,
    /// decrement, then create the order record. A THROW on any line
    /// cancels the whole transaction - no order row, no stock change.
    async fn commit(&self, order_id: &RecordId, order: &Order) -> OrderResult<()> {
        let mut statements = String::from("BEGIN TRANSACTION;\n");
        for i in 0..order.items.len() {
            statements.push_str(&format!("LET $it{i} = (SELECT * FROM $item{i})[0];\n"));
            statements.push_str(&format!(
                "IF $it{i} == NONE {{ THROW \"{THROW_ITEM_NOT_FOUND}\" }};\n"
            ));
            statements.push_str(&format!(
                "IF $it{i}.stock < $qty{i} {{ THROW \"{THROW_INSUFFICIENT_STOCK}:\" + $it{i}.name }};\n"
            ));
            statements.push_str(&format!(
                "UPDATE $item{i} SET stock -= $qty{i}, updated_at = $now;\n"
            ));
        }
        statements.push_str("CREATE $order_id CONTENT $order;\nCOMMIT TRANSACTION;");

        let mut query = self
            .db
            .query(statements)
            .bind(("order_id", order_id.clone()))
            .bind(("order", order.clone()))
            .bind(("now", now_millis()));
        for (i, line) in order.items.iter().enumerate() {
            query = query
                .bind((format!("item{i}"), line.menu_item.clone()))
                .bind((format!("qty{i}"), line.qty));
        }

        query
            .await
            .map_err(map_transaction_error)?
            .check()
            .map_err(map_transaction_error)?;
        Ok(())
    }
}

/// Normalize the request's scheduling fields and apply the pre-order
/// window checks. The legacy `isPreOrder` + `preOrderDateTime` pair goes
/// through the same two checks as `orderType` + `scheduledFor`.
fn resolve_schedule(req: &PlaceOrderRequest, now: i64) -> OrderResult<Schedule> {
    let legacy_pre_order = req.is_pre_order.unwrap_or(false);
    let order_type = match req.order_type {
        Some(t) => t,
        None if legacy_pre_order || req.meal_time == Some(MealTime::PreOrder) => {
            OrderType::Preorder
        }
        None => OrderType::Now,
    };

    match order_type {
        OrderType::Preorder => {
            let scheduled = req
                .scheduled_for
                .or(req.pre_order_date_time)
                .ok_or_else(|| {
                    OrderError::InvalidScheduling("pre-orders require a scheduled time".into())
                })?;
            if scheduled <= now {
                return Err(OrderError::InvalidScheduling(
                    "scheduled time must be in the future".into(),
                ));
            }
            if scheduled > now + PRE_ORDER_WINDOW_MS {
                return Err(OrderError::InvalidScheduling(
                    "pre-orders may be scheduled at most 3 days ahead".into(),
                ));
            }
            Ok(Schedule {
                order_type,
                meal_time: MealTime::PreOrder,
                scheduled_for: Some(scheduled),
            })
        }
        OrderType::Now => {
            let meal_time = req
                .meal_time
                .ok_or_else(|| OrderError::Validation("mealTime is required".into()))?;
            if meal_time == MealTime::PreOrder {
                return Err(OrderError::Validation(
                    "meal time 'pre-order' requires a pre-order request".into(),
                ));
            }
            Ok(Schedule {
                order_type,
                meal_time,
                scheduled_for: None,
            })
        }
    }
}

/// Only admins may mark an order admin-created; everyone else's orders
/// are customer-created regardless of what the payload claims.
fn resolve_created_by(requested: Option<CreatedBy>, caller: &CallerContext) -> CreatedBy {
    if caller.is_admin() {
        requested.unwrap_or(CreatedBy::Admin)
    } else {
        CreatedBy::Customer
    }
}

/// In-house pricing applies only when requested AND the caller is
/// authorized for it (staff role, or the order is admin-created).
fn resolve_pricing_tier(
    requested: Option<PricingTier>,
    created_by: CreatedBy,
    caller: &CallerContext,
) -> PricingTier {
    let requested_inhouse = requested == Some(PricingTier::Inhouse);
    let authorized = caller.is_staff() || created_by == CreatedBy::Admin;
    if requested_inhouse && authorized {
        PricingTier::Inhouse
    } else {
        PricingTier::Standard
    }
}

/// Per-line business checks, in rejection-priority order
fn check_line(
    item: &MenuItem,
    meal_time: MealTime,
    created_by: CreatedBy,
    qty: i32,
) -> OrderResult<()> {
    if !item.is_available {
        return Err(OrderError::ItemUnavailable(item.name.clone()));
    }
    match meal_time.as_period() {
        Some(period) => {
            // Admin-created orders bypass the meal-time window
            if created_by != CreatedBy::Admin && !item.available_for.contains(&period) {
                return Err(OrderError::MealTimeMismatch(format!(
                    "{} is not offered at {}",
                    item.name, meal_time
                )));
            }
        }
        None => {
            if !item.available_for_pre_order {
                return Err(OrderError::NotAvailableForPreOrder(item.name.clone()));
            }
        }
    }
    if item.stock < qty {
        return Err(OrderError::InsufficientStock(item.name.clone()));
    }
    Ok(())
}

/// The in-house price is used only when the order runs at the in-house
/// tier and the item actually has one; otherwise the standard price.
fn effective_unit_price(item: &MenuItem, tier: PricingTier) -> f64 {
    match (tier, item.in_house_price) {
        (PricingTier::Inhouse, Some(price)) => price,
        _ => item.price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::models::{MealPeriod, MenuItemCreate, MenuItemUpdate, OrderItemRequest};
    use crate::db::repository::{MenuItemRepository, OrderRepository};
    use crate::orders::CallerRole;

    async fn test_db() -> (tempfile::TempDir, Surreal<Db>) {
        let tmp = tempfile::tempdir().unwrap();
        let service = DbService::new(tmp.path().join("db")).await.unwrap();
        (tmp, service.db)
    }

    async fn seed_item(
        db: &Surreal<Db>,
        name: &str,
        price: f64,
        in_house_price: Option<f64>,
        stock: i32,
    ) -> String {
        let repo = MenuItemRepository::new(db.clone());
        let item = repo
            .create(MenuItemCreate {
                name: name.to_string(),
                price,
                in_house_price,
                stock: Some(stock),
                is_available: Some(true),
                available_for: Some(vec![
                    MealPeriod::Breakfast,
                    MealPeriod::Lunch,
                    MealPeriod::Dinner,
                ]),
                available_for_pre_order: Some(true),
            })
            .await
            .unwrap();
        item.id.unwrap().to_string()
    }

    fn request(items: Vec<(&str, i32)>) -> PlaceOrderRequest {
        PlaceOrderRequest {
            customer_name: "Ana Silva".to_string(),
            customer_phone: "600111222".to_string(),
            items: items
                .into_iter()
                .map(|(id, qty)| OrderItemRequest {
                    menu_item_id: id.to_string(),
                    qty,
                })
                .collect(),
            meal_time: Some(MealTime::Lunch),
            special_instructions: None,
            order_type: None,
            scheduled_for: None,
            is_pre_order: None,
            pre_order_date_time: None,
            customer_id: None,
            created_by: None,
            pricing_tier: None,
        }
    }

    fn customer() -> CallerContext {
        CallerContext::new(CallerRole::Customer, None)
    }

    #[tokio::test]
    async fn test_totals_and_stock_decrement() {
        let (_tmp, db) = test_db().await;
        let a = seed_item(&db, "Paella", 100.0, None, 5).await;
        let b = seed_item(&db, "Flan", 50.0, None, 1).await;
        let engine = OrderEngine::new(db.clone());

        let order = engine
            .place_order(request(vec![(&a, 2), (&b, 1)]), &customer())
            .await
            .unwrap();

        assert_eq!(order.total, 250.0);
        assert_eq!(order.items[0].total, 200.0);
        assert_eq!(order.items[1].total, 50.0);
        assert_eq!(order.status, OrderStatus::Pending);

        let repo = MenuItemRepository::new(db);
        assert_eq!(repo.find_by_id(&a).await.unwrap().unwrap().stock, 3);
        assert_eq!(repo.find_by_id(&b).await.unwrap().unwrap().stock, 0);
    }

    #[tokio::test]
    async fn test_inhouse_price_for_employee() {
        let (_tmp, db) = test_db().await;
        let id = seed_item(&db, "Tortilla", 100.0, Some(40.0), 10).await;
        let engine = OrderEngine::new(db);

        let mut req = request(vec![(&id, 1)]);
        req.pricing_tier = Some(PricingTier::Inhouse);
        let caller = CallerContext::new(CallerRole::Employee, Some("emp-7".to_string()));

        let order = engine.place_order(req, &caller).await.unwrap();
        assert_eq!(order.pricing_tier, PricingTier::Inhouse);
        assert_eq!(order.items[0].price, 40.0);
        assert_eq!(order.total, 40.0);
    }

    #[tokio::test]
    async fn test_inhouse_request_denied_for_customer() {
        let (_tmp, db) = test_db().await;
        let id = seed_item(&db, "Tortilla", 100.0, Some(40.0), 10).await;
        let engine = OrderEngine::new(db);

        let mut req = request(vec![(&id, 1)]);
        req.pricing_tier = Some(PricingTier::Inhouse);

        let order = engine.place_order(req, &customer()).await.unwrap();
        assert_eq!(order.pricing_tier, PricingTier::Standard);
        assert_eq!(order.items[0].price, 100.0);
    }

    #[tokio::test]
    async fn test_inhouse_without_item_price_falls_back_to_standard() {
        let (_tmp, db) = test_db().await;
        let id = seed_item(&db, "Gazpacho", 60.0, None, 10).await;
        let engine = OrderEngine::new(db);

        let mut req = request(vec![(&id, 1)]);
        req.pricing_tier = Some(PricingTier::Inhouse);
        let caller = CallerContext::new(CallerRole::Employee, None);

        let order = engine.place_order(req, &caller).await.unwrap();
        // Tier sticks, but the line falls back to the standard price
        assert_eq!(order.pricing_tier, PricingTier::Inhouse);
        assert_eq!(order.items[0].price, 60.0);
    }

    #[tokio::test]
    async fn test_meal_time_mismatch_and_admin_bypass() {
        let (_tmp, db) = test_db().await;
        let repo = MenuItemRepository::new(db.clone());
        let item = repo
            .create(MenuItemCreate {
                name: "Churros".to_string(),
                price: 10.0,
                in_house_price: None,
                stock: Some(10),
                is_available: Some(true),
                available_for: Some(vec![MealPeriod::Breakfast]),
                available_for_pre_order: Some(false),
            })
            .await
            .unwrap();
        let id = item.id.unwrap().to_string();
        let engine = OrderEngine::new(db);

        let mut req = request(vec![(&id, 1)]);
        req.meal_time = Some(MealTime::Dinner);
        let err = engine.place_order(req.clone(), &customer()).await.unwrap_err();
        assert!(matches!(err, OrderError::MealTimeMismatch(_)));

        // Same request from an admin is allowed through
        let admin = CallerContext::new(CallerRole::Admin, Some("admin-1".to_string()));
        let order = engine.place_order(req, &admin).await.unwrap();
        assert_eq!(order.created_by, CreatedBy::Admin);
    }

    #[tokio::test]
    async fn test_unavailable_item_rejected() {
        let (_tmp, db) = test_db().await;
        let id = seed_item(&db, "Fabada", 80.0, None, 10).await;
        let repo = MenuItemRepository::new(db.clone());
        repo.update(
            &id,
            MenuItemUpdate {
                is_available: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let engine = OrderEngine::new(db);
        let err = engine
            .place_order(request(vec![(&id, 1)]), &customer())
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::ItemUnavailable(_)));
    }

    #[tokio::test]
    async fn test_rejected_order_persists_nothing() {
        let (_tmp, db) = test_db().await;
        let a = seed_item(&db, "Paella", 100.0, None, 5).await;
        let b = seed_item(&db, "Flan", 50.0, None, 1).await;
        let engine = OrderEngine::new(db.clone());

        let err = engine
            .place_order(request(vec![(&a, 1), (&b, 5)]), &customer())
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::InsufficientStock(_)));

        // Neither stock moved, and no order row exists
        let menu = MenuItemRepository::new(db.clone());
        assert_eq!(menu.find_by_id(&a).await.unwrap().unwrap().stock, 5);
        assert_eq!(menu.find_by_id(&b).await.unwrap().unwrap().stock, 1);
        let orders = OrderRepository::new(db).find_all(50, 0).await.unwrap();
        assert!(orders.is_empty());
    }

    #[tokio::test]
    async fn test_pre_order_window() {
        let (_tmp, db) = test_db().await;
        let id = seed_item(&db, "Cocido", 90.0, None, 20).await;
        let engine = OrderEngine::new(db);
        let now = now_millis();

        // Exactly now: rejected
        let mut req = request(vec![(&id, 1)]);
        req.order_type = Some(OrderType::Preorder);
        req.scheduled_for = Some(now);
        let err = engine.place_order(req, &customer()).await.unwrap_err();
        assert!(matches!(err, OrderError::InvalidScheduling(_)));

        // Just past the 72h window: rejected
        let mut req = request(vec![(&id, 1)]);
        req.order_type = Some(OrderType::Preorder);
        req.scheduled_for = Some(now + PRE_ORDER_WINDOW_MS + 1_000);
        let err = engine.place_order(req, &customer()).await.unwrap_err();
        assert!(matches!(err, OrderError::InvalidScheduling(_)));

        // One hour ahead: accepted
        let mut req = request(vec![(&id, 1)]);
        req.order_type = Some(OrderType::Preorder);
        req.scheduled_for = Some(now + 60 * 60 * 1000);
        let order = engine.place_order(req, &customer()).await.unwrap();
        assert_eq!(order.order_type, OrderType::Preorder);
        assert_eq!(order.meal_time, MealTime::PreOrder);

        // Missing scheduled time: rejected
        let mut req = request(vec![(&id, 1)]);
        req.order_type = Some(OrderType::Preorder);
        let err = engine.place_order(req, &customer()).await.unwrap_err();
        assert!(matches!(err, OrderError::InvalidScheduling(_)));
    }

    #[tokio::test]
    async fn test_legacy_pre_order_fields() {
        let (_tmp, db) = test_db().await;
        let id = seed_item(&db, "Croquetas", 30.0, None, 20).await;
        let engine = OrderEngine::new(db);
        let now = now_millis();

        let mut req = request(vec![(&id, 2)]);
        req.is_pre_order = Some(true);
        req.pre_order_date_time = Some(now + 2 * 60 * 60 * 1000);
        let order = engine.place_order(req, &customer()).await.unwrap();
        assert_eq!(order.order_type, OrderType::Preorder);
        assert!(order.scheduled_for.is_some());

        // Legacy path applies the same window checks
        let mut req = request(vec![(&id, 1)]);
        req.is_pre_order = Some(true);
        req.pre_order_date_time = Some(now - 1000);
        let err = engine.place_order(req, &customer()).await.unwrap_err();
        assert!(matches!(err, OrderError::InvalidScheduling(_)));
    }

    #[tokio::test]
    async fn test_not_available_for_pre_order() {
        let (_tmp, db) = test_db().await;
        let repo = MenuItemRepository::new(db.clone());
        let item = repo
            .create(MenuItemCreate {
                name: "Menu del dia".to_string(),
                price: 15.0,
                in_house_price: None,
                stock: Some(10),
                is_available: Some(true),
                available_for: Some(vec![MealPeriod::Lunch]),
                available_for_pre_order: Some(false),
            })
            .await
            .unwrap();
        let id = item.id.unwrap().to_string();
        let engine = OrderEngine::new(db);

        let mut req = request(vec![(&id, 1)]);
        req.order_type = Some(OrderType::Preorder);
        req.scheduled_for = Some(now_millis() + 60 * 60 * 1000);
        let err = engine.place_order(req, &customer()).await.unwrap_err();
        assert!(matches!(err, OrderError::NotAvailableForPreOrder(_)));
    }

    #[tokio::test]
    async fn test_order_number_sequence() {
        let (_tmp, db) = test_db().await;
        let id = seed_item(&db, "Pan", 2.0, None, 100).await;
        let engine = OrderEngine::new(db);

        let first = engine
            .place_order(request(vec![(&id, 1)]), &customer())
            .await
            .unwrap();
        let second = engine
            .place_order(request(vec![(&id, 1)]), &customer())
            .await
            .unwrap();

        assert!(first.order_number.starts_with("TM"));
        assert_eq!(first.order_number.len(), 11);
        assert!(first.order_number.ends_with("001"));
        assert!(second.order_number.ends_with("002"));
    }

    #[tokio::test]
    async fn test_price_snapshot_survives_menu_edit() {
        let (_tmp, db) = test_db().await;
        let id = seed_item(&db, "Calamares", 12.5, None, 10).await;
        let engine = OrderEngine::new(db.clone());

        let order = engine
            .place_order(request(vec![(&id, 2)]), &customer())
            .await
            .unwrap();
        assert_eq!(order.items[0].price, 12.5);

        let menu = MenuItemRepository::new(db.clone());
        menu.update(
            &id,
            MenuItemUpdate {
                price: Some(99.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let reread = OrderRepository::new(db)
            .find_by_id(&order.id.unwrap().to_string())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reread.items[0].price, 12.5);
        assert_eq!(reread.total, 25.0);
    }

    #[tokio::test]
    async fn test_validation_failures() {
        let (_tmp, db) = test_db().await;
        let id = seed_item(&db, "Pulpo", 20.0, None, 10).await;
        let engine = OrderEngine::new(db);

        let mut req = request(vec![(&id, 1)]);
        req.customer_name = "  ".to_string();
        assert!(matches!(
            engine.place_order(req, &customer()).await.unwrap_err(),
            OrderError::Validation(_)
        ));

        let req = request(vec![]);
        assert!(matches!(
            engine.place_order(req, &customer()).await.unwrap_err(),
            OrderError::Validation(_)
        ));

        let req = request(vec![(&id, 0)]);
        assert!(matches!(
            engine.place_order(req, &customer()).await.unwrap_err(),
            OrderError::Validation(_)
        ));

        let mut req = request(vec![(&id, 1)]);
        req.meal_time = None;
        assert!(matches!(
            engine.place_order(req, &customer()).await.unwrap_err(),
            OrderError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_unknown_item_rejected() {
        let (_tmp, db) = test_db().await;
        let engine = OrderEngine::new(db);
        let err = engine
            .place_order(request(vec![("menu_item:missing", 1)]), &customer())
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::ItemNotFound(_)));
    }
}
