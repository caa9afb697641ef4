//! Menu Item Repository

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{MenuItem, MenuItemCreate, MenuItemUpdate};
use crate::utils::time::now_millis;

const MENU_ITEM_TABLE: &str = "menu_item";

#[derive(Clone)]
pub struct MenuItemRepository {
    base: BaseRepository,
}

impl MenuItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Parse an id in "menu_item:xxx" (or bare "xxx") form
    fn record_id(id: &str) -> RecordId {
        id.parse::<RecordId>()
            .unwrap_or_else(|_| RecordId::from_table_key(MENU_ITEM_TABLE, id))
    }

    /// Find all menu items, name order
    pub async fn find_all(&self) -> RepoResult<Vec<MenuItem>> {
        let items: Vec<MenuItem> = self
            .base
            .db()
            .query("SELECT * FROM menu_item ORDER BY name")
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Find a menu item by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<MenuItem>> {
        let item: Option<MenuItem> = self.base.db().select(Self::record_id(id)).await?;
        Ok(item)
    }

    /// Create a new menu item
    pub async fn create(&self, data: MenuItemCreate) -> RepoResult<MenuItem> {
        if data.name.trim().is_empty() {
            return Err(RepoError::Validation("name must not be empty".into()));
        }
        if data.price < 0.0 {
            return Err(RepoError::Validation("price must be non-negative".into()));
        }
        if let Some(p) = data.in_house_price
            && p < 0.0
        {
            return Err(RepoError::Validation(
                "in-house price must be non-negative".into(),
            ));
        }
        if let Some(s) = data.stock
            && s < 0
        {
            return Err(RepoError::Validation("stock must be non-negative".into()));
        }

        let now = now_millis();
        let item = MenuItem {
            id: None,
            name: data.name,
            price: data.price,
            in_house_price: data.in_house_price,
            stock: data.stock.unwrap_or(0),
            is_available: data.is_available.unwrap_or(true),
            available_for: data.available_for.unwrap_or_default(),
            available_for_pre_order: data.available_for_pre_order.unwrap_or(false),
            created_at: now,
            updated_at: now,
        };

        let created: Option<MenuItem> = self
            .base
            .db()
            .create(MENU_ITEM_TABLE)
            .content(item)
            .await?;

        created.ok_or_else(|| RepoError::Database("Failed to create menu item".to_string()))
    }

    /// Update a menu item
    ///
    /// Stock set here is an administrative restock; placement-time
    /// decrements go through the order engine's transaction only.
    pub async fn update(&self, id: &str, data: MenuItemUpdate) -> RepoResult<MenuItem> {
        let thing = Self::record_id(id);

        if let Some(s) = data.stock
            && s < 0
        {
            return Err(RepoError::Validation("stock must be non-negative".into()));
        }

        let mut set_parts: Vec<&str> = Vec::new();
        if data.name.is_some() {
            set_parts.push("name = $name");
        }
        if data.price.is_some() {
            set_parts.push("price = $price");
        }
        if data.in_house_price.is_some() {
            set_parts.push("in_house_price = $in_house_price");
        }
        if data.stock.is_some() {
            set_parts.push("stock = $stock");
        }
        if data.is_available.is_some() {
            set_parts.push("is_available = $is_available");
        }
        if data.available_for.is_some() {
            set_parts.push("available_for = $available_for");
        }
        if data.available_for_pre_order.is_some() {
            set_parts.push("available_for_pre_order = $available_for_pre_order");
        }

        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)));
        }
        set_parts.push("updated_at = $now");

        let query_str = format!("UPDATE $thing SET {} RETURN AFTER", set_parts.join(", "));

        let mut query = self
            .base
            .db()
            .query(&query_str)
            .bind(("thing", thing))
            .bind(("now", now_millis()));

        if let Some(v) = data.name {
            query = query.bind(("name", v));
        }
        if let Some(v) = data.price {
            query = query.bind(("price", v));
        }
        if let Some(v) = data.in_house_price {
            query = query.bind(("in_house_price", v));
        }
        if let Some(v) = data.stock {
            query = query.bind(("stock", v));
        }
        if let Some(v) = data.is_available {
            query = query.bind(("is_available", v));
        }
        if let Some(v) = data.available_for {
            query = query.bind(("available_for", v));
        }
        if let Some(v) = data.available_for_pre_order {
            query = query.bind(("available_for_pre_order", v));
        }

        let mut result = query.await?;
        let items: Vec<MenuItem> = result.take(0)?;
        items
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))
    }

    /// Hard delete a menu item
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let result: Option<MenuItem> = self.base.db().delete(Self::record_id(id)).await?;
        if result.is_none() {
            return Err(RepoError::NotFound(format!("Menu item {} not found", id)));
        }
        Ok(())
    }
}
