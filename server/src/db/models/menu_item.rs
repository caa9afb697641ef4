//! Menu Item Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Meal periods an item can be offered in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MealPeriod {
    Breakfast,
    Lunch,
    Dinner,
}

/// Menu item
///
/// `price` is the standard/guest price; `in_house_price` is the employee
/// tier and may be absent. `stock` never goes below zero - it is only
/// decremented inside the order placement transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    pub price: f64,
    pub in_house_price: Option<f64>,
    #[serde(default)]
    pub stock: i32,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub available_for: Vec<MealPeriod>,
    #[serde(default)]
    pub available_for_pre_order: bool,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub name: String,
    pub price: f64,
    pub in_house_price: Option<f64>,
    pub stock: Option<i32>,
    pub is_available: Option<bool>,
    pub available_for: Option<Vec<MealPeriod>>,
    pub available_for_pre_order: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub in_house_price: Option<f64>,
    pub stock: Option<i32>,
    pub is_available: Option<bool>,
    pub available_for: Option<Vec<MealPeriod>>,
    pub available_for_pre_order: Option<bool>,
}
