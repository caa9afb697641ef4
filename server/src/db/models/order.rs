//! Order Model
//!
//! Orders store point-in-time snapshots of item names and prices; later
//! menu edits never change a placed order.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::menu_item::MealPeriod;
use super::serde_helpers;

// =============================================================================
// Enums
// =============================================================================

/// Meal time of an order - the three service periods plus pre-order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MealTime {
    Breakfast,
    Lunch,
    Dinner,
    #[serde(rename = "pre-order")]
    PreOrder,
}

impl MealTime {
    /// The catalog period this meal time corresponds to (none for pre-order)
    pub fn as_period(&self) -> Option<MealPeriod> {
        match self {
            MealTime::Breakfast => Some(MealPeriod::Breakfast),
            MealTime::Lunch => Some(MealPeriod::Lunch),
            MealTime::Dinner => Some(MealPeriod::Dinner),
            MealTime::PreOrder => None,
        }
    }
}

impl std::fmt::Display for MealTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MealTime::Breakfast => "breakfast",
            MealTime::Lunch => "lunch",
            MealTime::Dinner => "dinner",
            MealTime::PreOrder => "pre-order",
        };
        write!(f, "{s}")
    }
}

/// Order status
///
/// Transitions are admin-driven and deliberately permissive: any listed
/// status can be set from any non-terminal one, no predecessor check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Completed,
    Cancelled,
    Paid,
}

/// Fulfilment type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    Now,
    Preorder,
}

/// Pricing tier applied to the whole order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PricingTier {
    Standard,
    Inhouse,
}

/// Who created the order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CreatedBy {
    Customer,
    Admin,
}

// =============================================================================
// Order
// =============================================================================

/// One order line - name and price are snapshots taken at placement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(with = "serde_helpers::record_id")]
    pub menu_item: RecordId,
    pub name: String,
    pub qty: i32,
    /// Unit price snapshot (effective tier applied)
    pub price: f64,
    /// Line total = price * qty
    pub total: f64,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    /// Unique, date-derived: TM{YY}{MM}{DD}{seq:03}
    pub order_number: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_id: Option<String>,
    pub created_by: CreatedBy,
    pub pricing_tier: PricingTier,
    pub items: Vec<OrderItem>,
    /// Sum of line totals
    pub total: f64,
    pub meal_time: MealTime,
    pub status: OrderStatus,
    pub order_type: OrderType,
    /// Required for PREORDER orders, unix millis
    pub scheduled_for: Option<i64>,
    pub special_instructions: Option<String>,
    /// Stamped when the order transitions to ready
    pub actual_ready_time: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

// =============================================================================
// API Request Types
// =============================================================================

/// One requested line (quantities only - prices are resolved server-side)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub menu_item_id: String,
    pub qty: i32,
}

/// Order submission payload (camelCase wire format used by the web clients)
///
/// `is_pre_order` / `pre_order_date_time` are the legacy pre-order fields;
/// they are normalized into `order_type` / `scheduled_for`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub customer_name: String,
    pub customer_phone: String,
    pub items: Vec<OrderItemRequest>,
    pub meal_time: Option<MealTime>,
    pub special_instructions: Option<String>,
    pub order_type: Option<OrderType>,
    /// Unix millis
    pub scheduled_for: Option<i64>,
    pub is_pre_order: Option<bool>,
    /// Unix millis (legacy)
    pub pre_order_date_time: Option<i64>,
    pub customer_id: Option<String>,
    pub created_by: Option<CreatedBy>,
    pub pricing_tier: Option<PricingTier>,
}
