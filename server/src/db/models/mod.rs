//! Database Models

// Serde helpers
pub mod serde_helpers;

// Catalog
pub mod menu_item;

// Orders
pub mod order;

// Ledger
pub mod account_ledger;

// Re-exports
pub use account_ledger::{
    AccountLedger, AccountType, LedgerStatus, Settlement, SettlementType,
};
pub use menu_item::{MealPeriod, MenuItem, MenuItemCreate, MenuItemUpdate};
pub use order::{
    CreatedBy, MealTime, Order, OrderItem, OrderItemRequest, OrderStatus, OrderType,
    PlaceOrderRequest, PricingTier,
};
