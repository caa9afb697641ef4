//! Order placement
//!
//! - [`engine`] - validation, pricing-tier resolution and the atomic
//!   placement transaction
//! - [`money`] - decimal line arithmetic
//! - [`sequence`] - per-day order-number allocation

pub mod engine;
pub mod error;
pub mod money;
pub mod sequence;

pub use engine::OrderEngine;
pub use error::{OrderError, OrderResult};

use serde::{Deserialize, Serialize};

/// Role resolved by the authentication collaborator
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CallerRole {
    Admin,
    Employee,
    Customer,
    Anonymous,
}

/// Caller identity context attached to each request
#[derive(Debug, Clone)]
pub struct CallerContext {
    pub role: CallerRole,
    pub user_id: Option<String>,
}

impl CallerContext {
    pub fn new(role: CallerRole, user_id: Option<String>) -> Self {
        Self { role, user_id }
    }

    pub fn anonymous() -> Self {
        Self {
            role: CallerRole::Anonymous,
            user_id: None,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == CallerRole::Admin
    }

    /// In-house pricing is open to staff roles only
    pub fn is_staff(&self) -> bool {
        matches!(self.role, CallerRole::Admin | CallerRole::Employee)
    }
}
