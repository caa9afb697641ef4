//! Account ledger subsystem
//!
//! - [`service`] - order application and settlement recording
//! - [`error`] - ledger failure taxonomy

pub mod error;
pub mod service;

pub use error::{LedgerError, LedgerResult};
pub use service::{LedgerService, SettlementRequest};
