//! Utility module - shared helpers and types
//!
//! - [`AppError`] / [`AppResponse`] - application error type and response envelope
//! - [`AppResult`] - handler Result alias
//! - logger, time and validation helpers

pub mod error;
pub mod logger;
pub mod result;
pub mod time;
pub mod validation;

pub use error::{AppError, AppResponse, ok, ok_with_message};
pub use result::AppResult;
