//! Time utilities
//!
//! All timestamps are Unix millis (`i64`); conversion to business-local
//! dates happens here so repositories and services stay timezone-free.

use chrono::{Datelike, Local, TimeZone};

/// Current time as Unix millis
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Day key for the order-number sequence, local business date (`YYYYMMDD`)
pub fn local_day_key() -> String {
    Local::now().format("%Y%m%d").to_string()
}

/// Order-number date prefix, local business date (`YYMMDD`)
pub fn local_day_prefix() -> String {
    Local::now().format("%y%m%d").to_string()
}

/// Ledger period (month 1-12, year) for an order timestamp, local business date
pub fn period_of(millis: i64) -> (u32, i32) {
    let dt = Local
        .timestamp_millis_opt(millis)
        .earliest()
        .unwrap_or_else(Local::now);
    (dt.month(), dt.year())
}
