//! TableMate Server - restaurant ordering and account-ledger backend
//!
//! # Architecture
//!
//! - **Order engine** (`orders`): validation, pricing-tier resolution and
//!   the atomic placement transaction (stock decrement + order insert)
//! - **Ledger service** (`ledger`): running balances per account bucket,
//!   full and partial settlements
//! - **Database** (`db`): embedded SurrealDB storage
//! - **HTTP API** (`api`): RESTful endpoints for orders and ledgers
//!
//! # Module structure
//!
//! ```text
//! server/src/
//! ├── core/          # configuration, state, server runner
//! ├── api/           # HTTP routes and handlers
//! ├── orders/        # order engine
//! ├── ledger/        # account ledger service
//! ├── db/            # database layer (models, repositories)
//! └── utils/         # errors, logging, validation, time
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod ledger;
pub mod orders;
pub mod utils;

// Re-export common types
pub use crate::core::{Config, Server, ServerState};
pub use ledger::{LedgerService, SettlementRequest};
pub use orders::{CallerContext, CallerRole, OrderEngine};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Prepare the process environment: .env file, then logging
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
  ______      __    __     __  ___      __
 /_  __/___ _/ /_  / /__  /  |/  /___ _/ /____
  / / / __ `/ __ \/ / _ \/ /|_/ / __ `/ __/ _ \
 / / / /_/ / /_/ / /  __/ /  / / /_/ / /_/  __/
/_/  \__,_/_.___/_/\___/_/  /_/\__,_/\__/\___/
    "#
    );
}
