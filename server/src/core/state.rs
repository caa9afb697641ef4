use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::core::Config;
use crate::db::DbService;

/// Server state - shared handle to configuration and the embedded database
///
/// `ServerState` is cheaply cloneable (the database handle is an internal
/// `Arc`); every HTTP handler receives a clone via axum's `State` extractor.
///
/// | Field | Type | Meaning |
/// |-------|------|---------|
/// | config | Config | configuration (immutable) |
/// | db | Surreal<Db> | embedded database |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
}

impl ServerState {
    /// Create server state from existing parts
    ///
    /// Usually [`ServerState::initialize`] is used instead.
    pub fn new(config: Config, db: Surreal<Db>) -> Self {
        Self { config, db }
    }

    /// Initialize server state
    ///
    /// 1. Ensure the work directory layout exists
    /// 2. Open the embedded database at `work_dir/database`
    ///
    /// # Panics
    ///
    /// Panics when the work directory cannot be created or the database
    /// fails to open - the server cannot run without either.
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_service = DbService::new(config.database_dir())
            .await
            .expect("Failed to initialize database");

        Self::new(config.clone(), db_service.db)
    }

    /// Get a database handle
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }
}
