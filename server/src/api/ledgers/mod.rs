//! Account ledger API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/ledgers", ledger_routes())
}

fn ledger_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/settle", post(handler::settle))
        .route("/profile/{phone}", get(handler::profile))
}
