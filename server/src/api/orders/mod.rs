//! Order API module

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", order_routes())
}

fn order_routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::place).get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/by-number/{number}", get(handler::get_by_number))
        .route("/{id}/status", patch(handler::update_status))
}
