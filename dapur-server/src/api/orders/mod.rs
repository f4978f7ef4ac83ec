//! Order API Module
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | POST | /api/orders | create |
//! | GET | /api/orders | list |
//! | GET | /api/orders/dashboard/stats | dashboard_stats |
//! | GET | /api/orders/{id} | get_by_id |
//! | PUT | /api/orders/{id}/status | update_status |

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        // Static segment is matched before `{id}`
        .route("/dashboard/stats", get(handler::dashboard_stats))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", put(handler::update_status))
}
