//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod bids;
pub mod health;
pub mod tenders;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(tenders::routes())
        .merge(bids::routes())
}
