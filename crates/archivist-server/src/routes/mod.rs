//! HTTP route handlers for the search gateway.

pub mod graph;
pub mod health;
pub mod search;
pub mod tags;

use std::sync::Arc;

use axum::middleware::from_fn_with_state;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{require_admin, require_login};
use crate::state::AppState;

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", api_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let logged_in = Router::new()
        .merge(search::routes())
        .merge(tags::routes())
        .merge(graph::routes())
        .route_layer(from_fn_with_state(state.clone(), require_login));

    let admin = Router::new()
        .merge(tags::admin_routes())
        .route_layer(from_fn_with_state(state, require_admin));

    Router::new()
        .merge(health::routes())
        .merge(logged_in)
        .merge(admin)
}
