//! Filtered search and single-document lookup.

use std::sync::Arc;

use archivist_query::{assemble_query, compile_filters, resource_query, FilterRequest};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/search", post(search))
        .route("/resource/{id}", get(resource))
}

/// POST /api/search — compile filters and return the raw backend hits.
async fn search(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FilterRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = payload?;
    let compiled = compile_filters(&req.filters, req.is_or);
    debug!(
        "Search: {} and, {} and-not, {} or clauses",
        compiled.and_filters.len(),
        compiled.and_not_filters.len(),
        compiled.or_filters.len()
    );
    let body = assemble_query(&req, &compiled);
    let res = state.backend.search(state.index(), &body).await?;
    Ok(Json(res))
}

/// GET /api/resource/{id} — raw backend response for one document.
async fn resource(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let res = state
        .backend
        .search(state.index(), &resource_query(&id))
        .await?;
    Ok(Json(res))
}
