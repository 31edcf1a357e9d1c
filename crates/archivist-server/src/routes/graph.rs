//! Synthetic neighbor graph for the relationship view.

use std::sync::Arc;

use archivist_graph::GraphResult;
use axum::extract::rejection::JsonRejection;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/graph_neighbors", post(graph_neighbors))
}

#[derive(Debug, Deserialize)]
struct GraphRequest {
    /// Root token; a random one is drawn when absent.
    #[serde(default)]
    query: Option<String>,
}

/// POST /api/graph_neighbors
async fn graph_neighbors(
    payload: Result<Json<GraphRequest>, JsonRejection>,
) -> Result<Json<GraphResult>, ApiError> {
    let Json(req) = payload?;
    Ok(Json(archivist_graph::synthesize(req.query)))
}
