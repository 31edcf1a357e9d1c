//! Tag editing and tag suggestions.

use std::sync::Arc;

use archivist_query::{collect_suggestions, suggestion_query, TagMutation, TagType};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tags/add", post(add_tag))
        .route("/tags/suggestions", post(suggested_tags))
}

/// Routes that must sit behind the admin check.
pub fn admin_routes() -> Router<Arc<AppState>> {
    Router::new().route("/tags/remove", post(remove_tag))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TagRequest {
    tag_type: Option<String>,
    tag_value: Option<String>,
    resource_id: Option<String>,
}

impl TagRequest {
    fn validate(&self) -> archivist_core::Result<TagMutation> {
        TagMutation::validate(
            self.tag_type.as_deref(),
            self.tag_value.as_deref(),
            self.resource_id.as_deref(),
        )
    }
}

/// Decode and validate a tag body. Any failure answers 400 with `msg`.
fn parse_tag_request(
    payload: Result<Json<TagRequest>, JsonRejection>,
    msg: &str,
) -> Result<TagMutation, ApiError> {
    let Json(req) = payload.map_err(|e| {
        warn!("Rejected tag body: {}", e.body_text());
        ApiError::BadRequest(msg.to_string())
    })?;
    req.validate().map_err(|e| {
        warn!("Rejected tag request: {}", e);
        ApiError::BadRequest(msg.to_string())
    })
}

#[derive(Debug, Deserialize)]
struct SuggestionRequest {
    #[serde(rename = "type")]
    tag_type: String,
    query: String,
}

/// POST /api/tags/add
async fn add_tag(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TagRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let mutation = parse_tag_request(payload, "Please fill out all fields")?;

    state
        .backend
        .update(state.index(), &mutation.resource_id, &mutation.add_body(), true)
        .await?;
    info!(
        "Added {} tag '{}' to {}",
        mutation.tag_type, mutation.tag_value, mutation.resource_id
    );

    Ok(Json(json!({ "added": true })))
}

/// POST /api/tags/remove — admin only.
async fn remove_tag(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TagRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let mutation = parse_tag_request(payload, "Unknown error")?;

    state
        .backend
        .update(
            state.index(),
            &mutation.resource_id,
            &mutation.remove_body(),
            true,
        )
        .await?;
    info!(
        "Removed {} tag '{}' from {}",
        mutation.tag_type, mutation.tag_value, mutation.resource_id
    );

    Ok(Json(json!({ "removed": true })))
}

/// POST /api/tags/suggestions — up to 25 existing tags matching a prefix.
async fn suggested_tags(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SuggestionRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = payload?;
    let tag_type = TagType::parse(&req.tag_type)
        .ok_or_else(|| ApiError::BadRequest("Unknown tag type".into()))?;

    let res = state
        .backend
        .search(state.index(), &suggestion_query(tag_type, &req.query))
        .await?;
    let tags = collect_suggestions(&res, &req.query);

    Ok(Json(json!({ "tags": tags })))
}
