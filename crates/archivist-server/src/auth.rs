//! Access checks for the API: bearer tokens mapped to roles.

use std::collections::HashMap;
use std::sync::Arc;

use archivist_core::{GatewayConfig, Role};
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Resolves the caller's role from request headers.
pub trait AuthGate: Send + Sync {
    /// `None` when the caller is not logged in.
    fn authorize(&self, headers: &HeaderMap) -> Option<Role>;
}

/// Gate backed by the static token table from the gateway config.
pub struct TokenGate {
    tokens: HashMap<String, Role>,
}

impl TokenGate {
    pub fn new(tokens: impl IntoIterator<Item = (String, Role)>) -> Self {
        Self {
            tokens: tokens.into_iter().collect(),
        }
    }

    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(config.tokens.iter().map(|t| (t.token.clone(), t.role)))
    }
}

impl AuthGate for TokenGate {
    fn authorize(&self, headers: &HeaderMap) -> Option<Role> {
        bearer_token(headers).and_then(|token| self.tokens.get(token).copied())
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn check(state: &AppState, req: &Request, required: Role) -> Result<(), ApiError> {
    let role = state
        .gate
        .authorize(req.headers())
        .ok_or_else(|| ApiError::Unauthorized("Missing or invalid token".into()))?;
    if role < required {
        debug!("Rejected {:?} caller on {}", role, req.uri().path());
        return Err(ApiError::Forbidden("Admins only!".into()));
    }
    Ok(())
}

/// Middleware admitting any logged-in caller.
pub async fn require_login(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    check(&state, &req, Role::User)?;
    Ok(next.run(req).await)
}

/// Middleware admitting admins only.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    check(&state, &req, Role::Admin)?;
    Ok(next.run(req).await)
}
