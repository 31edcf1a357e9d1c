//! Archivist Backend — the search engine seen by the gateway.
//!
//! Handlers talk to a [`SearchBackend`]; production wiring uses
//! [`ElasticsearchBackend`].

pub mod elasticsearch;

use archivist_core::Result;
use async_trait::async_trait;
use serde_json::Value;

pub use elasticsearch::ElasticsearchBackend;

/// Document store queried with structured query bodies.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run `body` against `index` and return the raw response.
    async fn search(&self, index: &str, body: &Value) -> Result<Value>;

    /// Apply a partial update to one document.
    async fn update(&self, index: &str, id: &str, body: &Value, refresh: bool) -> Result<Value>;
}
