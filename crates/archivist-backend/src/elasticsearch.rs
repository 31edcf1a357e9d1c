//! Elasticsearch REST client.
//!
//! Only the two endpoints the gateway needs: `_search` and `_update`.
//! Failures are reported once and never retried.

use archivist_core::{Error, GatewayConfig, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde_json::Value;
use tracing::{debug, error};

use crate::SearchBackend;

pub struct ElasticsearchBackend {
    client: Client,
    base_url: Url,
    credentials: Option<(String, Option<String>)>,
}

impl ElasticsearchBackend {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("invalid ELASTICSEARCH_URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "ELASTICSEARCH_URL '{}' cannot be used as a base URL",
                base_url
            )));
        }
        Ok(Self {
            client: Client::new(),
            base_url,
            credentials: None,
        })
    }

    /// Build a client from gateway configuration, including basic auth.
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        let mut backend = Self::new(&config.elasticsearch_url)?;
        if let Some(user) = &config.elasticsearch_username {
            backend = backend.with_basic_auth(user, config.elasticsearch_password.as_deref());
        }
        Ok(backend)
    }

    pub fn with_basic_auth(mut self, username: &str, password: Option<&str>) -> Self {
        self.credentials = Some((username.to_string(), password.map(str::to_string)));
        self
    }

    /// `base_url` extended with path `segments`, each percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Internal("backend URL cannot carry a path".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some((user, password)) => request.basic_auth(user, password.as_deref()),
            None => request,
        }
    }

    async fn send(&self, url: Url, body: &Value) -> Result<Value> {
        debug!("POST {}", url);

        let response = self
            .authorize(self.client.post(url.clone()))
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!("Search backend unreachable at {}: {}", url, e);
                Error::Http(format!("Request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Search backend returned {} for {}", status, url);
            return Err(Error::Backend {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| Error::Http(format!("Invalid backend response: {}", e)))
    }
}

#[async_trait]
impl SearchBackend for ElasticsearchBackend {
    async fn search(&self, index: &str, body: &Value) -> Result<Value> {
        let url = self.endpoint(&[index, "_search"])?;
        self.send(url, body).await
    }

    async fn update(&self, index: &str, id: &str, body: &Value, refresh: bool) -> Result<Value> {
        let mut url = self.endpoint(&[index, "_update", id])?;
        url.query_pairs_mut()
            .append_pair("refresh", if refresh { "true" } else { "false" });
        self.send(url, body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use axum::extract::{Path, Query};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;

    /// Spawn a fake cluster that echoes what it received.
    async fn spawn_cluster() -> String {
        let app = Router::new()
            .route(
                "/{index}/_search",
                post(
                    |Path(index): Path<String>, headers: HeaderMap, Json(body): Json<Value>| async move {
                        if index == "broken" {
                            return (StatusCode::BAD_REQUEST, Json(json!({"error": "parsing_exception"})));
                        }
                        let auth = headers
                            .get("authorization")
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string);
                        (
                            StatusCode::OK,
                            Json(json!({"index": index, "received": body, "auth": auth})),
                        )
                    },
                ),
            )
            .route(
                "/{index}/_update/{id}",
                post(
                    |Path((index, id)): Path<(String, String)>,
                     Query(params): Query<HashMap<String, String>>,
                     Json(body): Json<Value>| async move {
                        Json(json!({
                            "_index": index,
                            "_id": id,
                            "refresh": params.get("refresh"),
                            "received": body,
                            "result": "updated",
                        }))
                    },
                ),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_search_posts_body() {
        let base = spawn_cluster().await;
        let backend = ElasticsearchBackend::new(&base).unwrap();
        let body = json!({"query": {"match_all": {}}});

        let res = backend.search("archive", &body).await.unwrap();
        assert_eq!(res["index"], "archive");
        assert_eq!(res["received"], body);
        assert!(res["auth"].is_null());
    }

    #[tokio::test]
    async fn test_update_encodes_id_and_refresh() {
        let base = spawn_cluster().await;
        let backend = ElasticsearchBackend::new(&format!("{}/", base)).unwrap();
        let body = json!({"script": {"source": "noop"}});

        let res = backend.update("archive", "doc 7", &body, true).await.unwrap();
        assert_eq!(res["_id"], "doc 7");
        assert_eq!(res["refresh"], "true");
        assert_eq!(res["received"], body);
    }

    #[tokio::test]
    async fn test_basic_auth_header() {
        let base = spawn_cluster().await;
        let backend = ElasticsearchBackend::new(&base)
            .unwrap()
            .with_basic_auth("elastic", Some("changeme"));

        let res = backend.search("archive", &json!({})).await.unwrap();
        assert!(res["auth"].as_str().unwrap().starts_with("Basic "));
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let base = spawn_cluster().await;
        let backend = ElasticsearchBackend::new(&base).unwrap();

        match backend.search("broken", &json!({})).await {
            Err(Error::Backend { status, body }) => {
                assert_eq!(status, 400);
                assert!(body.contains("parsing_exception"));
            }
            other => panic!("expected backend error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        // Reserve a free port, then release it so nothing is listening there.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let backend = ElasticsearchBackend::new(&format!("http://{}", addr)).unwrap();
        let result = backend.search("archive", &json!({})).await;
        assert!(matches!(result, Err(Error::Http(_))));
    }

    #[test]
    fn test_invalid_url_rejected() {
        assert!(matches!(
            ElasticsearchBackend::new("not a url"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            ElasticsearchBackend::new("mailto:ops@example.org"),
            Err(Error::Config(_))
        ));
    }
}
