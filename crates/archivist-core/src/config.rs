//! Gateway configuration: backend location, index name, API tokens.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Environment variable naming the JSON config file.
pub const CONFIG_PATH_ENV: &str = "ARCHIVIST_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/config.json";
pub const DEFAULT_PORT: u16 = 5000;

/// Access level attached to an API token.
///
/// Ordered so that `Admin` satisfies every check `User` satisfies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// A bearer token accepted by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiToken {
    pub token: String,
    pub role: Role,
}

/// Top-level gateway configuration.
///
/// File keys keep the upper-case layout of the legacy `config.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// HTTP server port.
    #[serde(rename = "PORT", default = "default_port")]
    pub port: u16,
    /// Base URL of the Elasticsearch cluster.
    #[serde(rename = "ELASTICSEARCH_URL", default)]
    pub elasticsearch_url: String,
    /// Index holding the archive documents.
    #[serde(rename = "ELASTICSEARCH_INDEX", default)]
    pub elasticsearch_index: String,
    #[serde(rename = "ELASTICSEARCH_USERNAME", default)]
    pub elasticsearch_username: Option<String>,
    #[serde(rename = "ELASTICSEARCH_PASSWORD", default)]
    pub elasticsearch_password: Option<String>,
    #[serde(rename = "TOKENS", default)]
    pub tokens: Vec<ApiToken>,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl GatewayConfig {
    /// Resolve the config file path from `ARCHIVIST_CONFIG`.
    pub fn resolve_path() -> PathBuf {
        std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Load config from a JSON file, then apply environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let mut config = Self::from_json(&raw)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        info!(
            "Loaded config from {} (index '{}', {} tokens)",
            path.display(),
            config.elasticsearch_index,
            config.tokens.len()
        );
        Ok(config)
    }

    /// Parse config from JSON text without overrides or validation.
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Overlay `PORT`, `ELASTICSEARCH_URL` and `ELASTICSEARCH_INDEX` from `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(port) = lookup("PORT").and_then(|p| p.parse().ok()) {
            debug!("PORT overridden from environment");
            self.port = port;
        }
        if let Some(url) = lookup("ELASTICSEARCH_URL") {
            debug!("ELASTICSEARCH_URL overridden from environment");
            self.elasticsearch_url = url;
        }
        if let Some(index) = lookup("ELASTICSEARCH_INDEX") {
            debug!("ELASTICSEARCH_INDEX overridden from environment");
            self.elasticsearch_index = index;
        }
    }

    /// Both the backend URL and the index name are required.
    pub fn validate(&self) -> Result<()> {
        if self.elasticsearch_url.trim().is_empty() {
            return Err(Error::Config("ELASTICSEARCH_URL is not set".into()));
        }
        if self.elasticsearch_index.trim().is_empty() {
            return Err(Error::Config("ELASTICSEARCH_INDEX is not set".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "ELASTICSEARCH_URL": "https://es.internal:9200",
        "ELASTICSEARCH_INDEX": "archive",
        "TOKENS": [
            {"token": "reader", "role": "user"},
            {"token": "root", "role": "admin"}
        ]
    }"#;

    #[test]
    fn test_parse_legacy_layout() {
        let config = GatewayConfig::from_json(SAMPLE).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.elasticsearch_url, "https://es.internal:9200");
        assert_eq!(config.elasticsearch_index, "archive");
        assert!(config.elasticsearch_username.is_none());
        let roles: Vec<(&str, Role)> = config
            .tokens
            .iter()
            .map(|t| (t.token.as_str(), t.role))
            .collect();
        assert_eq!(roles, vec![("reader", Role::User), ("root", Role::Admin)]);
    }

    #[test]
    fn test_overrides() {
        let mut config = GatewayConfig::from_json(SAMPLE).unwrap();
        config.apply_overrides(|key| match key {
            "PORT" => Some("8080".into()),
            "ELASTICSEARCH_INDEX" => Some("archive-v2".into()),
            _ => None,
        });
        assert_eq!(config.port, 8080);
        assert_eq!(config.elasticsearch_index, "archive-v2");
        assert_eq!(config.elasticsearch_url, "https://es.internal:9200");
    }

    #[test]
    fn test_unparseable_port_is_ignored() {
        let mut config = GatewayConfig::from_json(SAMPLE).unwrap();
        config.apply_overrides(|key| (key == "PORT").then(|| "not-a-port".to_string()));
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_missing_index_rejected() {
        let config = GatewayConfig::from_json(r#"{"ELASTICSEARCH_URL": "http://x"}"#).unwrap();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let config = GatewayConfig::load(file.path()).unwrap();
        assert_eq!(config.tokens.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = GatewayConfig::load(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_role_ordering() {
        assert!(Role::Admin > Role::User);
    }
}
