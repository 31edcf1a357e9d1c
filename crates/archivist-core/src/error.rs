//! Error types for Archivist.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request content rejected before anything is sent to the backend.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The search backend answered with a non-success status.
    #[error("Backend error: {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
