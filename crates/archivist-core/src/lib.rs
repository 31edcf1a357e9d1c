//! Archivist Core — gateway configuration, access roles, shared error type.

pub mod config;
pub mod error;

pub use config::{ApiToken, GatewayConfig, Role};
pub use error::{Error, Result};
