//! Archivist — authenticated HTTP gateway in front of the archive search
//! index. Routes compile filters and tag edits into backend requests and hand
//! back the raw backend responses.

pub mod auth;
pub mod error;
pub mod routes;
pub mod state;

pub use auth::{AuthGate, TokenGate};
pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
