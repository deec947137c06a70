//! # Checkmark API
//!
//! HTTP API for the Checkmark todo service.
//!
//! Features:
//! - Axum-based web server, one listener per deployment
//! - Mock bearer-token authentication behind a swappable credential policy
//! - Item-style (`/items`) and todo-style (`/todos`) route sets, each keeping
//!   its own status codes and messages
//! - Reset hook for end-to-end test setup
//! - Request id, tracing, CORS, timeout and body-limit middleware
//! - Graceful shutdown

pub mod auth;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod profile;
pub mod routes;
pub mod server;
pub mod state;

pub use auth::{AuthGuard, CredentialPolicy, StaticCredentials};
pub use error::{ApiError, ApiResult};
pub use profile::{Deployment, Profile};
pub use server::{CheckmarkServer, ServerConfig};
pub use state::AppState;
