//! HTTP API module for health and item endpoints.

pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod validation;

pub use handlers::AppState;
pub use routes::create_router;
