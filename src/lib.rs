//! In-memory item registry HTTP microservice.
//!
//! Exposes a health check and an `items` resource that supports creation
//! and listing. Items live in a process-local registry that assigns
//! sequential IDs starting at 1.
//!
//! ```text
//! GET  /health  -> 200 {"status":"ok"}
//! GET  /items   -> 200 [{"id":1,"name":"Laptop","description":null}]
//! POST /items   -> 201 {"id":2,"name":"Phone","description":"..."}
//!               -> 422 {"detail":[{"loc":["body","name"],"type":"missing",...}]}
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types and the HTTP error boundary
//! - [`registry`]: Item storage and ID assignment
//! - [`api`]: HTTP handlers, validation, routes and API docs
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod registry;
pub mod utils;

pub use config::Config;
pub use error::{Result, ServiceError};
