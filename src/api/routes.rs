//! HTTP API route definitions.

use std::any::Any;

use axum::{middleware, response::Response, routing::get, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::error;
use utoipa_swagger_ui::SwaggerUi;

use super::docs::openapi_document;
use super::handlers::{create_item, health, list_items, not_found, render_metrics, AppState};
use super::middleware::track_http_latency;
use crate::error::internal_error_response;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let docs = SwaggerUi::new("/docs").url("/openapi.json", openapi_document(&state.app_name));

    let router = Router::new()
        // Health endpoint
        .route("/health", get(health))
        // Items resource
        .route("/items", get(list_items).post(create_item))
        .route("/metrics", get(render_metrics))
        .route_layer(middleware::from_fn(track_http_latency))
        .merge(docs)
        .fallback(not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    with_error_boundary(router)
}

/// Wrap a router so any panic becomes the generic 500 response.
pub fn with_error_boundary(router: Router) -> Router {
    router.layer(CatchPanicLayer::custom(handle_panic))
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    error!(panic = %detail, "Unhandled failure while handling request");
    internal_error_response()
}
