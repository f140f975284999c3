//! HTTP API handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, response::Response, Json};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

use super::validation::{ValidatedItem, ValidationErrorBody};
use crate::config::DEFAULT_APP_NAME;
use crate::error::{ApiError, ErrorDetail};
use crate::metrics;
use crate::registry::{HealthStatus, Item, ItemRegistry, NewItem};

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Item storage.
    pub registry: Arc<ItemRegistry>,
    /// Prometheus handle, if a recorder was installed.
    pub metrics: Option<PrometheusHandle>,
    /// Service name shown in the API docs.
    pub app_name: String,
}

impl AppState {
    /// Create new app state with an empty registry.
    pub fn new() -> Self {
        Self::with_registry(Arc::new(ItemRegistry::new()))
    }

    /// Create app state around an existing registry.
    pub fn with_registry(registry: Arc<ItemRegistry>) -> Self {
        Self {
            registry,
            metrics: None,
            app_name: DEFAULT_APP_NAME.to_string(),
        }
    }

    /// Attach a Prometheus handle so `/metrics` can render it.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Set the service name.
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service health status.
    pub status: HealthStatus,
}

/// Health check handler - always returns 200.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = state.registry.health();
    info!(%status, "Health check requested");
    Json(HealthResponse { status })
}

/// List all items in creation order.
#[utoipa::path(
    get,
    path = "/items",
    tag = "items",
    responses(
        (status = 200, description = "All items", body = Vec<Item>),
        (status = 500, description = "Internal error", body = ErrorDetail)
    )
)]
pub async fn list_items(State(state): State<AppState>) -> Result<Json<Vec<Item>>, ApiError> {
    let items = state.registry.list_items()?;
    info!(count = items.len(), "Get items requested");
    Ok(Json(items))
}

/// Create an item and return it with its assigned ID.
#[utoipa::path(
    post,
    path = "/items",
    tag = "items",
    request_body = NewItem,
    responses(
        (status = 201, description = "Item created", body = Item),
        (status = 422, description = "Invalid item payload", body = ValidationErrorBody),
        (status = 500, description = "Internal error", body = ErrorDetail)
    )
)]
pub async fn create_item(
    State(state): State<AppState>,
    ValidatedItem(new_item): ValidatedItem,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let item = state.registry.create_item(new_item)?;
    metrics::inc_items_created();
    Ok((StatusCode::CREATED, Json(item)))
}

/// Prometheus exposition, or 404 when metrics are disabled.
pub async fn render_metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => not_found().await.into_response(),
    }
}

/// Fallback for unknown routes.
pub async fn not_found() -> (StatusCode, Json<ErrorDetail>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorDetail {
            detail: "Not Found".to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_reports_ok() {
        let Json(response) = health(State(AppState::new())).await;
        assert_eq!(response.status, HealthStatus::Ok);
    }

    #[tokio::test]
    async fn create_then_list_shares_state() {
        let state = AppState::new();
        let new_item = NewItem {
            name: "Phone".to_string(),
            description: None,
        };

        let (status, Json(created)) = create_item(State(state.clone()), ValidatedItem(new_item))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.id, 1);

        let Json(items) = list_items(State(state)).await.unwrap();
        assert_eq!(items, vec![created]);
    }

    #[test]
    fn app_state_builders() {
        let state = AppState::new().with_app_name("inventory");
        assert_eq!(state.app_name, "inventory");
        assert!(state.metrics.is_none());
    }
}
