//! OpenAPI document for the HTTP API.

use utoipa::OpenApi;

use super::handlers::{self, HealthResponse};
use super::validation::{FieldError, ValidationErrorBody, ValidationKind};
use crate::error::ErrorDetail;
use crate::registry::{HealthStatus, Item, NewItem};

#[derive(OpenApi)]
#[openapi(
    info(description = "In-memory item registry with health and items endpoints"),
    paths(handlers::health, handlers::list_items, handlers::create_item),
    components(schemas(
        Item,
        NewItem,
        HealthResponse,
        HealthStatus,
        ErrorDetail,
        ValidationErrorBody,
        FieldError,
        ValidationKind
    )),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "items", description = "Item management endpoints")
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI document titled with the service name.
pub fn openapi_document(app_name: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.info.title = app_name.to_string();
    doc.info.version = env!("CARGO_PKG_VERSION").to_string();
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = openapi_document("item-registry");
        assert_eq!(doc.info.title, "item-registry");

        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        assert!(paths.contains(&&"/health".to_string()));
        assert!(paths.contains(&&"/items".to_string()));
    }
}
