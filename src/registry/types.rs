//! Item-related types.

use serde::{Deserialize, Serialize};
use strum::Display;
use utoipa::ToSchema;

/// Registry-assigned item identifier.
pub type ItemId = u64;

/// Maximum length of an item name, in characters.
pub const NAME_MAX_LENGTH: usize = 100;

/// Minimum length of an item name, in characters.
pub const NAME_MIN_LENGTH: usize = 1;

/// Maximum length of an item description, in characters.
pub const DESCRIPTION_MAX_LENGTH: usize = 500;

/// A stored item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    /// Item ID.
    #[schema(value_type = u64, minimum = 1)]
    pub id: ItemId,
    /// Item name.
    pub name: String,
    /// Item description.
    pub description: Option<String>,
}

/// Validated input for item creation.
///
/// Values of this type are only produced by the request boundary, so the
/// registry stores them without re-checking field constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct NewItem {
    /// Item name (1-100 characters).
    #[schema(min_length = 1, max_length = 100)]
    pub name: String,
    /// Item description (at most 500 characters).
    #[schema(max_length = 500)]
    pub description: Option<String>,
}

/// Service health status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HealthStatus {
    /// Service is up.
    #[default]
    Ok,
}
