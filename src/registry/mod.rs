//! Item registry: in-memory storage and ID assignment.
//!
//! This module handles:
//! - Item and health types
//! - The lock-guarded item store
//! - The monotonic ID sequence

pub mod store;
pub mod types;

pub use store::{IdSequence, ItemRegistry};
pub use types::{HealthStatus, Item, ItemId, NewItem};
