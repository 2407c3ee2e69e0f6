pub mod openapi;
pub mod overrides;
pub mod projector;

use anyhow::Result;

pub use openapi::{Document, SchemaNode};
pub use overrides::SchemaOverrides;
pub use projector::{project, Attribute, AttributeType, PlanModifierHint, View};

/// The OpenAPI document shipped with the crate, covering the object schemas
/// of every managed resource type.
pub const EMBEDDED_OPENAPI: &str = include_str!("../../assets/openapi.yaml");

/// Parse the embedded OpenAPI document.
pub fn embedded_document() -> Result<Document> {
    Document::parse_yaml(EMBEDDED_OPENAPI)
}
