use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

// ─── Raw Document ───────────────────────────────────────────────────────────

/// The subset of an OpenAPI 3 document this crate consumes: named object
/// schemas under `components.schemas`, with the custom `x-tf-*` extensions.
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub components: Components,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Components {
    pub schemas: BTreeMap<String, RawSchema>,
}

/// A schema node exactly as it appears in the document, before `$ref`
/// resolution.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSchema {
    #[serde(rename = "type")]
    pub schema_type: Option<String>,
    pub properties: BTreeMap<String, RawSchema>,
    pub required: Vec<String>,
    pub items: Option<Box<RawSchema>>,
    #[serde(rename = "additionalProperties")]
    pub additional_properties: Option<Box<RawSchema>>,
    #[serde(rename = "readOnly")]
    pub read_only: bool,
    pub description: Option<String>,
    pub pattern: Option<String>,
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    #[serde(rename = "x-tf-name")]
    pub tf_name: Option<String>,
    #[serde(rename = "x-tf-identifier")]
    pub tf_identifier: bool,
    #[serde(rename = "x-tf-sensitive")]
    pub tf_sensitive: bool,
    #[serde(rename = "x-immutable")]
    pub immutable: bool,
}

impl Document {
    pub fn parse_yaml(text: &str) -> Result<Document> {
        serde_yaml::from_str(text).context("failed to parse OpenAPI document")
    }

    /// Resolve a named schema into its reference-free form.
    pub fn resolve(&self, name: &str) -> Result<SchemaNode> {
        let raw = self
            .components
            .schemas
            .get(name)
            .with_context(|| format!("schema '{}' not found in OpenAPI document", name))?;
        self.resolve_node(raw, &mut vec![name.to_string()])
    }

    fn resolve_node(&self, raw: &RawSchema, stack: &mut Vec<String>) -> Result<SchemaNode> {
        if let Some(reference) = &raw.reference {
            let target = reference
                .strip_prefix("#/components/schemas/")
                .with_context(|| format!("unsupported schema reference '{}'", reference))?;
            if stack.iter().any(|seen| seen == target) {
                bail!("cyclic schema reference through '{}'", target);
            }
            let resolved = self
                .components
                .schemas
                .get(target)
                .with_context(|| format!("schema '{}' not found in OpenAPI document", target))?;
            stack.push(target.to_string());
            let mut node = self.resolve_node(resolved, stack)?;
            stack.pop();
            // Annotations on the referencing property win over the target's.
            node.flags |= annotation_flags(raw);
            if raw.tf_name.is_some() {
                node.tf_name = raw.tf_name.clone();
            }
            if raw.description.is_some() {
                node.description = raw.description.clone();
            }
            return Ok(node);
        }

        let kind = match raw.schema_type.as_deref() {
            Some("string") => SchemaKind::Scalar(ScalarKind::String),
            Some("integer") => SchemaKind::Scalar(ScalarKind::Integer),
            Some("boolean") => SchemaKind::Scalar(ScalarKind::Boolean),
            Some("array") => {
                let items = raw
                    .items
                    .as_deref()
                    .context("array schema without items")?;
                SchemaKind::Array(Box::new(self.resolve_node(items, stack)?))
            }
            Some("object") | None => {
                if let Some(additional) = raw.additional_properties.as_deref() {
                    SchemaKind::Object {
                        fields: Vec::new(),
                        additional: Some(Box::new(self.resolve_node(additional, stack)?)),
                    }
                } else {
                    let mut fields = Vec::new();
                    for (property, child) in &raw.properties {
                        fields.push(ObjectField {
                            property: property.clone(),
                            required: raw.required.iter().any(|r| r == property),
                            schema: self.resolve_node(child, stack)?,
                        });
                    }
                    SchemaKind::Object {
                        fields,
                        additional: None,
                    }
                }
            }
            Some(other) => bail!("unsupported OpenAPI type '{}'", other),
        };

        Ok(SchemaNode {
            kind,
            flags: annotation_flags(raw),
            tf_name: raw.tf_name.clone(),
            description: raw.description.clone(),
            pattern: raw.pattern.clone(),
        })
    }
}

// ─── Resolved Schema ────────────────────────────────────────────────────────

/// Annotation flags carried by a resolved schema node.
pub mod flags {
    pub const IDENTIFIER: u8 = 1 << 0;
    pub const SENSITIVE: u8 = 1 << 1;
    pub const IMMUTABLE: u8 = 1 << 2;
    pub const READ_ONLY: u8 = 1 << 3;
}

fn annotation_flags(raw: &RawSchema) -> u8 {
    let mut value = 0;
    if raw.tf_identifier {
        value |= flags::IDENTIFIER;
    }
    if raw.tf_sensitive {
        value |= flags::SENSITIVE;
    }
    if raw.immutable {
        value |= flags::IMMUTABLE;
    }
    if raw.read_only {
        value |= flags::READ_ONLY;
    }
    value
}

/// A reference-free schema node.
#[derive(Debug, Clone)]
pub struct SchemaNode {
    pub kind: SchemaKind,
    pub flags: u8,
    /// Attribute name to expose; a property without one is skipped.
    pub tf_name: Option<String>,
    pub description: Option<String>,
    pub pattern: Option<String>,
}

impl SchemaNode {
    pub fn has_flag(&self, flag: u8) -> bool {
        self.flags & flag != 0
    }
}

#[derive(Debug, Clone)]
pub enum SchemaKind {
    Scalar(ScalarKind),
    Array(Box<SchemaNode>),
    Object {
        fields: Vec<ObjectField>,
        additional: Option<Box<SchemaNode>>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    String,
    Integer,
    Boolean,
}

/// A named property of an object schema.
#[derive(Debug, Clone)]
pub struct ObjectField {
    pub property: String,
    pub required: bool,
    pub schema: SchemaNode,
}
