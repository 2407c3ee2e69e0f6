use anyhow::{bail, Result};

use super::openapi::{flags, ObjectField, ScalarKind, SchemaKind, SchemaNode};
use super::overrides::SchemaOverrides;

// ─── Attribute Vocabulary ───────────────────────────────────────────────────

/// Attribute types in the orchestrator's schema vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeType {
    String,
    Int64,
    Bool,
    List(Box<AttributeType>),
    Map(Box<AttributeType>),
    Nested(Vec<Attribute>),
}

/// Plan-modifier hints attached during projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanModifierHint {
    UseStateForUnknown,
    RequiresReplace,
}

/// One attribute of the projected schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub ty: AttributeType,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    pub identifier: bool,
    pub description: Option<String>,
    pub pattern: Option<String>,
    pub plan_modifiers: Vec<PlanModifierHint>,
}

/// Which projection to emit: managed resources get plan modifiers and
/// user-writable attributes; data sources are read-only apart from
/// identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Resource,
    DataSource,
}

// ─── Projection ─────────────────────────────────────────────────────────────

/// Project an object schema into the orchestrator attribute tree.
pub fn project(
    root: &SchemaNode,
    view: View,
    overrides: &SchemaOverrides,
) -> Result<Vec<Attribute>> {
    let SchemaKind::Object { fields, additional } = &root.kind else {
        bail!("only object schemas can be projected");
    };
    if additional.is_some() {
        bail!("the root schema must enumerate its properties");
    }
    project_fields(fields, view, overrides, "")
}

fn project_fields(
    fields: &[ObjectField],
    view: View,
    overrides: &SchemaOverrides,
    parent_path: &str,
) -> Result<Vec<Attribute>> {
    let mut attributes = Vec::new();
    for field in fields {
        // A property without an exposed name is not part of the plugin schema.
        let Some(name) = field.schema.tf_name.clone() else {
            continue;
        };
        let path = if parent_path.is_empty() {
            field.property.clone()
        } else {
            format!("{}.{}", parent_path, field.property)
        };
        let node = apply_overrides(&field.schema, overrides, &path);
        let ty = attribute_type(&node, view, overrides, &path)?;
        attributes.push(build_attribute(name, ty, field.required, &node, view));
    }
    Ok(attributes)
}

fn apply_overrides(node: &SchemaNode, overrides: &SchemaOverrides, path: &str) -> SchemaNode {
    let mut node = node.clone();
    if let Some(replacement) = overrides.lookup(path) {
        if let Some(description) = &replacement.description {
            node.description = Some(description.clone());
        }
        if let Some(pattern) = &replacement.pattern {
            node.pattern = Some(pattern.clone());
        }
    }
    node
}

fn attribute_type(
    node: &SchemaNode,
    view: View,
    overrides: &SchemaOverrides,
    path: &str,
) -> Result<AttributeType> {
    Ok(match &node.kind {
        SchemaKind::Scalar(ScalarKind::String) => AttributeType::String,
        SchemaKind::Scalar(ScalarKind::Integer) => AttributeType::Int64,
        SchemaKind::Scalar(ScalarKind::Boolean) => AttributeType::Bool,
        SchemaKind::Array(element) => {
            AttributeType::List(Box::new(attribute_type(element, view, overrides, path)?))
        }
        SchemaKind::Object { fields, additional } => match additional {
            Some(element) => {
                AttributeType::Map(Box::new(attribute_type(element, view, overrides, path)?))
            }
            None => AttributeType::Nested(project_fields(fields, view, overrides, path)?),
        },
    })
}

fn build_attribute(
    name: String,
    ty: AttributeType,
    listed_required: bool,
    node: &SchemaNode,
    view: View,
) -> Attribute {
    let read_only = node.has_flag(flags::READ_ONLY);
    let identifier = node.has_flag(flags::IDENTIFIER);
    let immutable = node.has_flag(flags::IMMUTABLE);

    let mut attribute = Attribute {
        name,
        ty,
        required: false,
        optional: false,
        computed: false,
        sensitive: node.has_flag(flags::SENSITIVE),
        identifier,
        description: node.description.clone(),
        pattern: node.pattern.clone(),
        plan_modifiers: Vec::new(),
    };

    match view {
        View::Resource => {
            if read_only {
                attribute.computed = true;
            } else if listed_required {
                attribute.required = true;
            } else {
                // Optional-and-computed so a null plan falls back to the
                // prior state instead of clearing server-populated values.
                attribute.optional = true;
                attribute.computed = true;
                attribute
                    .plan_modifiers
                    .push(PlanModifierHint::UseStateForUnknown);
            }
            if immutable {
                attribute
                    .plan_modifiers
                    .push(PlanModifierHint::RequiresReplace);
            }
        }
        View::DataSource => {
            // Identifiers select the resource; everything else is observed.
            if identifier {
                attribute.required = true;
            } else {
                attribute.computed = true;
            }
        }
    }
    attribute
}
