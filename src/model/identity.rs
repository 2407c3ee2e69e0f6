use std::sync::OnceLock;

use regex::Regex;

use crate::client::error::RestError;

/// Shape every identity component, attribute name, and label key must match.
/// This is the single client-side source of truth for name validation.
pub const NAME_PATTERN: &str = "^[a-z][a-z0-9]*$";

fn name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(NAME_PATTERN).unwrap())
}

/// Check a single identity component, attribute name, or label key.
pub fn is_valid_name(name: &str) -> bool {
    name_regex().is_match(name)
}

/// Validate a named identity component before it is sent to the server.
pub fn validate_component(kind: &str, value: &str) -> Result<(), RestError> {
    if value.is_empty() {
        return Err(RestError::InvalidArgument(format!(
            "{} must not be empty",
            kind
        )));
    }
    if !is_valid_name(value) {
        return Err(RestError::InvalidArgument(format!(
            "{} '{}' does not match {}",
            kind, value, NAME_PATTERN
        )));
    }
    Ok(())
}

/// Validate every key of a label map. Values are free-form.
pub fn validate_label_keys<'a, I>(keys: I) -> Result<(), RestError>
where
    I: IntoIterator<Item = &'a String>,
{
    for key in keys {
        validate_component("label key", key)?;
    }
    Ok(())
}

/// Split a slash-delimited identity into exactly `arity` non-empty components.
pub fn split_identity(id: &str, arity: usize) -> Result<Vec<String>, RestError> {
    let parts: Vec<&str> = id.split('/').collect();
    if parts.len() != arity {
        return Err(RestError::InvalidArgument(format!(
            "expected identity with {} components, got '{}'",
            arity, id
        )));
    }
    for part in &parts {
        if part.is_empty() {
            return Err(RestError::InvalidArgument(format!(
                "identity '{}' contains an empty component",
                id
            )));
        }
    }
    Ok(parts.into_iter().map(str::to_string).collect())
}

/// Join identity components into the canonical slash-delimited form.
pub fn join_identity(parts: &[&str]) -> String {
    parts.join("/")
}
