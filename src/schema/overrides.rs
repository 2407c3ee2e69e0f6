use std::collections::HashMap;

/// Replacement description or validation pattern for one attribute.
#[derive(Debug, Clone, Default)]
pub struct AttributeOverride {
    pub description: Option<String>,
    pub pattern: Option<String>,
}

/// Per-attribute overrides consulted before projection, keyed by the dotted
/// JSON property path within the schema (e.g. `maintenance.isDisabled`).
#[derive(Debug, Clone, Default)]
pub struct SchemaOverrides {
    entries: HashMap<String, AttributeOverride>,
}

impl SchemaOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_description(mut self, path: &str, description: &str) -> Self {
        self.entry(path).description = Some(description.to_string());
        self
    }

    pub fn with_pattern(mut self, path: &str, pattern: &str) -> Self {
        self.entry(path).pattern = Some(pattern.to_string());
        self
    }

    fn entry(&mut self, path: &str) -> &mut AttributeOverride {
        self.entries.entry(path.to_string()).or_default()
    }

    pub fn lookup(&self, path: &str) -> Option<&AttributeOverride> {
        self.entries.get(path)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
