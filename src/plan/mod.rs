//! Plan modifiers applied by the orchestrator before a write is attempted.

use serde_json::Value;

// ─── Attribute Values ───────────────────────────────────────────────────────

/// A single attribute value as seen during planning. `Unknown` is a value
/// the orchestrator has not computed yet (distinct from an explicit null).
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Unknown,
    Null,
    Known(Value),
}

impl AttrValue {
    pub fn is_unknown(&self) -> bool {
        matches!(self, AttrValue::Unknown)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null)
    }
}

// ─── Diagnostics ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// User-visible message surfaced through the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
}

impl Diagnostic {
    pub fn warning(summary: &str, detail: String) -> Self {
        Self {
            severity: Severity::Warning,
            summary: summary.to_string(),
            detail,
        }
    }

    pub fn error(summary: &str, detail: String) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.to_string(),
            detail,
        }
    }
}

// ─── Modifiers ──────────────────────────────────────────────────────────────

/// Copy the prior state value into the plan when the planned value is
/// unknown. Prevents spurious diffs on optional-computed attributes that the
/// server fills in. Skipped when the configuration value is itself unknown,
/// since the eventual configuration may legitimately change the value.
pub fn use_state_for_unknown(state: &AttrValue, plan: &mut AttrValue, config: &AttrValue) {
    if plan.is_unknown() && !state.is_unknown() && !state.is_null() && !config.is_unknown() {
        *plan = state.clone();
    }
}

/// Outcome of the `requires_replace` modifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplaceDecision {
    /// True when the orchestrator should destroy and recreate the resource.
    pub requires_replace: bool,
    pub diagnostic: Option<Diagnostic>,
}

impl ReplaceDecision {
    fn unchanged() -> Self {
        Self {
            requires_replace: false,
            diagnostic: None,
        }
    }
}

/// Guarded replace-on-change for immutable attributes.
///
/// When the attribute differs between state and plan and destructive replace
/// is not allowed, a warning is emitted and the plan is left in place; the
/// subsequent PUT fails server-side, giving the user a clear second chance.
pub fn requires_replace(
    attribute: &str,
    state: &AttrValue,
    plan: &AttrValue,
    allow_destructive_replace: bool,
) -> ReplaceDecision {
    let (AttrValue::Known(prior), AttrValue::Known(planned)) = (state, plan) else {
        return ReplaceDecision::unchanged();
    };
    if prior == planned {
        return ReplaceDecision::unchanged();
    }
    if allow_destructive_replace {
        return ReplaceDecision {
            requires_replace: true,
            diagnostic: None,
        };
    }
    ReplaceDecision {
        requires_replace: false,
        diagnostic: Some(Diagnostic::warning(
            "Immutable Attribute Change",
            format!(
                "The attribute '{}' is immutable and cannot be changed from {} to {} \
                 without replacing the resource. Set {} to 'true' to allow destructive \
                 replacement.",
                attribute,
                prior,
                planned,
                crate::config::resolver::ENV_ALLOW_DESTRUCTIVE_REPLACE
            ),
        )),
    }
}
