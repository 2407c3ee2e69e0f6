use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use regex::Regex;

use crate::model::ResourceType;

/// Default wait for a resource to become ready after create or update.
pub const READINESS_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Default wait for a resource to disappear after delete.
pub const DELETION_TIMEOUT: Duration = Duration::from_secs(60);

/// Timeout-policy key that applies when no per-type entry exists.
pub const DEFAULT_KEY: &str = "default";

// ─── Operations ─────────────────────────────────────────────────────────────

/// The driver operations a timeout can be configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }

    fn library_default(&self) -> Duration {
        match self {
            Operation::Create | Operation::Update => READINESS_TIMEOUT,
            Operation::Delete => DELETION_TIMEOUT,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Operation::Create),
            "update" => Ok(Operation::Update),
            "delete" => Ok(Operation::Delete),
            other => Err(format!("unknown operation '{}'", other)),
        }
    }
}

// ─── Duration Grammar ───────────────────────────────────────────────────────

fn duration_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+)(ms|s|m|h)").unwrap())
}

/// Parse a duration string such as `250ms`, `30s`, `5m`, `1h`, or `1m30s`.
/// A bare `0` is accepted and disables the wait it is configured for.
pub fn parse_duration(input: &str) -> Result<Duration> {
    if input == "0" {
        return Ok(Duration::ZERO);
    }
    let mut rest = input;
    let mut total = Duration::ZERO;
    while !rest.is_empty() {
        let caps = duration_regex()
            .captures(rest)
            .with_context(|| format!("invalid duration '{}'", input))?;
        let value: u64 = caps[1]
            .parse()
            .with_context(|| format!("invalid duration '{}'", input))?;
        let unit = match &caps[2] {
            "ms" => Duration::from_millis(1),
            "s" => Duration::from_secs(1),
            "m" => Duration::from_secs(60),
            "h" => Duration::from_secs(3600),
            _ => unreachable!(),
        };
        total += unit * u32::try_from(value).context("duration value too large")?;
        rest = &rest[caps[0].len()..];
    }
    if input.is_empty() {
        bail!("invalid duration: empty string");
    }
    Ok(total)
}

// ─── Policy ─────────────────────────────────────────────────────────────────

/// Per-resource-type, per-operation timeout policy.
///
/// Resolution order: the per-type entry, then the `default` entry, then the
/// library default. A configured zero means "skip the wait entirely".
#[derive(Debug, Clone, Default)]
pub struct TimeoutPolicy {
    entries: HashMap<String, HashMap<Operation, Duration>>,
}

impl TimeoutPolicy {
    /// Validate and build a policy from raw configuration strings.
    /// Keys other than the known resource types and `default` are rejected.
    pub fn from_config(raw: &HashMap<String, HashMap<String, String>>) -> Result<Self> {
        let mut entries = HashMap::new();
        for (type_key, ops) in raw {
            if type_key != DEFAULT_KEY && ResourceType::from_str(type_key).is_err() {
                bail!(
                    "invalid timeout configuration: unknown resource type '{}'",
                    type_key
                );
            }
            let mut resolved = HashMap::new();
            for (op_key, value) in ops {
                let op = Operation::from_str(op_key).map_err(|e| {
                    anyhow::anyhow!("invalid timeout configuration for '{}': {}", type_key, e)
                })?;
                let duration = parse_duration(value).with_context(|| {
                    format!("invalid timeout for '{}.{}'", type_key, op_key)
                })?;
                resolved.insert(op, duration);
            }
            entries.insert(type_key.clone(), resolved);
        }
        Ok(Self { entries })
    }

    /// Resolve the timeout for one operation on one resource type.
    pub fn resolve(&self, resource_type: ResourceType, operation: Operation) -> Duration {
        for key in [resource_type.as_str(), DEFAULT_KEY] {
            if let Some(duration) = self.entries.get(key).and_then(|ops| ops.get(&operation)) {
                return *duration;
            }
        }
        operation.library_default()
    }
}
