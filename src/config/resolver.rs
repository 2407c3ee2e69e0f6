use std::collections::HashMap;
use std::env;
use std::sync::OnceLock;

use anyhow::{bail, Context, Result};
use regex::Regex;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::timeouts::TimeoutPolicy;
use crate::client::RestClient;

// ─── Environment ────────────────────────────────────────────────────────────

pub const ENV_URL_BASE: &str = "NUODB_CP_URL_BASE";
pub const ENV_USER: &str = "NUODB_CP_USER";
pub const ENV_PASSWORD: &str = "NUODB_CP_PASSWORD";
pub const ENV_ALLOW_DESTRUCTIVE_REPLACE: &str = "NUODB_CP_ALLOW_DESTRUCTIVE_REPLACE";

// ─── Raw Configuration ──────────────────────────────────────────────────────

/// Explicit provider configuration. Every field falls back to the
/// corresponding environment variable when unset.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub url_base: Option<String>,
    /// `{organization}/{user}` used for HTTP basic auth.
    pub user: Option<String>,
    pub password: Option<String>,
    pub skip_verify: bool,
    /// `{resource type or "default"} → {operation → duration string}`.
    pub timeouts: HashMap<String, HashMap<String, String>>,
    pub allow_destructive_replace: Option<bool>,
}

// ─── Resolved Bundle ────────────────────────────────────────────────────────

/// Immutable bundle handed to every adapter invocation.
#[derive(Debug)]
pub struct Bundle {
    pub client: RestClient,
    pub timeouts: TimeoutPolicy,
    pub allow_destructive_replace: bool,
}

fn user_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^/]+/[^/]+$").unwrap())
}

/// Resolve explicit configuration against the environment and validate it.
/// The environment is read once here; the bundle never re-reads it.
pub fn resolve(config: ProviderConfig) -> Result<Bundle> {
    let url_base = config
        .url_base
        .or_else(|| env::var(ENV_URL_BASE).ok())
        .with_context(|| {
            format!(
                "the control plane URL must be set in the provider configuration or via {}",
                ENV_URL_BASE
            )
        })?;
    let base = Url::parse(&url_base)
        .with_context(|| format!("invalid control plane URL '{}'", url_base))?;
    if base.scheme().is_empty() || base.cannot_be_a_base() {
        bail!("control plane URL '{}' must include a scheme", url_base);
    }

    let user = config.user.or_else(|| env::var(ENV_USER).ok());
    let password = config.password.or_else(|| env::var(ENV_PASSWORD).ok());
    let credentials = match (user, password) {
        (Some(user), Some(password)) => {
            if !user_regex().is_match(&user) {
                bail!(
                    "user '{}' must have the form '{{organization}}/{{user}}'",
                    user
                );
            }
            Some((user, password))
        }
        (None, None) => None,
        (Some(_), None) => bail!("a user was supplied without a password"),
        (None, Some(_)) => bail!("a password was supplied without a user"),
    };

    let allow_destructive_replace = match config.allow_destructive_replace {
        Some(explicit) => explicit,
        None => env::var(ENV_ALLOW_DESTRUCTIVE_REPLACE)
            .map(|v| v == "true")
            .unwrap_or(false),
    };

    let timeouts = TimeoutPolicy::from_config(&config.timeouts)?;
    let client = RestClient::new(base, credentials, config.skip_verify, None)
        .context("failed to construct REST client")?;

    debug!(
        url = %url_base,
        allow_destructive_replace, "resolved provider configuration"
    );
    Ok(Bundle {
        client,
        timeouts,
        allow_destructive_replace,
    })
}
