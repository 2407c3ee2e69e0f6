use std::fmt;

use serde::Deserialize;
use thiserror::Error;

// ─── Normalized Error Codes ─────────────────────────────────────────────────

/// Closed set of error codes the control plane emits in its JSON error body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    ConcurrentUpdate,
    NotFound,
    Conflict,
    Unauthorized,
    Forbidden,
    BadRequest,
    Internal,
    /// A code string outside the closed set, preserved verbatim.
    Other(String),
}

impl ErrorCode {
    /// Classify a raw code string. Comparison is case-insensitive after
    /// stripping non-alphanumerics, so `CONCURRENT_UPDATE` and
    /// `CONCURRENTUPDATE` classify identically.
    pub fn classify(raw: &str) -> ErrorCode {
        match normalize(raw).as_str() {
            "concurrentupdate" => ErrorCode::ConcurrentUpdate,
            "notfound" => ErrorCode::NotFound,
            "conflict" => ErrorCode::Conflict,
            "unauthorized" => ErrorCode::Unauthorized,
            "forbidden" => ErrorCode::Forbidden,
            "badrequest" => ErrorCode::BadRequest,
            "internal" => ErrorCode::Internal,
            _ => ErrorCode::Other(raw.to_string()),
        }
    }
}

fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ConcurrentUpdate => "CONCURRENT_UPDATE",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::Internal => "INTERNAL",
            ErrorCode::Other(raw) => raw.as_str(),
        };
        f.write_str(s)
    }
}

// ─── Wire Error Body ────────────────────────────────────────────────────────

/// JSON body the control plane attaches to non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ErrorContent {
    pub status: Option<String>,
    pub code: Option<String>,
    pub detail: Option<String>,
}

// ─── Classified Errors ──────────────────────────────────────────────────────

/// Every failure mode of a control-plane call, classified.
#[derive(Debug, Error)]
pub enum RestError {
    /// Non-2xx response carrying the structured JSON error body.
    #[error("HTTP {status} {code}: {detail}")]
    Api {
        status: u16,
        code: ErrorCode,
        detail: String,
    },

    /// Non-2xx response whose body was not the structured JSON shape.
    /// The status line and raw body are preserved verbatim.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Connection, TLS, or timeout failure below the HTTP layer.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Client-side validation failure; nothing was sent to the server.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The control plane does not expose the DBA password rotation
    /// sub-resource. Revert the password value instead of replacing
    /// the database.
    #[error("the control plane does not support DBA password updates; revert dbaPassword to its previous value")]
    DbaPasswordUpdateUnsupported,
}

impl RestError {
    /// Build the classified error for a non-2xx response body.
    pub fn from_response(status: u16, body: &str) -> RestError {
        match serde_json::from_str::<ErrorContent>(body) {
            Ok(content) if content.code.is_some() || content.detail.is_some() => RestError::Api {
                status,
                code: ErrorCode::classify(content.code.as_deref().unwrap_or("")),
                detail: content.detail.unwrap_or_default(),
            },
            _ => RestError::Http {
                status,
                body: body.to_string(),
            },
        }
    }

    /// HTTP status of the response, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            RestError::Api { status, .. } | RestError::Http { status, .. } => Some(*status),
            RestError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The resource (or endpoint) does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// A concurrent write invalidated the resource version we sent.
    pub fn is_concurrent_update(&self) -> bool {
        matches!(
            self,
            RestError::Api {
                code: ErrorCode::ConcurrentUpdate,
                ..
            }
        )
    }

    /// The request timed out below the HTTP layer.
    pub fn is_timeout(&self) -> bool {
        matches!(self, RestError::Transport(e) if e.is_timeout())
    }

    /// 404 with an empty detail on the password sub-resource means the
    /// endpoint itself is missing, as opposed to the database being gone.
    pub fn is_dba_password_update_unsupported(&self) -> bool {
        match self {
            RestError::DbaPasswordUpdateUnsupported => true,
            RestError::Api { status, detail, .. } => *status == 404 && detail.is_empty(),
            RestError::Http { status, body } => *status == 404 && body.is_empty(),
            _ => false,
        }
    }
}
