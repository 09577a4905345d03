//! Error types for retrieval and summarization.
//!
//! Per-strategy failures (`StrategyError`) are recoverable: the coordinator
//! swallows them, records them as `StrategyAttempt` diagnostics, and moves on
//! to the next strategy. Only `CoreError` crosses the caller boundary.

use serde::Serialize;
use thiserror::Error;

use crate::retrieve::types::StrategyTag;

/// Failure of a single retrieval strategy. Recoverable by fallback.
#[derive(Error, Debug)]
pub enum StrategyError {
    /// Credentials missing or malformed. Raised before any network I/O.
    #[error("auth: {0}")]
    Auth(String),

    /// The platform has no content for this request (HTTP 404, empty listing).
    #[error("not found: {0}")]
    NotFound(String),

    /// HTTP 429/503-class response.
    #[error("rate limited (http {status})")]
    RateLimit { status: u16 },

    /// Transport failure, including per-call timeouts.
    #[error("network: {0}")]
    Network(String),

    /// Response body did not match the expected JSON/markup shape.
    #[error("parse: {0}")]
    Parse(String),
}

/// Coarse classification of a `StrategyError`, kept in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyErrorKind {
    Auth,
    NotFound,
    RateLimit,
    Network,
    Parse,
}

impl StrategyError {
    pub fn kind(&self) -> StrategyErrorKind {
        match self {
            StrategyError::Auth(_) => StrategyErrorKind::Auth,
            StrategyError::NotFound(_) => StrategyErrorKind::NotFound,
            StrategyError::RateLimit { .. } => StrategyErrorKind::RateLimit,
            StrategyError::Network(_) => StrategyErrorKind::Network,
            StrategyError::Parse(_) => StrategyErrorKind::Parse,
        }
    }

    /// Map an HTTP status to the strategy error taxonomy.
    /// 429 and 5xx are the rate-limit/overload class Reddit actually returns
    /// when throttling unauthenticated clients.
    pub fn from_status(status: u16, context: &str) -> Self {
        match status {
            401 | 403 => StrategyError::Auth(format!("http {status} on {context}")),
            404 => StrategyError::NotFound(format!("http 404 on {context}")),
            429 | 500..=599 => StrategyError::RateLimit { status },
            _ => StrategyError::Network(format!("http {status} on {context}")),
        }
    }
}

impl From<reqwest::Error> for StrategyError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            StrategyError::Network(format!("timeout: {e}"))
        } else if e.is_decode() {
            StrategyError::Parse(e.to_string())
        } else {
            StrategyError::Network(e.to_string())
        }
    }
}

/// One entry of the coordinator's diagnostic trail.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyAttempt {
    pub tag: StrategyTag,
    pub kind: StrategyErrorKind,
    pub detail: String,
}

/// Terminal errors surfaced to the caller. Never retried internally.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Every strategy in the preferred order failed; `attempts` preserves
    /// the order in which they were tried.
    #[error("all retrieval strategies exhausted ({})", format_attempts(.attempts))]
    AllStrategiesExhausted { attempts: Vec<StrategyAttempt> },

    /// Caller misuse: malformed constraint, invalid URL, bad limit or order.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Nothing to summarize.
    #[error("no content to summarize")]
    EmptyInput,

    /// The calling context abandoned the request.
    #[error("request cancelled")]
    Cancelled,
}

fn format_attempts(attempts: &[StrategyAttempt]) -> String {
    attempts
        .iter()
        .map(|a| format!("{}: {:?}", a.tag, a.kind))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_covers_the_throttle_class() {
        assert_eq!(
            StrategyError::from_status(429, "x").kind(),
            StrategyErrorKind::RateLimit
        );
        assert_eq!(
            StrategyError::from_status(503, "x").kind(),
            StrategyErrorKind::RateLimit
        );
        assert_eq!(
            StrategyError::from_status(404, "x").kind(),
            StrategyErrorKind::NotFound
        );
        assert_eq!(
            StrategyError::from_status(403, "x").kind(),
            StrategyErrorKind::Auth
        );
        assert_eq!(
            StrategyError::from_status(301, "x").kind(),
            StrategyErrorKind::Network
        );
    }

    #[test]
    fn exhausted_error_renders_the_trail() {
        let err = CoreError::AllStrategiesExhausted {
            attempts: vec![
                StrategyAttempt {
                    tag: StrategyTag::Api,
                    kind: StrategyErrorKind::Auth,
                    detail: "no credentials".into(),
                },
                StrategyAttempt {
                    tag: StrategyTag::PublicJson,
                    kind: StrategyErrorKind::RateLimit,
                    detail: "http 429".into(),
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("api: Auth"));
        assert!(msg.contains("public_json: RateLimit"));
    }
}
