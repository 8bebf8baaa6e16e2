//! Failure classification at the transport boundary.

use serde_json::Value;

/// Message a server puts in a 401 body when the bearer token has expired.
pub const EXPIRED_TOKEN_MESSAGE: &str = "Expired Token";

/// Why a dispatched request did not produce a successful response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The server answered with a non-2xx status.
    Http { status: u16, body: String },
    /// No HTTP response was obtained (connection refused, DNS failure, timeout, ...).
    Network(String),
}

impl TransportError {
    /// HTTP status of the server's answer, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Http { status, .. } => Some(*status),
            TransportError::Network(_) => None,
        }
    }

    /// True when the server reported `401` with `{"message": "Expired Token"}`.
    pub fn is_expired_token(&self) -> bool {
        match self {
            TransportError::Http { status: 401, body } => serde_json::from_str::<Value>(body)
                .ok()
                .and_then(|v| {
                    v.get("message")
                        .and_then(Value::as_str)
                        .map(|m| m == EXPIRED_TOKEN_MESSAGE)
                })
                .unwrap_or(false),
            _ => false,
        }
    }
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::Http { status, body } if body.is_empty() => {
                write!(f, "HTTP {}", status)
            }
            TransportError::Http { status, body } => write!(f, "HTTP {}: {}", status, body),
            TransportError::Network(msg) => write!(f, "Network error: {}", msg),
        }
    }
}

impl std::error::Error for TransportError {}
