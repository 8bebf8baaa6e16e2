use crate::http::TransportError;

/// Why [`Requester::send`](super::Requester::send) failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The server reported an expired token and no fresh one could be used.
    /// Carries the server's 401 body.
    AuthExpired { body: String },
    /// Any other non-2xx answer. `body` is the server's body, or a status line
    /// when the server sent none.
    Http { status: u16, body: String },
    /// No HTTP response was obtained.
    Transport(String),
    /// The response body did not decode into the requested shape.
    Decode(String),
    /// A header name or value could not be used.
    InvalidHeader(String),
}

impl RequestError {
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::AuthExpired { .. } => Some(401),
            RequestError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The server-provided detail, verbatim, or the failure message.
    pub fn detail(&self) -> &str {
        match self {
            RequestError::AuthExpired { body } | RequestError::Http { body, .. } => body,
            RequestError::Transport(msg)
            | RequestError::Decode(msg)
            | RequestError::InvalidHeader(msg) => msg,
        }
    }
}

impl From<TransportError> for RequestError {
    fn from(error: TransportError) -> Self {
        let expired = error.is_expired_token();
        match error {
            TransportError::Http { body, .. } if expired => RequestError::AuthExpired { body },
            TransportError::Http { status, body } if body.is_empty() => RequestError::Http {
                status,
                body: format!("Request failed with status code {}", status),
            },
            TransportError::Http { status, body } => RequestError::Http { status, body },
            TransportError::Network(msg) => RequestError::Transport(msg),
        }
    }
}

impl std::fmt::Display for RequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestError::AuthExpired { body } => {
                write!(f, "Authentication expired and could not be refreshed: {}", body)
            }
            RequestError::Http { status, body } => write!(f, "HTTP {}: {}", status, body),
            RequestError::Transport(msg) => write!(f, "An error occurred: {}", msg),
            RequestError::Decode(msg) => write!(f, "Failed to decode response: {}", msg),
            RequestError::InvalidHeader(msg) => write!(f, "Invalid header: {}", msg),
        }
    }
}

impl std::error::Error for RequestError {}
