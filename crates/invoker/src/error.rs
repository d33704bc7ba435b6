use thiserror::Error;

/// Errors raised while validating, building, or executing a webhook call.
///
/// Every variant carries the message that is reported to the host; nothing
/// is retried or recovered locally.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Required input was missing or invalid. Raised before any network I/O.
    #[error("{0}")]
    Configuration(String),

    /// The HTTP client did not obtain a response at all. The client's
    /// message is surfaced verbatim.
    #[error("{0}")]
    Transport(String),

    /// A response was received but its status was outside 200-299.
    ///
    /// `body` is the JSON serialization of the decoded response body.
    #[error("Request failed [{status}]: {body}")]
    Request { status: u16, body: String },

    /// A response advertised as JSON could not be parsed.
    #[error("invalid JSON response body: {0}")]
    Decode(String),

    /// The payload or an error body could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The host aborted the invocation while the request was in flight.
    #[error("invocation cancelled")]
    Cancelled,
}

impl WebhookError {
    /// Returns `true` if the failure happened before any network activity.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// HTTP status of the response that caused the failure, if one arrived.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for WebhookError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
