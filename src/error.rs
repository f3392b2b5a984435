//! Error types, one enum per layer.

use thiserror::Error;

/// Errors produced by [`RateLimiter`](crate::RateLimiter) construction and
/// its bounded acquisition paths.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateLimitError {
    /// Rejected configuration. Only ever returned at construction time.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The caller's [`CancellationToken`](crate::CancellationToken) fired
    /// before a permit was granted. No permit was consumed.
    #[error("acquisition cancelled before a permit was granted")]
    Cancelled,

    /// No permit became available within the requested timeout.
    #[error("timed out waiting for a permit")]
    TimedOut,
}

/// Outcome of the cancellable and non-blocking [`GatedInvoker`](crate::GatedInvoker)
/// paths, where "never ran" must be told apart from "ran and failed".
#[derive(Debug, Error)]
pub enum GateError<E> {
    /// No permit was granted; the action never ran.
    #[error("cancelled before the action ran")]
    Cancelled,

    /// The window budget is exhausted; the action never ran.
    #[error("rate limit saturated, action not run")]
    Saturated,

    /// The action ran and failed with its own error.
    #[error(transparent)]
    Action(E),
}

impl<E> GateError<E> {
    /// Returns `true` if the protected action was invoked.
    pub fn action_ran(&self) -> bool {
        matches!(self, Self::Action(_))
    }

    /// Extracts the action's error, if the action ran.
    pub fn into_action_error(self) -> Option<E> {
        match self {
            Self::Action(e) => Some(e),
            _ => None,
        }
    }
}

/// Failures of [`DocumentClient`](crate::DocumentClient) submissions.
///
/// Every variant except `Config`, `Cancelled` and `Saturated` means the
/// submission used up a permit.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The client could not be built from its configuration.
    #[error("invalid client configuration: {0}")]
    Config(#[from] RateLimitError),

    /// The document could not be encoded as JSON.
    #[error("failed to serialize document: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status.
    #[error("endpoint returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// Cancelled while waiting for a permit; nothing was sent.
    #[error("submission cancelled before it was sent")]
    Cancelled,

    /// No permit available right now; nothing was sent.
    #[error("submission rate limit saturated")]
    Saturated,
}

impl From<GateError<ClientError>> for ClientError {
    fn from(err: GateError<ClientError>) -> Self {
        match err {
            GateError::Cancelled => Self::Cancelled,
            GateError::Saturated => Self::Saturated,
            GateError::Action(e) => e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_error_distinguishes_outcomes() {
        let cancelled: GateError<String> = GateError::Cancelled;
        assert!(!cancelled.action_ran());
        assert!(cancelled.into_action_error().is_none());

        let failed: GateError<String> = GateError::Action("boom".to_string());
        assert!(failed.action_ran());
        assert_eq!(failed.into_action_error().as_deref(), Some("boom"));
    }

    #[test]
    fn test_display() {
        let err = RateLimitError::InvalidArgument("limit must be positive");
        assert_eq!(err.to_string(), "invalid argument: limit must be positive");

        let err: GateError<std::io::Error> =
            GateError::Action(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert_eq!(err.to_string(), "disk");

        let err = ClientError::Status {
            status: 503,
            body: "busy".to_string(),
        };
        assert_eq!(err.to_string(), "endpoint returned status 503: busy");
    }

    #[test]
    fn test_gate_error_flattens_into_client_error() {
        let err: ClientError = GateError::<ClientError>::Cancelled.into();
        assert!(matches!(err, ClientError::Cancelled));

        let err: ClientError = GateError::Action(ClientError::Status {
            status: 400,
            body: String::new(),
        })
        .into();
        assert!(matches!(err, ClientError::Status { status: 400, .. }));
    }
}
