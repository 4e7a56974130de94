//! Error type returned by every fallible operation in the crate.

/// Errors that can occur while requesting and decoding a JSON resource.
///
/// Each variant carries a human-readable `reason` meant to be surfaced as-is
/// in logs or user-facing messages.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The transport could not complete the request (DNS, connect, TLS,
    /// timeout, cancellation, or a broken body stream).
    #[error("Network error: {reason}")]
    Network { reason: String },
    /// The server answered with a status outside `200..=299`.
    #[error("Invalid response: {reason}")]
    InvalidResponse {
        call_context: String,
        status: u16,
        reason: String,
    },
    /// The body could not be decoded into the requested type.
    #[error("Parse error: {reason}")]
    Parse { reason: String },
}

impl ApiError {
    pub(crate) fn network(err: impl std::fmt::Display) -> Self {
        ApiError::Network {
            reason: err.to_string(),
        }
    }

    /// The human-readable reason, without the variant prefix.
    pub fn reason(&self) -> &str {
        match self {
            ApiError::Network { reason }
            | ApiError::InvalidResponse { reason, .. }
            | ApiError::Parse { reason } => reason,
        }
    }

    /// The logical call name, for errors raised after a response arrived.
    pub fn call_context(&self) -> Option<&str> {
        match self {
            ApiError::InvalidResponse { call_context, .. } => Some(call_context),
            _ => None,
        }
    }
}
