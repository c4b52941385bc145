use serde::{Deserialize, Serialize};

/// Coarse classification of a [`ProviderError`].
///
/// Callers that only need to decide *what kind* of failure happened (bad
/// credentials, missing zone, bad arguments, remote failure, unreadable
/// response) should branch on this instead of on individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Credential missing or rejected.
    Authentication,
    /// Zone or record absent.
    NotFound,
    /// Caller supplied an unusable combination of arguments, or the provider
    /// is in the wrong lifecycle state.
    Configuration,
    /// Any other failed exchange with the vendor API.
    Transport,
    /// Response (or request) body could not be (de)serialized.
    Decoding,
}

/// Unified error type for all DNS provider operations.
///
/// Most variants include a `provider` field identifying which provider produced the error,
/// plus variant-specific context. All variants are serializable for structured error reporting.
///
/// No variant is ever retried by this crate. Retry policy belongs to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// The provided credentials are missing, invalid or expired.
    #[error("[{provider}] Invalid credentials{}", suffix(.raw_message.as_deref()))]
    InvalidCredentials {
        /// Provider that produced the error.
        provider: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The zone for the configured domain does not exist at the provider.
    #[error("[{provider}] Domain '{domain}' not found{}", suffix(.raw_message.as_deref()))]
    DomainNotFound {
        /// Provider that produced the error.
        provider: String,
        /// Domain name that was not found.
        domain: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The specified DNS record was not found.
    #[error("[{provider}] Record '{record_id}' not found")]
    RecordNotFound {
        /// Provider that produced the error.
        provider: String,
        /// Identifier (or `type/name` description) of the missing record.
        record_id: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The caller did not supply a usable combination of arguments.
    #[error("Invalid arguments for {operation}: {detail}")]
    InvalidArguments {
        /// Operation being prepared (`update_record`, `delete_record`, ...).
        operation: String,
        /// What is missing or wrong.
        detail: String,
    },

    /// A single argument was rejected by the provider implementation.
    #[error("[{provider}] Invalid parameter '{param}': {detail}")]
    InvalidParameter {
        /// Provider that produced the error.
        provider: String,
        /// Name of the invalid parameter.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// More than one record matched where exactly one was required.
    #[error("[{provider}] {candidates} records match {selector}, expected exactly one")]
    AmbiguousRecord {
        /// Provider that produced the error.
        provider: String,
        /// Human readable description of the selector.
        selector: String,
        /// Number of matching records.
        candidates: usize,
    },

    /// A record operation was attempted in the wrong lifecycle state.
    #[error("[{provider}] Cannot {operation} while provider is {state}")]
    InvalidState {
        /// Provider that produced the error.
        provider: String,
        /// Operation that was attempted.
        operation: String,
        /// Current lifecycle state.
        state: String,
    },

    /// The vendor API answered with a non-2xx status.
    #[error("[{provider}] HTTP {status}: {raw_message}")]
    Transport {
        /// Provider that produced the error.
        provider: String,
        /// HTTP status code.
        status: u16,
        /// Vendor error code parsed from the body, if any.
        raw_code: Option<String>,
        /// Vendor error message, or the raw body when it was not structured.
        raw_message: String,
        /// Raw response body.
        body: String,
    },

    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    #[error("[{provider}] Network error: {detail}")]
    NetworkError {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out at the transport layer.
    #[error("[{provider}] Request timeout: {detail}")]
    Timeout {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// Failed to parse the provider's API response.
    #[error("[{provider}] Parse error: {detail}")]
    ParseError {
        /// Provider that produced the error.
        provider: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to serialize a request body.
    #[error("[{provider}] Serialization error: {detail}")]
    SerializationError {
        /// Provider that produced the error.
        provider: String,
        /// Details about the serialization failure.
        detail: String,
    },
}

fn suffix(raw_message: Option<&str>) -> String {
    raw_message.map(|m| format!(": {m}")).unwrap_or_default()
}

impl ProviderError {
    /// Classify this error into the coarse [`ErrorKind`] taxonomy.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidCredentials { .. } => ErrorKind::Authentication,
            Self::DomainNotFound { .. } | Self::RecordNotFound { .. } => ErrorKind::NotFound,
            Self::InvalidArguments { .. }
            | Self::InvalidParameter { .. }
            | Self::AmbiguousRecord { .. }
            | Self::InvalidState { .. } => ErrorKind::Configuration,
            Self::Transport { .. } | Self::NetworkError { .. } | Self::Timeout { .. } => {
                ErrorKind::Transport
            }
            Self::ParseError { .. } | Self::SerializationError { .. } => ErrorKind::Decoding,
        }
    }

    /// HTTP status carried by a [`Transport`](Self::Transport) error.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this is expected behavior (user input, missing resource), used for log levels.
    ///
    /// `true` should be logged at `warn`, `false` at `error`.
    /// **Keep in sync when adding variants.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Authentication | ErrorKind::NotFound | ErrorKind::Configuration
        )
    }
}

/// Convenience type alias for `Result<T, ProviderError>`.
pub type Result<T> = std::result::Result<T, ProviderError>;
