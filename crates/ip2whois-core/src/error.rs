use std::time::Duration;
use thiserror::Error;

/// Result type alias for ip2whois operations
pub type Result<T> = std::result::Result<T, LookupError>;

/// Input rejected before any provider is contacted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The query string was empty
    #[error("query parameter is required")]
    MissingQuery,

    /// The declared kind was neither `ip` nor `domain`
    #[error("missing or invalid type")]
    InvalidKind(String),

    /// The query does not follow the domain label grammar
    #[error("invalid domain format")]
    InvalidDomain(String),

    /// The query is not an IP address
    #[error("invalid IP address format")]
    InvalidIp(String),
}

/// Why a single provider could not produce a record.
///
/// These never reach the caller of the resolver; each one moves the chain on
/// to the next provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterFailure {
    /// The provider did not answer within the per-call timeout
    #[error("request timed out after {}ms", .after.as_millis())]
    Timeout {
        /// Timeout that elapsed
        after: Duration,
    },

    /// The provider answered with a non-2xx status
    #[error("upstream returned status {status}")]
    UpstreamError {
        /// HTTP status code
        status: u16,
    },

    /// The payload carried the provider's own error marker
    #[error("upstream rejected the query: {message}")]
    UpstreamRejected {
        /// Message reported by the provider
        message: String,
    },

    /// The payload could not be interpreted
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Connection-level failure before any response arrived
    #[error("network error: {0}")]
    Network(String),

    /// The provider cannot answer queries of this kind
    #[error("provider does not support {0} queries")]
    Unsupported(crate::QueryKind),
}

impl AdapterFailure {
    /// Returns true if the failure was a timeout
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Returns the HTTP status code if the provider answered with one
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::UpstreamError { status } => Some(*status),
            _ => None,
        }
    }

    /// Short machine-friendly label for logs and attempt reports
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "timeout",
            Self::UpstreamError { .. } => "upstream_error",
            Self::UpstreamRejected { .. } => "upstream_rejected",
            Self::MalformedResponse(_) => "malformed_response",
            Self::Network(_) => "network",
            Self::Unsupported(_) => "unsupported",
        }
    }
}

impl From<serde_json::Error> for AdapterFailure {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedResponse(err.to_string())
    }
}

/// Errors surfaced by the public entry points
#[derive(Error, Debug)]
pub enum LookupError {
    /// Input validation failed
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The resolver or its HTTP client could not be constructed
    #[error("configuration error: {0}")]
    Config(String),
}

impl LookupError {
    /// Returns true if the error is a rejected input
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
