use std::fmt;

use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Failure class reported by an HTTP transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Could not establish a connection (DNS, refused, reset).
    Connect,
    /// Connect or read timeout.
    Timeout,
    /// The response body was cut short or could not be read.
    Body,
    /// Anything else (invalid request, TLS setup, ...).
    Other,
}

impl TransportErrorKind {
    /// Whether a request failing this way is worth another attempt.
    #[must_use]
    pub const fn is_transient(self) -> bool {
        matches!(self, Self::Connect | Self::Timeout | Self::Body)
    }
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect => write!(f, "connect"),
            Self::Timeout => write!(f, "timeout"),
            Self::Body => write!(f, "body"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Error produced by an [`HttpTransport`](crate::port::outbound::http::HttpTransport).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} error: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Last thing that went wrong before the fetch client gave up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureCause {
    Status(u16),
    Transport(TransportError),
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(status) => write!(f, "HTTP {status}"),
            Self::Transport(err) => write!(f, "{err}"),
        }
    }
}

/// Errors raised by the resilient fetch client.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed after {attempts} attempts: {url}; last cause: {cause}")]
    Exhausted {
        url: String,
        attempts: u32,
        cause: FailureCause,
    },

    #[error("HTTP {status} for {url}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("non-JSON response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("upstream error from {source_name}: {reason}")]
    Upstream {
        source_name: &'static str,
        reason: String,
    },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid market config '{name}': {reason}")]
    InvalidMarket { name: String, reason: String },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("worker failed: {0}")]
    Worker(String),
}

pub type Result<T> = std::result::Result<T, Error>;
