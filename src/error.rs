//! Error types for the PayPal NVP adapter

use thiserror::Error;

/// Result type alias for adapter operations
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Failure while talking to the gateway over HTTP
#[derive(Error, Debug)]
pub enum TransportError {
    /// HTTP client error (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Gateway answered with a non-success HTTP status
    #[error("Gateway returned HTTP status {status}")]
    Status { status: u16 },
}

/// Main error type surfaced to callers of the payment service
#[derive(Error, Debug)]
pub enum PaymentError {
    /// The vendor call itself failed; counted against service health
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The gateway answered but the response is not usable
    #[error("Protocol error: {message}")]
    Protocol { message: String },

    /// The response body is not a well-formed NVP document
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PaymentError {
    /// Create a protocol error
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this error came from the transport layer
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
