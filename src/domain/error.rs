//! Bridge Error Taxonomy
//!
//! Every operation returns `Result<_, BridgeError>`. The dispatcher never
//! inspects messages: it maps the variant to the envelope's `error_type`
//! string through [`BridgeError::error_type`], so the calling engine can
//! branch on a stable category.

use thiserror::Error;

use super::order::Side;

/// Typed failure of a single bridge invocation.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Missing signing key, unreadable config file, invalid config values.
    #[error("{0}")]
    Config(String),

    /// Malformed CLI arguments or request fields.
    #[error("{0}")]
    InvalidInput(String),

    /// The side of the book a market order needs is empty.
    #[error("No {} available", .side.opposing_book())]
    NoLiquidity {
        /// Side of the order that could not be priced.
        side: Side,
    },

    /// Venue refused our credentials or the secret could not be decoded.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Transport-level failure (DNS, TLS, timeout, connection reset).
    #[error("network error: {0}")]
    Network(String),

    /// Non-success HTTP status that is not an auth failure.
    #[error("API error {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Venue error message or raw body.
        message: String,
    },

    /// The venue accepted the request but refused the order or cancel.
    #[error("order rejected: {0}")]
    OrderRejected(String),

    /// Key parsing or signature computation failed.
    #[error("signing failed: {0}")]
    Signing(String),

    /// Response did not have the shape we need.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl BridgeError {
    /// Stable category string reported as `error_type` in the envelope.
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::Config(_) => "ConfigError",
            Self::InvalidInput(_) => "InvalidInput",
            Self::NoLiquidity { .. } => "NoLiquidity",
            Self::Auth(_) => "AuthError",
            Self::Network(_) => "NetworkError",
            Self::Api { .. } => "ApiError",
            Self::OrderRejected(_) => "OrderRejected",
            Self::Signing(_) => "SigningError",
            Self::MalformedResponse(_) => "MalformedResponse",
        }
    }
}

impl From<reqwest::Error> for BridgeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedResponse(err.to_string())
    }
}
