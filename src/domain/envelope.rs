//! Result envelope: the only output contract with the calling engine.
//!
//! Exactly one `Envelope` is printed per invocation. `success` is always
//! present; the remaining keys depend on the payload and are flattened into
//! the same JSON object.

use rust_decimal::Decimal;
use serde::Serialize;

use super::error::BridgeError;
use super::order::Side;
use super::position::PositionEntry;

/// Message attached to freshly derived API credentials.
pub const DERIVED_KEY_MESSAGE: &str = "Save these credentials to your .env file!";

/// Accepted order, echoing the caller's request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderReceipt {
    pub order_id: String,
    pub status: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub size: Decimal,
    /// Present for market orders only.
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub filled_size: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub side: Side,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceReport {
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    pub currency: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionsReport {
    pub positions: Vec<PositionEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CancelReceipt {
    pub cancelled: bool,
    pub order_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CancelAllReceipt {
    pub cancelled_all: bool,
    pub cancelled_count: usize,
}

/// API credentials returned by `derive-key` for the caller to store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedCredentials {
    pub api_key: String,
    pub api_secret: String,
    pub api_passphrase: String,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureReport {
    pub error: String,
    pub error_type: &'static str,
}

/// Operation-specific body of the envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Order(OrderReceipt),
    Balance(BalanceReport),
    Positions(PositionsReport),
    Cancelled(CancelReceipt),
    CancelledAll(CancelAllReceipt),
    Credentials(DerivedCredentials),
    Failure(FailureReport),
}

/// Single JSON object written to stdout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(flatten)]
    pub payload: Payload,
}

impl Envelope {
    pub const fn success(payload: Payload) -> Self {
        Self {
            success: true,
            payload,
        }
    }

    /// Failure envelope. An empty message is replaced by the category so
    /// `error` is never empty.
    pub fn failure(err: &BridgeError) -> Self {
        let mut error = err.to_string();
        if error.trim().is_empty() {
            error = err.error_type().to_string();
        }
        Self {
            success: false,
            payload: Payload::Failure(FailureReport {
                error,
                error_type: err.error_type(),
            }),
        }
    }

    /// Process exit code matching `success`.
    pub const fn exit_code(&self) -> i32 {
        if self.success { 0 } else { 1 }
    }

    /// Serialize to a single line of JSON.
    ///
    /// Serialization of these types cannot fail in practice; if it ever
    /// does, a hand-built failure object is returned instead.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            serde_json::json!({
                "success": false,
                "error": format!("failed to serialize result: {e}"),
                "error_type": "MalformedResponse",
            })
            .to_string()
        })
    }
}

impl From<Result<Payload, BridgeError>> for Envelope {
    fn from(result: Result<Payload, BridgeError>) -> Self {
        match result {
            Ok(payload) => Self::success(payload),
            Err(err) => Self::failure(&err),
        }
    }
}
