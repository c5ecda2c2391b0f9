//! CLOB API Request/Response Types
//!
//! Serialization types for the Polymarket CLOB REST API. Only the
//! responses with a fixed shape are typed; order, cancel, balance and
//! position responses stay as `serde_json::Value` and are normalized by
//! the dispatcher.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Order book level from the API. Prices and sizes are decimal strings.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderBookLevel {
  /// Price at this level.
  pub price: String,
  /// Total size at this level.
  pub size: String,
}

/// `GET /book` response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OrderBookResponse {
  /// Condition id of the market.
  pub market: Option<String>,
  /// Token id the book belongs to.
  pub asset_id: Option<String>,
  /// Bid levels.
  pub bids: Vec<OrderBookLevel>,
  /// Ask levels.
  pub asks: Vec<OrderBookLevel>,
  /// Minimum tick size, as a decimal string.
  pub tick_size: Option<String>,
  /// Whether the token trades on the neg-risk exchange.
  pub neg_risk: Option<bool>,
  /// Book hash.
  pub hash: Option<String>,
  /// Timestamp of snapshot.
  pub timestamp: Option<String>,
}

/// `GET /tick-size` response. The venue sends a number or a string.
#[derive(Debug, Clone, Deserialize)]
pub struct TickSizeResponse {
  pub minimum_tick_size: Value,
}

/// `GET /neg-risk` response.
#[derive(Debug, Clone, Deserialize)]
pub struct NegRiskResponse {
  pub neg_risk: bool,
}

/// Signed exchange order as posted to `POST /order`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedOrderPayload {
  /// Salt, sent as a JSON number (fits in 53 bits).
  pub salt: u64,
  pub maker: String,
  pub signer: String,
  pub taker: String,
  pub token_id: String,
  pub maker_amount: String,
  pub taker_amount: String,
  pub expiration: String,
  pub nonce: String,
  pub fee_rate_bps: String,
  /// "BUY" or "SELL".
  pub side: String,
  pub signature_type: u8,
  /// 0x-prefixed 65-byte signature.
  pub signature: String,
}

/// `POST /order` request body.
#[derive(Debug, Clone, Serialize)]
pub struct PostOrderRequest {
  pub order: SignedOrderPayload,
  /// API key of the order owner.
  pub owner: String,
  /// "GTC" or "FOK".
  #[serde(rename = "orderType")]
  pub order_type: String,
}

/// `DELETE /order` request body.
#[derive(Debug, Clone, Serialize)]
pub struct CancelOrderRequest {
  /// Order ID to cancel.
  #[serde(rename = "orderID")]
  pub order_id: String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_post_order_request_serialization() {
    let req = PostOrderRequest {
      order: SignedOrderPayload {
        salt: 42,
        maker: "0xmaker".to_string(),
        signer: "0xsigner".to_string(),
        taker: "0x0000000000000000000000000000000000000000".to_string(),
        token_id: "123".to_string(),
        maker_amount: "5500000".to_string(),
        taker_amount: "10000000".to_string(),
        expiration: "0".to_string(),
        nonce: "0".to_string(),
        fee_rate_bps: "0".to_string(),
        side: "BUY".to_string(),
        signature_type: 0,
        signature: "0xsig".to_string(),
      },
      owner: "api-key".to_string(),
      order_type: "GTC".to_string(),
    };

    let json: Value = serde_json::to_value(&req).unwrap();
    assert_eq!(json["orderType"], "GTC");
    assert_eq!(json["order"]["tokenId"], "123");
    assert_eq!(json["order"]["makerAmount"], "5500000");
    assert_eq!(json["order"]["feeRateBps"], "0");
    assert_eq!(json["order"]["signatureType"], 0);
    assert_eq!(json["order"]["salt"], 42);
  }

  #[test]
  fn test_order_book_response_tolerates_missing_fields() {
    let json = r#"{"bids": [{"price": "0.45", "size": "100"}]}"#;
    let book: OrderBookResponse = serde_json::from_str(json).unwrap();
    assert_eq!(book.bids.len(), 1);
    assert!(book.asks.is_empty());
    assert!(book.tick_size.is_none());
  }

  #[test]
  fn test_cancel_request_field_name() {
    let body = serde_json::to_string(&CancelOrderRequest {
      order_id: "0xabc".to_string(),
    })
    .unwrap();
    assert_eq!(body, r#"{"orderID":"0xabc"}"#);
  }
}
