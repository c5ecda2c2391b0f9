//! Venue Port - CLOB Client Interface
//!
//! The dispatcher talks to the trading venue only through this trait.
//! The production implementation is `adapters::api::ClobVenue`; tests use
//! mockall mocks.
//!
//! Responses whose shape the venue does not pin down (order placement,
//! cancellation, balance, positions) are returned as raw JSON. The
//! dispatcher normalizes them with explicit field-priority adapters so the
//! same code handles every shape.

use async_trait::async_trait;
use serde_json::Value;

use crate::config::credentials::ApiCredentials;
use crate::domain::error::BridgeError;
use crate::domain::order::{MarketParams, OrderArgs, OrderBookSnapshot, OrderType};

/// Operations the bridge needs from the trading venue.
///
/// Each method performs at most one logical venue call (plus whatever
/// authentication bootstrap the implementation needs) and never retries.
#[async_trait]
pub trait VenueClient: Send + Sync {
    /// Current order book for a token.
    async fn order_book(&self, token_id: &str) -> Result<OrderBookSnapshot, BridgeError>;

    /// Tick size and neg-risk flag for a token.
    async fn market_params(&self, token_id: &str) -> Result<MarketParams, BridgeError>;

    /// Build, sign and submit an order. Returns the venue's raw response.
    async fn post_order(
        &self,
        args: &OrderArgs,
        params: MarketParams,
        order_type: OrderType,
    ) -> Result<Value, BridgeError>;

    /// Collateral balance and allowance, in 6-decimal base units.
    async fn collateral_balance(&self) -> Result<Value, BridgeError>;

    /// Open positions of the trading account.
    async fn positions(&self) -> Result<Value, BridgeError>;

    /// Cancel one order by id.
    async fn cancel(&self, order_id: &str) -> Result<Value, BridgeError>;

    /// Cancel every open order of the authenticated account.
    async fn cancel_all(&self) -> Result<Value, BridgeError>;

    /// Derive API credentials from the signing key.
    async fn derive_api_key(&self) -> Result<ApiCredentials, BridgeError>;
}
