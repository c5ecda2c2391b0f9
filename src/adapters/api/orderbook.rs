//! Order Book Adapter - CLOB Order Book and Market Parameter Queries
//!
//! Fetches order book snapshots, tick sizes and neg-risk flags from the
//! public CLOB endpoints and converts them into domain types.

use std::str::FromStr;

use reqwest::header::HeaderMap;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::client::ClobClient;
use super::types::{NegRiskResponse, OrderBookLevel, OrderBookResponse, TickSizeResponse};
use crate::domain::error::BridgeError;
use crate::domain::order::{BookLevel, MarketParams, OrderBookSnapshot};
use crate::domain::position::decimal_from_value;

/// Order book adapter that wraps the CLOB HTTP client.
pub struct OrderBookAdapter<'a> {
    client: &'a ClobClient,
}

impl<'a> OrderBookAdapter<'a> {
    /// Create a new order book adapter.
    pub const fn new(client: &'a ClobClient) -> Self {
        Self { client }
    }

    /// Fetch the order book snapshot for a single token.
    ///
    /// Calls GET /book?token_id={token_id} on the CLOB API.
    pub async fn get_order_book(&self, token_id: &str) -> Result<OrderBookSnapshot, BridgeError> {
        let raw = self
            .client
            .get("/book", &[("token_id", token_id.to_string())], HeaderMap::new())
            .await?;
        let book: OrderBookResponse = serde_json::from_value(raw)?;

        debug!(
            token_id,
            bids = book.bids.len(),
            asks = book.asks.len(),
            "Order book fetched"
        );

        Ok(Self::to_snapshot(&book))
    }

    /// Fetch tick size and neg-risk flag for a token.
    pub async fn get_market_params(&self, token_id: &str) -> Result<MarketParams, BridgeError> {
        let query = [("token_id", token_id.to_string())];

        let raw = self.client.get("/tick-size", &query, HeaderMap::new()).await?;
        let tick: TickSizeResponse = serde_json::from_value(raw)?;
        let tick_size = decimal_from_value(&tick.minimum_tick_size)
            .filter(|t| t.is_sign_positive() && !t.is_zero())
            .ok_or_else(|| {
                BridgeError::MalformedResponse(format!(
                    "invalid minimum_tick_size {}",
                    tick.minimum_tick_size
                ))
            })?;

        let raw = self.client.get("/neg-risk", &query, HeaderMap::new()).await?;
        let neg_risk: NegRiskResponse = serde_json::from_value(raw)?;

        Ok(MarketParams {
            tick_size,
            neg_risk: neg_risk.neg_risk,
        })
    }

    /// Convert the wire book into a domain snapshot.
    ///
    /// Levels whose price or size does not parse are skipped.
    pub fn to_snapshot(book: &OrderBookResponse) -> OrderBookSnapshot {
        OrderBookSnapshot {
            bids: Self::parse_levels(&book.bids),
            asks: Self::parse_levels(&book.asks),
            tick_size: book
                .tick_size
                .as_deref()
                .and_then(|t| Decimal::from_str(t).ok())
                .filter(|t| !t.is_zero()),
            neg_risk: book.neg_risk,
        }
    }

    fn parse_levels(levels: &[OrderBookLevel]) -> Vec<BookLevel> {
        levels
            .iter()
            .filter_map(|l| {
                let parsed = Decimal::from_str(&l.price)
                    .ok()
                    .zip(Decimal::from_str(&l.size).ok());
                if parsed.is_none() {
                    warn!(price = %l.price, size = %l.size, "Skipping unparseable book level");
                }
                parsed.map(|(price, size)| BookLevel { price, size })
            })
            .collect()
    }
}
