//! Order domain types.
//!
//! Side, order type, order arguments, and the order-book snapshot used to
//! price market orders. Prices and sizes are `Decimal` end to end so the
//! values echoed back to the caller are exactly the values it sent.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::error::BridgeError;

/// Base units per whole USDC or share.
pub const BASE_UNITS: Decimal = dec!(1_000_000);

/// Trade side as understood by the CLOB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Numeric encoding used inside the signed exchange order.
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Buy => 0,
            Self::Sell => 1,
        }
    }

    /// Name of the book side a market order on this side consumes.
    pub const fn opposing_book(self) -> &'static str {
        match self {
            Self::Buy => "asks",
            Self::Sell => "bids",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

impl FromStr for Side {
    type Err = BridgeError;

    /// Accepts `BUY`/`SELL` in any case. Anything else is rejected rather
    /// than defaulted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("BUY") {
            Ok(Self::Buy)
        } else if s.eq_ignore_ascii_case("SELL") {
            Ok(Self::Sell)
        } else {
            Err(BridgeError::InvalidInput(format!(
                "invalid side '{s}', expected BUY or SELL"
            )))
        }
    }
}

/// Time-in-force of a submitted order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderType {
    /// Good-till-cancelled: rests on the book.
    Gtc,
    /// Fill-or-kill: executes fully and immediately or not at all.
    Fok,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gtc => write!(f, "GTC"),
            Self::Fok => write!(f, "FOK"),
        }
    }
}

/// Arguments of an order before it is built and signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderArgs {
    /// Outcome token id (decimal string of a uint256).
    pub token_id: String,
    pub side: Side,
    /// Number of shares.
    pub size: Decimal,
    /// Price per share in USDC.
    pub price: Decimal,
}

/// Reject a size/price pair whose base-unit amounts do not fit a `Decimal`.
///
/// # Errors
/// `InvalidInput` naming the offending amount.
pub fn ensure_amount_range(size: Decimal, price: Decimal) -> Result<(), BridgeError> {
    let shares = size.checked_mul(BASE_UNITS);
    let collateral = size
        .checked_mul(price)
        .and_then(|c| c.checked_mul(BASE_UNITS));
    match (shares, collateral) {
        (Some(_), Some(_)) => Ok(()),
        _ => Err(BridgeError::InvalidInput(format!(
            "amount out of range: size {size} at price {price}"
        ))),
    }
}

/// Per-token parameters the venue needs before an order can be signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketParams {
    /// Minimum price increment, e.g. `0.01`.
    pub tick_size: Decimal,
    /// Whether the token settles through the neg-risk exchange.
    pub neg_risk: bool,
}

/// One price level of the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookLevel {
    pub price: Decimal,
    pub size: Decimal,
}

/// Order book snapshot for a single token.
///
/// Level ordering is whatever the venue sent; callers never rely on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderBookSnapshot {
    pub bids: Vec<BookLevel>,
    pub asks: Vec<BookLevel>,
    /// Tick size reported alongside the book, when present.
    pub tick_size: Option<Decimal>,
    /// Neg-risk flag reported alongside the book, when present.
    pub neg_risk: Option<bool>,
}

impl OrderBookSnapshot {
    /// Lowest ask price, if any asks exist.
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.iter().map(|l| l.price).min()
    }

    /// Highest bid price, if any bids exist.
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.iter().map(|l| l.price).max()
    }

    /// Price a market order on `side` executes at: best ask for BUY, best
    /// bid for SELL.
    ///
    /// # Errors
    /// `NoLiquidity` when the opposing side of the book is empty.
    pub fn execution_price(&self, side: Side) -> Result<Decimal, BridgeError> {
        let best = match side {
            Side::Buy => self.best_ask(),
            Side::Sell => self.best_bid(),
        };
        best.ok_or(BridgeError::NoLiquidity { side })
    }
}
