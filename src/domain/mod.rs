//! Domain layer - order, envelope and position types.
//!
//! Pure data and the rules that don't need the network: side parsing,
//! market-order price selection, position normalization, the result
//! envelope and the error taxonomy it reports.

pub mod envelope;
pub mod error;
pub mod order;
pub mod position;

pub use envelope::{Envelope, Payload};
pub use error::BridgeError;
pub use order::{
    BASE_UNITS, BookLevel, MarketParams, OrderArgs, OrderBookSnapshot, OrderType, Side,
    ensure_amount_range,
};
pub use position::{PositionEntry, normalize_positions};
