//! Position normalization.
//!
//! Position payloads come from different venue endpoints with different
//! field names (`asset` vs `token_id`, `avgPrice` vs `avg_price`) and with
//! numbers either as JSON numbers or numeric strings. Each output field is
//! resolved through a fixed priority list of keys, falling back to a
//! default. Normalization never fails.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

/// Keys probed for the token id, in priority order.
const TOKEN_ID_KEYS: &[&str] = &["token_id", "asset", "asset_id", "tokenId"];

/// Keys probed for the position size, in priority order.
const SIZE_KEYS: &[&str] = &["size"];

/// Keys probed for the average entry price, in priority order.
const AVG_PRICE_KEYS: &[&str] = &["avgPrice", "avg_price"];

/// Uniform position entry reported in the envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionEntry {
    pub token_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub size: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub avg_price: Decimal,
}

/// Normalize one venue position payload.
pub fn normalize_position(raw: &Value) -> PositionEntry {
    PositionEntry {
        token_id: first_string(raw, TOKEN_ID_KEYS).unwrap_or_default(),
        size: first_decimal(raw, SIZE_KEYS).unwrap_or_default(),
        avg_price: first_decimal(raw, AVG_PRICE_KEYS).unwrap_or_default(),
    }
}

/// Normalize a list of venue position payloads.
///
/// Accepts a bare array, or an object wrapping the array under `data` or
/// `positions`. Anything else yields an empty list.
pub fn normalize_positions(raw: &Value) -> Vec<PositionEntry> {
    let items = raw
        .as_array()
        .or_else(|| raw.get("data").and_then(Value::as_array))
        .or_else(|| raw.get("positions").and_then(Value::as_array));

    items
        .map(|arr| arr.iter().map(normalize_position).collect())
        .unwrap_or_default()
}

/// First key holding a non-null scalar, rendered as a string.
fn first_string(raw: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match raw.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// First key holding a value that parses as a decimal.
pub(crate) fn first_decimal(raw: &Value, keys: &[&str]) -> Option<Decimal> {
    keys.iter().find_map(|key| decimal_from_value(raw.get(key)?))
}

/// Parse a JSON number or numeric string into a `Decimal`.
pub(crate) fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => parse_decimal(s.trim()),
        Value::Number(n) => parse_decimal(&n.to_string()),
        _ => None,
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}
