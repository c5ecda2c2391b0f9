//! Venue response normalization.
//!
//! Venue responses for orders, cancels and balances are loosely typed:
//! the same information can sit under different keys, numbers can be
//! strings, and some endpoints answer with a bare string. Each function
//! here resolves one field through a fixed priority list.

use rust_decimal::Decimal;
use serde_json::Value;

use crate::domain::error::BridgeError;
use crate::domain::order::{BASE_UNITS, Side};
use crate::domain::position::{decimal_from_value, first_decimal};

/// Keys probed for the order id, in priority order.
const ORDER_ID_KEYS: &[&str] = &["orderID", "orderId", "id"];

/// Order id and venue status of an accepted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedOrder {
    pub order_id: String,
    pub status: Option<String>,
}

/// Interpret a `POST /order` response.
///
/// # Errors
/// `OrderRejected` when the venue reports `success: false` or a non-empty
/// `errorMsg`; `MalformedResponse` when no order id can be found.
pub fn posted_order(raw: &Value) -> Result<PostedOrder, BridgeError> {
    if let Value::String(id) = raw {
        return non_empty(id)
            .map(|order_id| PostedOrder {
                order_id,
                status: None,
            })
            .ok_or_else(|| BridgeError::MalformedResponse("empty order response".to_string()));
    }

    let error_msg = raw
        .get("errorMsg")
        .and_then(Value::as_str)
        .and_then(non_empty);
    let accepted = raw.get("success").and_then(Value::as_bool).unwrap_or(true);

    if !accepted || error_msg.is_some() {
        return Err(BridgeError::OrderRejected(
            error_msg.unwrap_or_else(|| "order not accepted by venue".to_string()),
        ));
    }

    let order_id = ORDER_ID_KEYS
        .iter()
        .find_map(|key| raw.get(key).and_then(Value::as_str).and_then(non_empty))
        .ok_or_else(|| {
            BridgeError::MalformedResponse(format!("order response has no order id: {raw}"))
        })?;

    let status = raw.get("status").and_then(Value::as_str).and_then(non_empty);

    Ok(PostedOrder { order_id, status })
}

/// Filled size of a market order.
///
/// Priority: `filledSize`, then the share leg the venue reports for the
/// side (`takingAmount` for BUY, `makingAmount` for SELL), then the
/// requested size. A reported zero is kept: nothing filled.
pub fn filled_size(raw: &Value, side: Side, requested: Decimal) -> Decimal {
    let share_leg = match side {
        Side::Buy => "takingAmount",
        Side::Sell => "makingAmount",
    };
    first_decimal(raw, &["filledSize", share_leg]).unwrap_or(requested)
}

/// Collateral balance in whole USDC.
///
/// The venue reports base units under `balance`; a bare number or string
/// is accepted too.
///
/// # Errors
/// `MalformedResponse` when no balance can be parsed.
pub fn balance_usdc(raw: &Value) -> Result<Decimal, BridgeError> {
    let base_units = match raw {
        Value::Null => Some(Decimal::ZERO),
        Value::Number(_) | Value::String(_) => decimal_from_value(raw),
        _ => first_decimal(raw, &["balance"]),
    };

    base_units
        .map(|units| (units / BASE_UNITS).normalize())
        .ok_or_else(|| BridgeError::MalformedResponse(format!("balance response: {raw}")))
}

/// Check a single-order cancel response.
///
/// # Errors
/// `OrderRejected` when the venue lists `order_id` under `not_canceled`.
pub fn cancel_outcome(raw: &Value, order_id: &str) -> Result<(), BridgeError> {
    let refused = raw
        .get("not_canceled")
        .and_then(Value::as_object)
        .and_then(|map| map.get(order_id));

    match refused {
        Some(reason) => Err(BridgeError::OrderRejected(
            reason
                .as_str()
                .and_then(non_empty)
                .unwrap_or_else(|| format!("order {order_id} was not cancelled")),
        )),
        None => Ok(()),
    }
}

/// Number of orders a cancel-all response reports as cancelled.
pub fn cancelled_count(raw: &Value) -> usize {
    ["canceled", "cancelled"]
        .iter()
        .find_map(|key| match raw.get(key)? {
            Value::Array(ids) => Some(ids.len()),
            Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
            _ => None,
        })
        .unwrap_or(0)
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
