//! CLOB Order Builder — Exchange Order Construction and Signing
//!
//! Turns `OrderArgs` into the 12-field CTF exchange `Order`, signs its
//! EIP-712 hash with the wallet key, and renders the `POST /order` body.
//! Amount arithmetic follows the exchange: amounts are integers in
//! 6-decimal base units, and the collateral leg carries at most
//! `tick decimals + 2` decimals.

use std::borrow::Cow;

use alloy::primitives::{Address, U256, address};
use alloy::sol;
use alloy::sol_types::{Eip712Domain, SolStruct};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use super::auth::ClobAuth;
use super::types::{PostOrderRequest, SignedOrderPayload};
use crate::config::{AMOY_CHAIN_ID, POLYGON_CHAIN_ID};
use crate::domain::error::BridgeError;
use crate::domain::order::{BASE_UNITS, MarketParams, OrderArgs, OrderType, Side};

sol! {
    /// Polymarket CTF exchange order, as hashed for EIP-712.
    #[derive(Debug)]
    struct Order {
        uint256 salt;
        address maker;
        address signer;
        address taker;
        uint256 tokenId;
        uint256 makerAmount;
        uint256 takerAmount;
        uint256 expiration;
        uint256 nonce;
        uint256 feeRateBps;
        uint8 side;
        uint8 signatureType;
    }
}

const EXCHANGE_DOMAIN_NAME: &str = "Polymarket CTF Exchange";
const EXCHANGE_DOMAIN_VERSION: &str = "1";

const POLYGON_EXCHANGE: Address = address!("4bFb41d5B3570DeFd03C39a9A4D8dE6Bd8B8982E");
const POLYGON_NEG_RISK_EXCHANGE: Address = address!("C5d563A36AE78145C45a50134d48A1215220f80a");
const AMOY_EXCHANGE: Address = address!("dFE02Eb6733538f8Ea35D585af8DE5958AD99E40");
const AMOY_NEG_RISK_EXCHANGE: Address = address!("C5d563A36AE78145C45a50134d48A1215220f80a");

/// Decimals kept on the share leg of an order.
const SIZE_DECIMALS: u32 = 2;

/// Salt must fit an IEEE-754 integer: the backend parses it as a double.
const SALT_MASK: u64 = (1 << 53) - 1;

/// A signed exchange order ready to post.
#[derive(Debug)]
pub struct SignedOrder {
    pub order: Order,
    pub side: Side,
    /// 0x-prefixed signature.
    pub signature: String,
}

impl SignedOrder {
    /// Render the `POST /order` body.
    pub fn into_request(self, owner: &str, order_type: OrderType) -> PostOrderRequest {
        let o = self.order;
        PostOrderRequest {
            order: SignedOrderPayload {
                salt: o.salt.to::<u64>(),
                maker: o.maker.to_string(),
                signer: o.signer.to_string(),
                taker: o.taker.to_string(),
                token_id: o.tokenId.to_string(),
                maker_amount: o.makerAmount.to_string(),
                taker_amount: o.takerAmount.to_string(),
                expiration: o.expiration.to_string(),
                nonce: o.nonce.to_string(),
                fee_rate_bps: o.feeRateBps.to_string(),
                side: self.side.to_string(),
                signature_type: o.signatureType,
                signature: self.signature,
            },
            owner: owner.to_string(),
            order_type: order_type.to_string(),
        }
    }
}

/// Builds and signs exchange orders for one wallet.
pub struct OrderBuilder<'a> {
    auth: &'a ClobAuth,
    chain_id: u64,
    signature_type: u8,
    /// Address holding the funds; the signer itself for EOA wallets.
    funder: Address,
}

impl<'a> OrderBuilder<'a> {
    pub const fn new(
        auth: &'a ClobAuth,
        chain_id: u64,
        signature_type: u8,
        funder: Address,
    ) -> Self {
        Self {
            auth,
            chain_id,
            signature_type,
            funder,
        }
    }

    /// Build and sign an order.
    ///
    /// # Errors
    /// `InvalidInput` for a non-numeric token id or non-positive amounts,
    /// `Config` for a chain without known exchange contracts, `Signing` if
    /// the signer fails.
    pub fn build(
        &self,
        args: &OrderArgs,
        params: MarketParams,
    ) -> Result<SignedOrder, BridgeError> {
        let token_id = U256::from_str_radix(args.token_id.trim(), 10).map_err(|e| {
            BridgeError::InvalidInput(format!("invalid token id '{}': {e}", args.token_id))
        })?;

        let (maker_amount, taker_amount) =
            order_amounts(args.side, args.price, args.size, params.tick_size)?;

        let order = Order {
            salt: U256::from(generate_salt()),
            maker: self.funder,
            signer: self.auth.address(),
            taker: Address::ZERO,
            tokenId: token_id,
            makerAmount: maker_amount,
            takerAmount: taker_amount,
            expiration: U256::ZERO,
            nonce: U256::ZERO,
            feeRateBps: U256::ZERO,
            side: args.side.as_u8(),
            signatureType: self.signature_type,
        };

        let domain = exchange_domain(self.chain_id, params.neg_risk)?;
        let signature = self.auth.sign_digest(&order.eip712_signing_hash(&domain))?;

        debug!(
            token_id = %args.token_id,
            side = %args.side,
            maker_amount = %order.makerAmount,
            taker_amount = %order.takerAmount,
            neg_risk = params.neg_risk,
            "Order signed"
        );

        Ok(SignedOrder {
            order,
            side: args.side,
            signature,
        })
    }
}

/// EIP-712 domain of the exchange contract for this chain and market type.
pub fn exchange_domain(chain_id: u64, neg_risk: bool) -> Result<Eip712Domain, BridgeError> {
    let verifying_contract = match (chain_id, neg_risk) {
        (POLYGON_CHAIN_ID, false) => POLYGON_EXCHANGE,
        (POLYGON_CHAIN_ID, true) => POLYGON_NEG_RISK_EXCHANGE,
        (AMOY_CHAIN_ID, false) => AMOY_EXCHANGE,
        (AMOY_CHAIN_ID, true) => AMOY_NEG_RISK_EXCHANGE,
        _ => {
            return Err(BridgeError::Config(format!(
                "no exchange contract known for chain {chain_id}"
            )));
        }
    };

    Ok(Eip712Domain {
        name: Some(Cow::Borrowed(EXCHANGE_DOMAIN_NAME)),
        version: Some(Cow::Borrowed(EXCHANGE_DOMAIN_VERSION)),
        chain_id: Some(U256::from(chain_id)),
        verifying_contract: Some(verifying_contract),
        salt: None,
    })
}

/// Maker and taker amounts in base units.
///
/// Price is rounded to the tick precision, size truncated to two decimals.
/// BUY gives collateral (`size × price`) and takes shares; SELL the
/// reverse.
pub fn order_amounts(
    side: Side,
    price: Decimal,
    size: Decimal,
    tick_size: Decimal,
) -> Result<(U256, U256), BridgeError> {
    if price <= Decimal::ZERO {
        return Err(BridgeError::InvalidInput(format!("price must be positive, got {price}")));
    }

    let price_decimals = tick_size.normalize().scale();
    let price =
        price.round_dp_with_strategy(price_decimals, RoundingStrategy::MidpointAwayFromZero);
    let shares = size.round_dp_with_strategy(SIZE_DECIMALS, RoundingStrategy::ToZero);

    if shares <= Decimal::ZERO {
        return Err(BridgeError::InvalidInput(format!(
            "size must be at least 0.01 shares, got {size}"
        )));
    }

    let collateral = shares
        .checked_mul(price)
        .ok_or_else(|| out_of_range(shares))?
        .round_dp_with_strategy(price_decimals + SIZE_DECIMALS, RoundingStrategy::ToZero);

    let (maker, taker) = match side {
        Side::Buy => (collateral, shares),
        Side::Sell => (shares, collateral),
    };

    Ok((to_base_units(maker)?, to_base_units(taker)?))
}

fn to_base_units(amount: Decimal) -> Result<U256, BridgeError> {
    amount
        .checked_mul(BASE_UNITS)
        .and_then(|units| units.round_dp_with_strategy(0, RoundingStrategy::ToZero).to_u128())
        .map(U256::from)
        .ok_or_else(|| out_of_range(amount))
}

fn out_of_range(amount: Decimal) -> BridgeError {
    BridgeError::InvalidInput(format!("amount out of range: {amount}"))
}

fn generate_salt() -> u64 {
    (uuid::Uuid::new_v4().as_u128() as u64) & SALT_MASK
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal_macros::dec;

    use super::*;

    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn params() -> MarketParams {
        MarketParams {
            tick_size: dec!(0.01),
            neg_risk: false,
        }
    }

    #[test]
    fn test_buy_amounts() {
        let (maker, taker) = order_amounts(Side::Buy, dec!(0.55), dec!(10), dec!(0.01)).unwrap();
        assert_eq!(maker, U256::from(5_500_000u64));
        assert_eq!(taker, U256::from(10_000_000u64));
    }

    #[test]
    fn test_sell_amounts_reverse_legs() {
        let (maker, taker) = order_amounts(Side::Sell, dec!(0.55), dec!(10), dec!(0.01)).unwrap();
        assert_eq!(maker, U256::from(10_000_000u64));
        assert_eq!(taker, U256::from(5_500_000u64));
    }

    #[test]
    fn test_size_truncated_price_rounded_to_tick() {
        let (maker, taker) =
            order_amounts(Side::Buy, dec!(0.123), dec!(3.339), dec!(0.01)).unwrap();
        // shares 3.33, price 0.12, collateral 0.3996
        assert_eq!(taker, U256::from(3_330_000u64));
        assert_eq!(maker, U256::from(399_600u64));
    }

    #[test]
    fn test_non_positive_inputs_rejected() {
        assert!(order_amounts(Side::Buy, dec!(0), dec!(1), dec!(0.01)).is_err());
        assert!(order_amounts(Side::Buy, dec!(0.5), dec!(0.001), dec!(0.01)).is_err());
        assert!(order_amounts(Side::Sell, dec!(0.5), dec!(-2), dec!(0.01)).is_err());
    }

    #[test]
    fn test_oversized_amounts_are_rejected_not_panicking() {
        let size = Decimal::from_str("100000000000000000000000").unwrap();
        let err = order_amounts(Side::Buy, dec!(0.5), size, dec!(0.01)).unwrap_err();
        assert_eq!(err.error_type(), "InvalidInput");
        assert!(err.to_string().contains("out of range"));

        let huge_price = Decimal::MAX / dec!(10);
        let err = order_amounts(Side::Sell, huge_price, dec!(100), dec!(0.01)).unwrap_err();
        assert_eq!(err.error_type(), "InvalidInput");
    }

    #[test]
    fn test_price_midpoint_rounds_half_up() {
        let (maker, _) = order_amounts(Side::Buy, dec!(0.125), dec!(10), dec!(0.01)).unwrap();
        assert_eq!(maker, U256::from(1_300_000u64));
    }

    #[test]
    fn test_exchange_domain_selection() {
        let regular = exchange_domain(137, false).unwrap();
        let neg_risk = exchange_domain(137, true).unwrap();
        assert_eq!(regular.verifying_contract, Some(POLYGON_EXCHANGE));
        assert_eq!(neg_risk.verifying_contract, Some(POLYGON_NEG_RISK_EXCHANGE));
        assert!(exchange_domain(1, false).is_err());
    }

    #[test]
    fn test_build_signs_and_renders_payload() {
        let auth = ClobAuth::new(TEST_KEY, 137).unwrap();
        let builder = OrderBuilder::new(&auth, 137, 0, auth.address());
        let args = OrderArgs {
            token_id: "71321045679252212594626385532706912750332728571942532289631379312455583992563"
                .to_string(),
            side: Side::Buy,
            size: dec!(10),
            price: dec!(0.55),
        };

        let signed = builder.build(&args, params()).unwrap();
        assert!(signed.order.salt <= U256::from(SALT_MASK));
        assert_eq!(signed.signature.len(), 132);

        let req = signed.into_request("api-key", OrderType::Fok);
        assert_eq!(req.order_type, "FOK");
        assert_eq!(req.order.side, "BUY");
        assert_eq!(req.order.token_id, args.token_id);
        assert_eq!(req.order.maker, auth.address().to_string());
        assert_eq!(req.order.taker, Address::ZERO.to_string());
    }

    #[test]
    fn test_non_numeric_token_rejected() {
        let auth = ClobAuth::new(TEST_KEY, 137).unwrap();
        let builder = OrderBuilder::new(&auth, 137, 0, auth.address());
        let args = OrderArgs {
            token_id: "yes-token".to_string(),
            side: Side::Sell,
            size: dec!(1),
            price: dec!(0.5),
        };
        let err = builder.build(&args, params()).unwrap_err();
        assert_eq!(err.error_type(), "InvalidInput");
    }
}
