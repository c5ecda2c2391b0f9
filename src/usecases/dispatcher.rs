//! Command Dispatcher — One Venue Operation per Invocation
//!
//! Maps a [`Command`] to exactly one venue operation and turns the outcome
//! into the result envelope. Operations return typed errors; nothing here
//! retries, and no error escapes `run`.

use rust_decimal::Decimal;
use tracing::{info, instrument, warn};

use super::normalize;
use crate::domain::envelope::{
    BalanceReport, CancelAllReceipt, CancelReceipt, DERIVED_KEY_MESSAGE, DerivedCredentials,
    Envelope, OrderReceipt, Payload, PositionsReport,
};
use crate::domain::error::BridgeError;
use crate::domain::order::{
    MarketParams, OrderArgs, OrderBookSnapshot, OrderType, Side, ensure_amount_range,
};
use crate::domain::position::normalize_positions;
use crate::ports::venue::VenueClient;

/// Default status reported for an accepted resting order.
const POSTED_STATUS: &str = "POSTED";

/// Default status reported for an accepted fill-or-kill order.
const FILLED_STATUS: &str = "FILLED";

/// One bridge operation with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Limit order, good-till-cancelled.
    Place {
        token_id: String,
        side: Side,
        size: Decimal,
        price: Decimal,
    },
    /// Market order at the best opposing price, fill-or-kill.
    Market {
        token_id: String,
        side: Side,
        size: Decimal,
    },
    Balance,
    Positions,
    Cancel {
        order_id: String,
    },
    CancelAll,
    DeriveKey,
}

impl Command {
    /// Subcommand name, for logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Place { .. } => "place",
            Self::Market { .. } => "market",
            Self::Balance => "balance",
            Self::Positions => "positions",
            Self::Cancel { .. } => "cancel",
            Self::CancelAll => "cancel-all",
            Self::DeriveKey => "derive-key",
        }
    }
}

/// Executes commands against a venue.
pub struct Dispatcher<V> {
    venue: V,
}

impl<V: VenueClient> Dispatcher<V> {
    pub const fn new(venue: V) -> Self {
        Self { venue }
    }

    /// Run one command and build its envelope.
    pub async fn run(&self, command: Command) -> Envelope {
        let name = command.name();
        let result = match command {
            Command::Place {
                token_id,
                side,
                size,
                price,
            } => {
                self.place(OrderArgs {
                    token_id,
                    side,
                    size,
                    price,
                })
                .await
            }
            Command::Market {
                token_id,
                side,
                size,
            } => self.market(&token_id, side, size).await,
            Command::Balance => self.balance().await,
            Command::Positions => self.positions().await,
            Command::Cancel { order_id } => self.cancel(&order_id).await,
            Command::CancelAll => self.cancel_all().await,
            Command::DeriveKey => self.derive_key().await,
        };

        match &result {
            Ok(_) => info!(command = name, "Command succeeded"),
            Err(e) => warn!(
                command = name,
                error = %e,
                error_type = e.error_type(),
                "Command failed"
            ),
        }

        Envelope::from(result)
    }

    /// Place a GTC limit order; the receipt echoes the request.
    #[instrument(skip(self, args), fields(token = %args.token_id, side = %args.side))]
    pub async fn place(&self, args: OrderArgs) -> Result<Payload, BridgeError> {
        ensure_amount_range(args.size, args.price)?;
        let params = self.venue.market_params(&args.token_id).await?;
        let raw = self.venue.post_order(&args, params, OrderType::Gtc).await?;
        let posted = normalize::posted_order(&raw)?;

        Ok(Payload::Order(OrderReceipt {
            order_id: posted.order_id,
            status: posted.status.unwrap_or_else(|| POSTED_STATUS.to_string()),
            size: args.size,
            filled_size: None,
            price: args.price,
            side: args.side,
        }))
    }

    /// Place a FOK order at the best opposing price in the current book.
    #[instrument(skip(self))]
    pub async fn market(
        &self,
        token_id: &str,
        side: Side,
        size: Decimal,
    ) -> Result<Payload, BridgeError> {
        // Book prices never exceed one.
        ensure_amount_range(size, Decimal::ONE)?;
        let book = self.venue.order_book(token_id).await?;
        let price = book.execution_price(side)?;
        let params = self.params_for(token_id, &book).await?;

        info!(%price, "Market order priced from book");

        let args = OrderArgs {
            token_id: token_id.to_string(),
            side,
            size,
            price,
        };
        let raw = self.venue.post_order(&args, params, OrderType::Fok).await?;
        let posted = normalize::posted_order(&raw)?;

        Ok(Payload::Order(OrderReceipt {
            order_id: posted.order_id,
            status: posted.status.unwrap_or_else(|| FILLED_STATUS.to_string()),
            size,
            filled_size: Some(normalize::filled_size(&raw, side, size)),
            price,
            side,
        }))
    }

    /// Collateral balance in USDC.
    pub async fn balance(&self) -> Result<Payload, BridgeError> {
        let raw = self.venue.collateral_balance().await?;
        Ok(Payload::Balance(BalanceReport {
            balance: normalize::balance_usdc(&raw)?,
            currency: "USDC",
        }))
    }

    /// Open positions in the uniform `{token_id, size, avg_price}` shape.
    pub async fn positions(&self) -> Result<Payload, BridgeError> {
        let raw = self.venue.positions().await?;
        Ok(Payload::Positions(PositionsReport {
            positions: normalize_positions(&raw),
        }))
    }

    /// Cancel one order.
    #[instrument(skip(self))]
    pub async fn cancel(&self, order_id: &str) -> Result<Payload, BridgeError> {
        let raw = self.venue.cancel(order_id).await?;
        normalize::cancel_outcome(&raw, order_id)?;
        Ok(Payload::Cancelled(CancelReceipt {
            cancelled: true,
            order_id: order_id.to_string(),
        }))
    }

    /// Cancel every open order of the account.
    pub async fn cancel_all(&self) -> Result<Payload, BridgeError> {
        let raw = self.venue.cancel_all().await?;
        Ok(Payload::CancelledAll(CancelAllReceipt {
            cancelled_all: true,
            cancelled_count: normalize::cancelled_count(&raw),
        }))
    }

    /// Derive API credentials for the caller to persist.
    pub async fn derive_key(&self) -> Result<Payload, BridgeError> {
        let creds = self.venue.derive_api_key().await?;
        Ok(Payload::Credentials(DerivedCredentials {
            api_key: creds.api_key,
            api_secret: creds.api_secret,
            api_passphrase: creds.api_passphrase,
            message: DERIVED_KEY_MESSAGE,
        }))
    }

    /// Market parameters from the book when it carries them, else from the
    /// venue.
    async fn params_for(
        &self,
        token_id: &str,
        book: &OrderBookSnapshot,
    ) -> Result<MarketParams, BridgeError> {
        match (book.tick_size, book.neg_risk) {
            (Some(tick_size), Some(neg_risk)) => Ok(MarketParams { tick_size, neg_risk }),
            _ => self.venue.market_params(token_id).await,
        }
    }
}
