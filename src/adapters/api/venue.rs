//! CLOB Venue — `VenueClient` Implementation
//!
//! Wires the HTTP client, authentication, order builder and order book
//! adapter behind the `VenueClient` port. Owns the per-invocation API
//! credentials: configured ones when all three env vars are set, else
//! derived once from the signing key on the first call that needs them.

use std::str::FromStr;
use std::time::Duration;

use alloy::primitives::Address;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{info, instrument, warn};

use super::auth::ClobAuth;
use super::client::{ClobClient, ClobClientConfig};
use super::orderbook::OrderBookAdapter;
use super::orders::OrderBuilder;
use super::types::CancelOrderRequest;
use crate::config::VenueConfig;
use crate::config::credentials::{ApiCredentials, Credentials};
use crate::domain::error::BridgeError;
use crate::domain::order::{MarketParams, OrderArgs, OrderBookSnapshot, OrderType};
use crate::ports::venue::VenueClient;

const ORDER_PATH: &str = "/order";
const CANCEL_ALL_PATH: &str = "/cancel-all";
const BALANCE_ALLOWANCE_PATH: &str = "/balance-allowance";
const DERIVE_API_KEY_PATH: &str = "/auth/derive-api-key";

/// Authenticated Polymarket CLOB client.
pub struct ClobVenue {
    client: ClobClient,
    auth: ClobAuth,
    config: VenueConfig,
    /// Address holding funds and positions.
    funder: Address,
    /// L2 credentials, configured or lazily derived.
    api_creds: OnceCell<ApiCredentials>,
}

impl ClobVenue {
    /// Build the client. No network calls are made here.
    ///
    /// # Errors
    /// `Signing` for an invalid private key, `Config` for an invalid funder
    /// address or HTTP client setup failure.
    pub fn new(config: VenueConfig, credentials: &Credentials) -> Result<Self, BridgeError> {
        let auth = ClobAuth::new(credentials.private_key(), config.chain_id)?;

        let funder = match config.funder.as_deref() {
            Some(funder) => Address::from_str(funder.trim()).map_err(|e| {
                BridgeError::Config(format!("invalid funder address '{funder}': {e}"))
            })?,
            None => auth.address(),
        };

        let client = ClobClient::new(ClobClientConfig {
            base_url: config.clob_url.clone(),
            timeout: Duration::from_secs(config.timeout_seconds),
        })?;

        info!(
            signer = %auth.address(),
            funder = %funder,
            chain_id = config.chain_id,
            l2_configured = credentials.api().is_some(),
            "CLOB venue client ready"
        );

        Ok(Self {
            client,
            auth,
            config,
            funder,
            api_creds: OnceCell::new_with(credentials.api().cloned()),
        })
    }

    /// L2 credentials, deriving them once in key-only mode.
    async fn l2_credentials(&self) -> Result<&ApiCredentials, BridgeError> {
        self.api_creds
            .get_or_try_init(|| async {
                warn!("No API credentials configured, deriving from signing key");
                self.fetch_derived_key().await
            })
            .await
    }

    async fn l2_headers(
        &self,
        method: &str,
        path: &str,
        body: &str,
    ) -> Result<HeaderMap, BridgeError> {
        let creds = self.l2_credentials().await?;
        self.auth.l2_headers(creds, method, path, body)
    }

    async fn fetch_derived_key(&self) -> Result<ApiCredentials, BridgeError> {
        let headers = self.auth.l1_headers(0)?;
        let raw = self.client.get(DERIVE_API_KEY_PATH, &[], headers).await?;
        serde_json::from_value(raw)
            .map_err(|e| BridgeError::MalformedResponse(format!("derive-api-key response: {e}")))
    }
}

#[async_trait]
impl VenueClient for ClobVenue {
    #[instrument(skip(self))]
    async fn order_book(&self, token_id: &str) -> Result<OrderBookSnapshot, BridgeError> {
        OrderBookAdapter::new(&self.client).get_order_book(token_id).await
    }

    #[instrument(skip(self))]
    async fn market_params(&self, token_id: &str) -> Result<MarketParams, BridgeError> {
        OrderBookAdapter::new(&self.client).get_market_params(token_id).await
    }

    #[instrument(
        skip(self, args),
        fields(
            token = %args.token_id,
            side = %args.side,
            price = %args.price,
            size = %args.size
        )
    )]
    async fn post_order(
        &self,
        args: &OrderArgs,
        params: MarketParams,
        order_type: OrderType,
    ) -> Result<Value, BridgeError> {
        let creds = self.l2_credentials().await?;

        let signed = OrderBuilder::new(
            &self.auth,
            self.config.chain_id,
            self.config.signature_type,
            self.funder,
        )
        .build(args, params)?;

        let body = serde_json::to_string(&signed.into_request(&creds.api_key, order_type))?;
        let headers = self.auth.l2_headers(creds, "POST", ORDER_PATH, &body)?;

        self.client.post(ORDER_PATH, body, headers).await
    }

    #[instrument(skip(self))]
    async fn collateral_balance(&self) -> Result<Value, BridgeError> {
        let headers = self.l2_headers("GET", BALANCE_ALLOWANCE_PATH, "").await?;
        let query = [
            ("asset_type", "COLLATERAL".to_string()),
            ("signature_type", self.config.signature_type.to_string()),
        ];
        self.client.get(BALANCE_ALLOWANCE_PATH, &query, headers).await
    }

    #[instrument(skip(self))]
    async fn positions(&self) -> Result<Value, BridgeError> {
        let url = format!("{}/positions", self.config.data_api_url.trim_end_matches('/'));
        self.client
            .get_url(&url, &[("user", self.funder.to_string())])
            .await
    }

    #[instrument(skip(self))]
    async fn cancel(&self, order_id: &str) -> Result<Value, BridgeError> {
        let body = serde_json::to_string(&CancelOrderRequest {
            order_id: order_id.to_string(),
        })?;
        let headers = self.l2_headers("DELETE", ORDER_PATH, &body).await?;
        self.client.delete(ORDER_PATH, Some(body), headers).await
    }

    #[instrument(skip(self))]
    async fn cancel_all(&self) -> Result<Value, BridgeError> {
        let headers = self.l2_headers("DELETE", CANCEL_ALL_PATH, "").await?;
        self.client.delete(CANCEL_ALL_PATH, None, headers).await
    }

    #[instrument(skip(self))]
    async fn derive_api_key(&self) -> Result<ApiCredentials, BridgeError> {
        self.fetch_derived_key().await
    }
}
