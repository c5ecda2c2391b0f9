//! CLOB Authentication — L1 Wallet Signatures and L2 HMAC Headers
//!
//! L1 headers prove control of the signing key with an EIP-712 `ClobAuth`
//! signature and are only used to derive API credentials. L2 headers sign
//! every trading request with HMAC-SHA256 keyed by the API secret.

use std::str::FromStr;

use alloy::dyn_abi::TypedData;
use alloy::primitives::{Address, B256};
use alloy::signers::SignerSync;
use alloy::signers::local::PrivateKeySigner;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::config::credentials::ApiCredentials;
use crate::domain::error::BridgeError;

/// Statement signed by the wallet in the L1 `ClobAuth` message.
const CLOB_AUTH_MESSAGE: &str = "This message attests that I control the given wallet";

/// CLOB API authentication handler.
///
/// Owns the wallet signer. API credentials are passed in per call so the
/// same handler serves both L1 and L2 requests.
pub struct ClobAuth {
    /// Local secp256k1 signer built from the private key.
    signer: PrivateKeySigner,
    /// Chain id used in the `ClobAuthDomain` EIP-712 domain.
    chain_id: u64,
}

impl ClobAuth {
    /// Build the signer from a hex private key.
    ///
    /// # Errors
    /// `Signing` when the key is not a valid secp256k1 scalar.
    pub fn new(private_key: &str, chain_id: u64) -> Result<Self, BridgeError> {
        let signer = PrivateKeySigner::from_str(private_key)
            .map_err(|e| BridgeError::Signing(format!("invalid private key: {e}")))?;
        Ok(Self { signer, chain_id })
    }

    /// Address of the signing wallet.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Sign a 32-byte digest, returning the 65-byte `r || s || v` signature
    /// as `0x`-prefixed hex.
    pub fn sign_digest(&self, digest: &B256) -> Result<String, BridgeError> {
        let signature = self
            .signer
            .sign_hash_sync(digest)
            .map_err(|e| BridgeError::Signing(e.to_string()))?;
        Ok(alloy::hex::encode_prefixed(signature.as_bytes()))
    }

    /// Current Unix timestamp in seconds (for signing).
    pub fn timestamp() -> String {
        chrono::Utc::now().timestamp().to_string()
    }

    /// Build L1 headers: `POLY_ADDRESS`, `POLY_SIGNATURE`, `POLY_TIMESTAMP`,
    /// `POLY_NONCE`.
    pub fn l1_headers(&self, nonce: u64) -> Result<HeaderMap, BridgeError> {
        let timestamp = Self::timestamp();
        let digest = clob_auth_digest(self.address(), self.chain_id, &timestamp, nonce)?;
        let signature = self.sign_digest(&digest)?;

        let mut headers = HeaderMap::new();
        insert(&mut headers, "poly_address", &self.address().to_string())?;
        insert(&mut headers, "poly_signature", &signature)?;
        insert(&mut headers, "poly_timestamp", &timestamp)?;
        insert(&mut headers, "poly_nonce", &nonce.to_string())?;
        Ok(headers)
    }

    /// Build L2 headers for one request.
    ///
    /// The API secret is NEVER included; only the HMAC signature is sent.
    pub fn l2_headers(
        &self,
        creds: &ApiCredentials,
        method: &str,
        path: &str,
        body: &str,
    ) -> Result<HeaderMap, BridgeError> {
        let timestamp = Self::timestamp();
        let signature = hmac_signature(&creds.api_secret, &timestamp, method, path, body)?;

        let mut headers = HeaderMap::new();
        insert(&mut headers, "poly_address", &self.address().to_string())?;
        insert(&mut headers, "poly_signature", &signature)?;
        insert(&mut headers, "poly_timestamp", &timestamp)?;
        insert(&mut headers, "poly_api_key", &creds.api_key)?;
        insert(&mut headers, "poly_passphrase", &creds.api_passphrase)?;
        Ok(headers)
    }
}

/// HMAC-SHA256 request signature.
///
/// Signature format: `base64url(HMAC(base64url_decode(secret), timestamp +
/// method + path + body))`.
pub fn hmac_signature(
    secret: &str,
    timestamp: &str,
    method: &str,
    path: &str,
    body: &str,
) -> Result<String, BridgeError> {
    let key = URL_SAFE
        .decode(secret.trim())
        .map_err(|e| BridgeError::Auth(format!("API secret is not valid base64: {e}")))?;

    let message = format!("{timestamp}{method}{path}{body}");
    let mac = hmac_sha256::HMAC::mac(message.as_bytes(), &key);
    Ok(URL_SAFE.encode(mac))
}

/// EIP-712 digest of the `ClobAuth` message.
pub fn clob_auth_digest(
    address: Address,
    chain_id: u64,
    timestamp: &str,
    nonce: u64,
) -> Result<B256, BridgeError> {
    let typed = serde_json::json!({
        "types": {
            "EIP712Domain": [
                {"name": "name", "type": "string"},
                {"name": "version", "type": "string"},
                {"name": "chainId", "type": "uint256"}
            ],
            "ClobAuth": [
                {"name": "address", "type": "address"},
                {"name": "timestamp", "type": "string"},
                {"name": "nonce", "type": "uint256"},
                {"name": "message", "type": "string"}
            ]
        },
        "primaryType": "ClobAuth",
        "domain": {
            "name": "ClobAuthDomain",
            "version": "1",
            "chainId": chain_id
        },
        "message": {
            "address": address.to_string(),
            "timestamp": timestamp,
            "nonce": nonce,
            "message": CLOB_AUTH_MESSAGE
        }
    });

    let typed: TypedData = serde_json::from_value(typed)
        .map_err(|e| BridgeError::Signing(format!("invalid ClobAuth typed data: {e}")))?;
    typed
        .eip712_signing_hash()
        .map_err(|e| BridgeError::Signing(format!("EIP-712 encoding failed: {e}")))
}

fn insert(headers: &mut HeaderMap, name: &'static str, value: &str) -> Result<(), BridgeError> {
    let value = HeaderValue::from_str(value)
        .map_err(|e| BridgeError::Auth(format!("invalid {name} header value: {e}")))?;
    headers.insert(HeaderName::from_static(name), value);
    Ok(())
}
