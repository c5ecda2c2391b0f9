//! Credentials - Signing Key and API Key Triple from the Environment
//!
//! Read once per invocation, never written anywhere. The signing key is
//! mandatory; the API key/secret/passphrase triple is used only when all
//! three are present, otherwise the venue client runs in key-only mode.

use std::fmt;

use serde::Deserialize;

use crate::domain::error::BridgeError;

pub const PRIVATE_KEY_VAR: &str = "POLYMARKET_PRIVATE_KEY";
pub const API_KEY_VAR: &str = "POLYMARKET_API_KEY";
pub const API_SECRET_VAR: &str = "POLYMARKET_SECRET";
pub const API_PASSPHRASE_VAR: &str = "POLYMARKET_PASSPHRASE";

/// Venue-issued API credentials used for HMAC (L2) authentication.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ApiCredentials {
  #[serde(rename = "apiKey")]
  pub api_key: String,
  #[serde(rename = "secret")]
  pub api_secret: String,
  #[serde(rename = "passphrase")]
  pub api_passphrase: String,
}

impl fmt::Debug for ApiCredentials {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ApiCredentials")
      .field("api_key", &self.api_key)
      .field("api_secret", &"<redacted>")
      .field("api_passphrase", &"<redacted>")
      .finish()
  }
}

/// Everything needed to authenticate against the venue.
#[derive(Clone)]
pub struct Credentials {
  /// Hex private key, always `0x`-prefixed.
  private_key: String,
  /// API triple, when fully configured.
  api: Option<ApiCredentials>,
}

impl Credentials {
  /// Load credentials from environment variables.
  ///
  /// # Errors
  /// `Config` when `POLYMARKET_PRIVATE_KEY` is unset or empty.
  pub fn from_env() -> Result<Self, BridgeError> {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  /// Same as [`Credentials::from_env`] with an injectable lookup.
  pub fn from_lookup<F>(env: F) -> Result<Self, BridgeError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let read = |key: &str| env(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let raw_key = read(PRIVATE_KEY_VAR).ok_or_else(|| {
      BridgeError::Config(format!("{PRIVATE_KEY_VAR} environment variable not set"))
    })?;

    let private_key = if raw_key.starts_with("0x") || raw_key.starts_with("0X") {
      raw_key
    } else {
      format!("0x{raw_key}")
    };

    let api = match (read(API_KEY_VAR), read(API_SECRET_VAR), read(API_PASSPHRASE_VAR)) {
      (Some(api_key), Some(api_secret), Some(api_passphrase)) => Some(ApiCredentials {
        api_key,
        api_secret,
        api_passphrase,
      }),
      _ => None,
    };

    Ok(Self { private_key, api })
  }

  /// Hex private key with `0x` prefix.
  pub fn private_key(&self) -> &str {
    &self.private_key
  }

  /// API credentials, if all three were provided.
  pub const fn api(&self) -> Option<&ApiCredentials> {
    self.api.as_ref()
  }
}

impl fmt::Debug for Credentials {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Credentials")
      .field("private_key", &"<redacted>")
      .field("api", &self.api)
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
    move |key| {
      pairs
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| (*v).to_string())
    }
  }

  #[test]
  fn test_missing_private_key_is_config_error() {
    let err = Credentials::from_lookup(lookup(&[])).unwrap_err();
    assert_eq!(err.error_type(), "ConfigError");
    assert!(err.to_string().contains(PRIVATE_KEY_VAR));
  }

  #[test]
  fn test_blank_private_key_is_missing() {
    let err = Credentials::from_lookup(lookup(&[(PRIVATE_KEY_VAR, "   ")])).unwrap_err();
    assert_eq!(err.error_type(), "ConfigError");
  }

  #[test]
  fn test_prefix_added() {
    let creds = Credentials::from_lookup(lookup(&[(PRIVATE_KEY_VAR, "abcd")])).unwrap();
    assert_eq!(creds.private_key(), "0xabcd");
    let creds = Credentials::from_lookup(lookup(&[(PRIVATE_KEY_VAR, "0xabcd")])).unwrap();
    assert_eq!(creds.private_key(), "0xabcd");
  }

  #[test]
  fn test_partial_api_triple_is_ignored() {
    let creds = Credentials::from_lookup(lookup(&[
      (PRIVATE_KEY_VAR, "0x01"),
      (API_KEY_VAR, "key"),
      (API_SECRET_VAR, "secret"),
    ]))
    .unwrap();
    assert!(creds.api().is_none());
  }

  #[test]
  fn test_full_api_triple() {
    let creds = Credentials::from_lookup(lookup(&[
      (PRIVATE_KEY_VAR, "0x01"),
      (API_KEY_VAR, "key"),
      (API_SECRET_VAR, "secret"),
      (API_PASSPHRASE_VAR, "pass"),
    ]))
    .unwrap();
    let api = creds.api().unwrap();
    assert_eq!(api.api_key, "key");
    assert_eq!(api.api_passphrase, "pass");
  }

  #[test]
  fn test_debug_redacts_secrets() {
    let creds = Credentials::from_lookup(lookup(&[
      (PRIVATE_KEY_VAR, "0xdeadbeef"),
      (API_KEY_VAR, "key"),
      (API_SECRET_VAR, "topsecret"),
      (API_PASSPHRASE_VAR, "pass"),
    ]))
    .unwrap();
    let debug = format!("{creds:?}");
    assert!(!debug.contains("deadbeef"));
    assert!(!debug.contains("topsecret"));
  }
}
