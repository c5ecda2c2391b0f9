//! Configuration Module - TOML-based Bridge Configuration
//!
//! Venue endpoints, chain id and signature settings live in an optional
//! `executor.toml`; environment variables override individual fields.
//! Credentials are never read from the file, only from the environment
//! (see [`credentials`]).

pub mod credentials;
pub mod loader;

use serde::Deserialize;

/// Polygon mainnet.
pub const POLYGON_CHAIN_ID: u64 = 137;

/// Polygon Amoy testnet.
pub const AMOY_CHAIN_ID: u64 = 80002;

/// Top-level bridge configuration.
///
/// Every section has defaults, so an absent config file is valid.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
  /// CLOB endpoints and account settings.
  pub venue: VenueConfig,
  /// Log output settings.
  pub logging: LoggingConfig,
}

/// Venue connection and account configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VenueConfig {
  /// CLOB REST API base URL.
  pub clob_url: String,
  /// Data API base URL (positions).
  pub data_api_url: String,
  /// EVM chain id the exchange contracts live on.
  pub chain_id: u64,
  /// Request timeout in seconds.
  pub timeout_seconds: u64,
  /// 0 = EOA, 1 = POLY_PROXY, 2 = POLY_GNOSIS_SAFE.
  pub signature_type: u8,
  /// Address holding the funds when trading through a proxy wallet.
  pub funder: Option<String>,
}

impl Default for VenueConfig {
  fn default() -> Self {
    Self {
      clob_url: default_clob_url(),
      data_api_url: default_data_api_url(),
      chain_id: POLYGON_CHAIN_ID,
      timeout_seconds: default_timeout(),
      signature_type: 0,
      funder: None,
    }
  }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
  /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins.
  pub level: String,
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self {
      level: default_log_level(),
    }
  }
}

// Default value functions

fn default_clob_url() -> String {
  "https://clob.polymarket.com".to_string()
}

fn default_data_api_url() -> String {
  "https://data-api.polymarket.com".to_string()
}

const fn default_timeout() -> u64 {
  30
}

fn default_log_level() -> String {
  "warn".to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_toml_uses_defaults() {
    let config: BridgeConfig = toml::from_str("").unwrap();
    assert_eq!(config.venue.clob_url, "https://clob.polymarket.com");
    assert_eq!(config.venue.chain_id, POLYGON_CHAIN_ID);
    assert_eq!(config.venue.signature_type, 0);
    assert_eq!(config.logging.level, "warn");
  }

  #[test]
  fn test_partial_section_keeps_other_defaults() {
    let config: BridgeConfig = toml::from_str(
      r#"
      [venue]
      chain_id = 80002
      "#,
    )
    .unwrap();
    assert_eq!(config.venue.chain_id, AMOY_CHAIN_ID);
    assert_eq!(config.venue.timeout_seconds, 30);
    assert!(config.venue.funder.is_none());
  }
}
