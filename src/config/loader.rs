//! Configuration Loader - File Loading, Env Overrides and Validation
//!
//! Resolution order for the config file: explicit `--config` path, then
//! `POLYMARKET_CONFIG`, then `executor.toml` in the working directory if
//! it exists, then built-in defaults. Environment overrides are applied
//! on top, then the result is validated.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use super::{AMOY_CHAIN_ID, BridgeConfig, POLYGON_CHAIN_ID};

/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "executor.toml";

/// Load, override and validate configuration from the process environment.
///
/// # Errors
/// Returns detailed error if:
/// - An explicitly named file doesn't exist or can't be read
/// - TOML parsing fails
/// - An env override doesn't parse
/// - Validation rules are violated
pub fn load_config(explicit: Option<&Path>) -> Result<BridgeConfig> {
  load_config_with(explicit, |key| std::env::var(key).ok())
}

/// Same as [`load_config`] with an injectable environment lookup.
pub fn load_config_with<F>(explicit: Option<&Path>, env: F) -> Result<BridgeConfig>
where
  F: Fn(&str) -> Option<String>,
{
  let path = explicit
    .map(Path::to_path_buf)
    .or_else(|| env("POLYMARKET_CONFIG").map(PathBuf::from))
    .or_else(|| {
      let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
      fallback.exists().then_some(fallback)
    });

  let mut config = match path {
    Some(path) => read_config_file(&path)?,
    None => BridgeConfig::default(),
  };

  apply_env_overrides(&mut config, &env)?;
  validate_config(&config)?;

  debug!(
    clob_url = %config.venue.clob_url,
    chain_id = config.venue.chain_id,
    signature_type = config.venue.signature_type,
    "Configuration loaded"
  );

  Ok(config)
}

fn read_config_file(path: &Path) -> Result<BridgeConfig> {
  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  toml::from_str(&content)
    .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Apply `POLYMARKET_*` environment overrides.
fn apply_env_overrides<F>(config: &mut BridgeConfig, env: &F) -> Result<()>
where
  F: Fn(&str) -> Option<String>,
{
  if let Some(url) = env("POLYMARKET_CLOB_URL") {
    config.venue.clob_url = url;
  }
  if let Some(chain_id) = env("POLYMARKET_CHAIN_ID") {
    config.venue.chain_id = chain_id
      .trim()
      .parse()
      .with_context(|| format!("POLYMARKET_CHAIN_ID is not a number: {chain_id}"))?;
  }
  if let Some(sig_type) = env("POLYMARKET_SIGNATURE_TYPE") {
    config.venue.signature_type = sig_type
      .trim()
      .parse()
      .with_context(|| format!("POLYMARKET_SIGNATURE_TYPE is not a number: {sig_type}"))?;
  }
  if let Some(funder) = env("POLYMARKET_FUNDER").filter(|f| !f.trim().is_empty()) {
    config.venue.funder = Some(funder.trim().to_string());
  }
  Ok(())
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - Non-empty endpoint URLs
/// - A chain id with known exchange contracts
/// - A known signature type, with a funder for proxy wallets
/// - A positive request timeout
fn validate_config(config: &BridgeConfig) -> Result<()> {
  let venue = &config.venue;

  anyhow::ensure!(!venue.clob_url.is_empty(), "CLOB API URL must not be empty");
  anyhow::ensure!(
    !venue.data_api_url.is_empty(),
    "Data API URL must not be empty"
  );
  anyhow::ensure!(
    venue.chain_id == POLYGON_CHAIN_ID || venue.chain_id == AMOY_CHAIN_ID,
    "Unsupported chain_id {}, expected {} or {}",
    venue.chain_id,
    POLYGON_CHAIN_ID,
    AMOY_CHAIN_ID
  );
  anyhow::ensure!(
    venue.signature_type <= 2,
    "signature_type must be 0 (EOA), 1 (POLY_PROXY) or 2 (POLY_GNOSIS_SAFE), got {}",
    venue.signature_type
  );
  anyhow::ensure!(
    venue.signature_type == 0 || venue.funder.is_some(),
    "signature_type {} requires a funder address",
    venue.signature_type
  );
  anyhow::ensure!(
    venue.timeout_seconds > 0,
    "timeout_seconds must be positive"
  );

  Ok(())
}
