//! CLOB HTTP Client - Thin REST Client
//!
//! Wraps reqwest with the configured timeout and maps HTTP failures onto
//! `BridgeError`. Every call is made exactly once: retry policy belongs to
//! the engine that invokes the bridge.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::error::BridgeError;

/// Configuration for the CLOB HTTP client.
#[derive(Debug, Clone)]
pub struct ClobClientConfig {
  /// Base URL for the CLOB API.
  pub base_url: String,
  /// Request timeout.
  pub timeout: Duration,
}

impl Default for ClobClientConfig {
  fn default() -> Self {
    Self {
      base_url: "https://clob.polymarket.com".to_string(),
      timeout: Duration::from_secs(30),
    }
  }
}

/// HTTP client for the Polymarket CLOB REST API.
pub struct ClobClient {
  /// Underlying HTTP client.
  http: Client,
  /// Client configuration.
  config: ClobClientConfig,
}

impl ClobClient {
  /// Create a new CLOB client.
  pub fn new(config: ClobClientConfig) -> Result<Self, BridgeError> {
    let http = Client::builder()
      .timeout(config.timeout)
      .build()
      .map_err(|e| BridgeError::Config(format!("Failed to build HTTP client: {e}")))?;

    let base_url = config.base_url.trim_end_matches('/').to_string();

    Ok(Self {
      http,
      config: ClobClientConfig { base_url, ..config },
    })
  }

  /// Base URL without a trailing slash.
  pub fn base_url(&self) -> &str {
    &self.config.base_url
  }

  /// GET `path` on the CLOB with optional query and auth headers.
  pub async fn get(
    &self,
    path: &str,
    query: &[(&str, String)],
    headers: HeaderMap,
  ) -> Result<Value, BridgeError> {
    let url = format!("{}{}", self.config.base_url, path);
    self.execute(Method::GET, &url, query, None, headers).await
  }

  /// GET an absolute URL (other Polymarket APIs), unauthenticated.
  pub async fn get_url(&self, url: &str, query: &[(&str, String)]) -> Result<Value, BridgeError> {
    self
      .execute(Method::GET, url, query, None, HeaderMap::new())
      .await
  }

  /// POST a JSON body with auth headers.
  pub async fn post(
    &self,
    path: &str,
    body: String,
    headers: HeaderMap,
  ) -> Result<Value, BridgeError> {
    let url = format!("{}{}", self.config.base_url, path);
    self
      .execute(Method::POST, &url, &[], Some(body), headers)
      .await
  }

  /// DELETE with an optional JSON body and auth headers.
  pub async fn delete(
    &self,
    path: &str,
    body: Option<String>,
    headers: HeaderMap,
  ) -> Result<Value, BridgeError> {
    let url = format!("{}{}", self.config.base_url, path);
    self.execute(Method::DELETE, &url, &[], body, headers).await
  }

  /// Send one request and decode the JSON response.
  async fn execute(
    &self,
    method: Method,
    url: &str,
    query: &[(&str, String)],
    body: Option<String>,
    headers: HeaderMap,
  ) -> Result<Value, BridgeError> {
    let mut request = self.http.request(method.clone(), url).headers(headers);

    if !query.is_empty() {
      request = request.query(query);
    }
    if let Some(body) = body {
      request = request
        .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
        .body(body);
    }

    debug!(%method, url, "Sending CLOB request");

    let response = request.send().await.map_err(|e| {
      warn!(error = %e, url, "Request failed");
      BridgeError::from(e)
    })?;

    let status = response.status();
    let text = response.text().await?;

    if status.is_success() {
      if text.trim().is_empty() {
        return Ok(Value::Null);
      }
      return serde_json::from_str(&text).map_err(|e| {
        BridgeError::MalformedResponse(format!("{url} returned invalid JSON: {e}"))
      });
    }

    let message = error_message(&text);
    warn!(status = %status, %message, "CLOB API error");

    match status {
      StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(BridgeError::Auth(message)),
      status => Err(BridgeError::Api {
        status: status.as_u16(),
        message,
      }),
    }
  }
}

/// Extract the venue's error message from an error body.
///
/// Priority: `error`, then `errorMsg`, then `message`, then the raw body.
fn error_message(body: &str) -> String {
  let parsed: Option<Value> = serde_json::from_str(body).ok();
  parsed
    .as_ref()
    .and_then(|v| {
      ["error", "errorMsg", "message"]
        .iter()
        .find_map(|key| v.get(key).and_then(Value::as_str))
        .map(str::to_string)
    })
    .filter(|m| !m.is_empty())
    .unwrap_or_else(|| {
      if body.trim().is_empty() {
        "empty response body".to_string()
      } else {
        body.trim().to_string()
      }
    })
}
