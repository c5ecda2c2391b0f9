//! Polymarket CLOB API Adapter
//!
//! Implements the `VenueClient` port against the Polymarket Central Limit
//! Order Book (CLOB) REST API.
//!
//! Sub-modules:
//! - `auth`: L1 EIP-712 and L2 HMAC request authentication
//! - `client`: HTTP client with error mapping
//! - `orderbook`: Order book and market parameter retrieval
//! - `orders`: Exchange order construction and signing
//! - `types`: API request/response type definitions
//! - `venue`: `ClobVenue`, the port implementation

pub mod auth;
pub mod client;
pub mod orderbook;
pub mod orders;
pub mod types;
pub mod venue;

pub use venue::ClobVenue;
