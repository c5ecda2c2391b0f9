//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interface the dispatcher requires from the outside world.
//! Adapters implement it.
//!
//! Port categories:
//! - `VenueClient`: order book, order submission, account queries via CLOB

pub mod venue;

pub use venue::VenueClient;
