//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies.
//!
//! Adapter categories:
//! - `api`: Polymarket CLOB REST API client, auth and order signing

pub mod api;
