//! Use Cases Layer - Bridge Operations
//!
//! Orchestrates the venue port to implement the seven bridge commands and
//! normalizes venue responses into the result envelope.
//!
//! - `dispatcher`: command → venue call → envelope
//! - `normalize`: field-priority adapters for loosely-typed responses

pub mod dispatcher;
pub mod normalize;

pub use dispatcher::{Command, Dispatcher};
