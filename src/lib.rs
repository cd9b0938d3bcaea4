//! EmberKV - a lightweight in-memory key-value server speaking the Redis
//! wire protocol (RESP)
//!
//! The crate is split along the request path:
//! - `protocol` decodes bytes to values and encodes values back to bytes
//! - `commands` extracts a command from a decoded request
//! - `dispatch` executes one command against the storage engine
//! - `store` is the concurrent, TTL-aware storage engine
//! - `server` owns the TCP accept loop and per-connection tasks

pub mod commands;
pub mod dispatch;
pub mod protocol;
pub mod server;
pub mod store;

/// Re-export commonly used types
pub use commands::Command;
pub use dispatch::Dispatcher;
pub use protocol::{RespError, RespValue};
pub use store::{Entry, Storage};
