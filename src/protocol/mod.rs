//! RESP protocol implementation
//!
//! This module handles parsing and encoding of the Redis Serialization
//! Protocol. It is completely independent from other modules (loose coupling).

mod resp;
mod types;

pub use resp::{RespEncoder, RespParser};
pub use types::{RespError, RespValue};
