//! Command model
//!
//! A client request decodes to a RESP array of bulk strings; this module
//! validates that shape and turns it into one of the supported commands.
//! Commands are built once per request and consumed by the dispatcher.

use crate::protocol::RespValue;
use bytes::Bytes;
use std::fmt;

/// The supported commands
#[derive(Debug, PartialEq)]
pub enum Command {
    /// PING [message]
    Ping(Option<Bytes>),

    /// ECHO message
    Echo(Bytes),

    /// SET key value
    ///
    /// The TTL rides along as the raw millisecond argument bytes; the storage
    /// engine parses them.
    Set {
        key: Bytes,
        value: Bytes,
        ttl: Option<Bytes>,
    },

    /// GET key
    Get(Bytes),
}

impl Command {
    /// Extract a command from a decoded request value.
    ///
    /// The value must be a non-empty array whose first element is a non-null
    /// bulk string naming the command (ASCII case-insensitive, exact length).
    /// Every shape mismatch collapses into the same generic failure.
    pub fn from_resp(value: RespValue) -> Result<Command, CommandError> {
        let items = match value {
            RespValue::Array(items) if !items.is_empty() => items,
            _ => return Err(CommandError),
        };

        let mut args = items.into_iter();
        let name = match args.next() {
            Some(RespValue::BulkString(Some(name))) => name,
            _ => return Err(CommandError),
        };

        if name.eq_ignore_ascii_case(b"PING") {
            match args.next() {
                None => Ok(Command::Ping(None)),
                Some(RespValue::BulkString(msg)) => Ok(Command::Ping(msg)),
                Some(_) => Err(CommandError),
            }
        } else if name.eq_ignore_ascii_case(b"ECHO") {
            match args.next() {
                Some(RespValue::BulkString(Some(msg))) => Ok(Command::Echo(msg)),
                _ => Err(CommandError),
            }
        } else if name.eq_ignore_ascii_case(b"SET") {
            let key = match args.next() {
                Some(RespValue::BulkString(Some(key))) => key,
                _ => return Err(CommandError),
            };
            let value = match args.next() {
                Some(RespValue::BulkString(Some(value))) => value,
                _ => return Err(CommandError),
            };

            // TODO: parse the PX option into `ttl` once option syntax lands;
            // until then a fourth argument is rejected
            if args.next().is_some() {
                return Err(CommandError);
            }

            Ok(Command::Set {
                key,
                value,
                ttl: None,
            })
        } else if name.eq_ignore_ascii_case(b"GET") {
            match args.next() {
                Some(RespValue::BulkString(Some(key))) => Ok(Command::Get(key)),
                _ => Err(CommandError),
            }
        } else {
            Err(CommandError)
        }
    }

    /// Canonical command word, for logging
    pub fn name(&self) -> &'static str {
        match self {
            Command::Ping(_) => "PING",
            Command::Echo(_) => "ECHO",
            Command::Set { .. } => "SET",
            Command::Get(_) => "GET",
        }
    }
}

/// Generic extraction failure
///
/// The wire protocol reports every extraction problem the same way, so no
/// per-reason detail is carried.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandError;

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed command")
    }
}

impl std::error::Error for CommandError {}
