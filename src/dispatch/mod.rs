//! Command dispatcher
//!
//! Turns one decoded request into a storage operation and a response value.
//! This is the only path in the system that reads or writes storage.

use crate::commands::Command;
use crate::protocol::RespValue;
use crate::store::Storage;
use std::sync::Arc;
use tracing::{debug, warn};

/// Command dispatcher
///
/// Holds a handle to the shared storage; one dispatcher is constructed per
/// connection at spawn time.
pub struct Dispatcher {
    storage: Arc<Storage>,
}

impl Dispatcher {
    /// Create a dispatcher over the shared storage
    pub fn new(storage: Arc<Storage>) -> Self {
        Dispatcher { storage }
    }

    /// Dispatch a decoded request value.
    ///
    /// Always produces a response: extraction failures get the generic error
    /// reply and the connection stays usable.
    pub async fn dispatch(&self, value: RespValue) -> RespValue {
        let command = match Command::from_resp(value) {
            Ok(command) => command,
            Err(_) => {
                warn!("request did not extract to a command");
                return RespValue::error("server error");
            }
        };

        debug!("dispatching command: {}", command.name());
        self.execute(command).await
    }

    async fn execute(&self, command: Command) -> RespValue {
        match command {
            Command::Ping(None) => RespValue::simple_string("PONG"),
            Command::Ping(Some(msg)) => RespValue::bulk_string(msg),
            Command::Echo(msg) => RespValue::bulk_string(msg),
            Command::Set { key, value, ttl } => {
                if self.storage.set(key, value, ttl).await {
                    RespValue::simple_string("OK")
                } else {
                    // a TTL that fails validation reports as a null bulk
                    // reply, not an error reply
                    RespValue::null_bulk_string()
                }
            }
            Command::Get(key) => match self.storage.get(&key).await {
                Some(value) => RespValue::bulk_string(value),
                None => RespValue::null_bulk_string(),
            },
        }
    }
}
