//! Entry structure for stored values

use bytes::Bytes;
use std::time::{Duration, Instant};

/// A single entry in the store
#[derive(Debug, Clone)]
pub struct Entry {
    /// The stored value
    pub value: Bytes,

    /// Optional expiration time (absolute, monotonic)
    pub expire_at: Option<Instant>,
}

impl Entry {
    /// Create a new entry without expiration
    pub fn new(value: Bytes) -> Self {
        Entry {
            value,
            expire_at: None,
        }
    }

    /// Create a new entry expiring `ttl` from now
    pub fn with_expiration(value: Bytes, ttl: Duration) -> Self {
        Entry {
            value,
            expire_at: Some(Instant::now() + ttl),
        }
    }

    /// Check if the entry has expired
    pub fn is_expired(&self) -> bool {
        match self.expire_at {
            Some(expire_at) => Instant::now() >= expire_at,
            None => false,
        }
    }
}
