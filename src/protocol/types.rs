//! RESP value types
//!
//! Defines the core data types for the RESP wire protocol

use bytes::Bytes;
use std::fmt;

/// RESP value types
#[derive(Debug, Clone, PartialEq)]
pub enum RespValue {
    /// Simple strings: +OK\r\n
    SimpleString(String),

    /// Errors: -Error message\r\n
    Error(String),

    /// Integers: :+1000\r\n
    Integer(i64),

    /// Bulk strings: $6\r\nfoobar\r\n, or $-1\r\n when null
    BulkString(Option<Bytes>),

    /// Arrays: *2\r\n$3\r\nfoo\r\n$3\r\nbar\r\n
    Array(Vec<RespValue>),

    /// Standalone null: _\r\n (distinct from a null bulk string)
    Null,
}

impl RespValue {
    /// Create a simple string
    pub fn simple_string(s: impl Into<String>) -> Self {
        RespValue::SimpleString(s.into())
    }

    /// Create an error
    pub fn error(s: impl Into<String>) -> Self {
        RespValue::Error(s.into())
    }

    /// Create an integer
    pub fn integer(i: i64) -> Self {
        RespValue::Integer(i)
    }

    /// Create a bulk string from bytes
    pub fn bulk_string(b: impl Into<Bytes>) -> Self {
        RespValue::BulkString(Some(b.into()))
    }

    /// Create a null bulk string
    pub fn null_bulk_string() -> Self {
        RespValue::BulkString(None)
    }

    /// Create an array
    pub fn array(v: Vec<RespValue>) -> Self {
        RespValue::Array(v)
    }

    /// Create a standalone null
    pub fn null() -> Self {
        RespValue::Null
    }
}

impl fmt::Display for RespValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RespValue::SimpleString(s) => write!(f, "SimpleString({})", s),
            RespValue::Error(e) => write!(f, "Error({})", e),
            RespValue::Integer(i) => write!(f, "Integer({})", i),
            RespValue::BulkString(Some(b)) => write!(f, "BulkString({} bytes)", b.len()),
            RespValue::BulkString(None) => write!(f, "BulkString(null)"),
            RespValue::Array(arr) => write!(f, "Array({} elements)", arr.len()),
            RespValue::Null => write!(f, "Null"),
        }
    }
}

/// RESP parsing errors
#[derive(Debug, Clone, PartialEq)]
pub enum RespError {
    /// Incomplete data, need more bytes
    Incomplete,

    /// Input that can never parse as a valid value
    Malformed,
}

impl fmt::Display for RespError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RespError::Incomplete => write!(f, "Incomplete data"),
            RespError::Malformed => write!(f, "Malformed input"),
        }
    }
}

impl std::error::Error for RespError {}
