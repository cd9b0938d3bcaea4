//! RESP parser and encoder
//!
//! The parser is built from nom streaming combinators over byte slices, so a
//! truncated value reports as incomplete rather than malformed. The encoder
//! renders a RespValue back to its canonical wire bytes.

use super::types::{RespError, RespValue};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use nom::{
    branch::alt,
    bytes::streaming::{tag, take, take_until},
    character::streaming::{digit1, one_of},
    combinator::{map, map_opt, map_res, value},
    multi::count,
    sequence::{delimited, pair, preceded, terminated},
    IResult,
};

const CRLF: &[u8] = b"\r\n";

/// Match the CRLF terminator
fn crlf(input: &[u8]) -> IResult<&[u8], &[u8]> {
    tag(CRLF)(input)
}

/// Take the bytes up to (not including) the next CRLF, consuming the CRLF
fn line(input: &[u8]) -> IResult<&[u8], &[u8]> {
    terminated(take_until(CRLF), crlf)(input)
}

/// A run of one or more ASCII digits folded into a u64; empty runs and
/// overflowing values fail the parse
fn decimal(input: &[u8]) -> IResult<&[u8], u64> {
    map_opt(digit1, |digits: &[u8]| {
        digits.iter().try_fold(0u64, |acc, &d| {
            acc.checked_mul(10)?.checked_add(u64::from(d - b'0'))
        })
    })(input)
}

/// Simple string: +OK\r\n
fn simple_string(input: &[u8]) -> IResult<&[u8], RespValue> {
    map_res(preceded(tag("+"), line), |text: &[u8]| {
        String::from_utf8(text.to_vec()).map(RespValue::SimpleString)
    })(input)
}

/// Simple error: -Error message\r\n
fn simple_error(input: &[u8]) -> IResult<&[u8], RespValue> {
    map_res(preceded(tag("-"), line), |text: &[u8]| {
        String::from_utf8(text.to_vec()).map(RespValue::Error)
    })(input)
}

/// Integer: :+1000\r\n or :-1000\r\n, the sign is mandatory
fn integer(input: &[u8]) -> IResult<&[u8], RespValue> {
    map_opt(
        delimited(tag(":"), pair(one_of("+-"), decimal), crlf),
        |(sign, magnitude)| {
            let magnitude = i64::try_from(magnitude).ok()?;
            Some(RespValue::Integer(if sign == '-' {
                -magnitude
            } else {
                magnitude
            }))
        },
    )(input)
}

/// Bulk string: $6\r\nfoobar\r\n, or the null form $-1\r\n
fn bulk_string(input: &[u8]) -> IResult<&[u8], RespValue> {
    preceded(tag("$"), alt((null_bulk, sized_bulk)))(input)
}

fn null_bulk(input: &[u8]) -> IResult<&[u8], RespValue> {
    value(RespValue::BulkString(None), terminated(tag("-1"), crlf))(input)
}

fn sized_bulk(input: &[u8]) -> IResult<&[u8], RespValue> {
    let (input, len) = terminated(decimal, crlf)(input)?;
    let (input, data) = terminated(take(len as usize), crlf)(input)?;
    Ok((input, RespValue::BulkString(Some(Bytes::copy_from_slice(data)))))
}

/// Array: *2\r\n$3\r\nfoo\r\n$3\r\nbar\r\n, elements decoded recursively;
/// the first failing element aborts the whole array
fn array(input: &[u8]) -> IResult<&[u8], RespValue> {
    let (input, len) = delimited(tag("*"), decimal, crlf)(input)?;
    map(count(element, len as usize), RespValue::Array)(input)
}

/// Standalone null: _\r\n
fn null(input: &[u8]) -> IResult<&[u8], RespValue> {
    value(RespValue::Null, terminated(tag("_"), crlf))(input)
}

/// Any RESP element, first match wins
fn element(input: &[u8]) -> IResult<&[u8], RespValue> {
    alt((simple_string, simple_error, integer, bulk_string, array, null))(input)
}

/// RESP parser
pub struct RespParser;

impl RespParser {
    /// Decode a single element from the input.
    ///
    /// Returns the element and the unconsumed remainder of the input. The
    /// input is never mutated; intermediate slices are views into it.
    pub fn decode(input: &[u8]) -> Result<(RespValue, &[u8]), RespError> {
        match element(input) {
            Ok((rest, value)) => Ok((value, rest)),
            Err(nom::Err::Incomplete(_)) => Err(RespError::Incomplete),
            Err(_) => Err(RespError::Malformed),
        }
    }

    /// Parse one client request from the buffer.
    ///
    /// A request is always an array at the top level. Returns Ok(Some(value))
    /// and consumes its bytes when a complete request is present, Ok(None)
    /// when more data is needed (buffer untouched), Err when the buffer can
    /// never parse as a request.
    pub fn parse_request(buf: &mut BytesMut) -> Result<Option<RespValue>, RespError> {
        let (consumed, request) = match array(buf.as_ref()) {
            Ok((rest, value)) => (buf.len() - rest.len(), value),
            Err(nom::Err::Incomplete(_)) => return Ok(None),
            Err(_) => return Err(RespError::Malformed),
        };

        buf.advance(consumed);
        Ok(Some(request))
    }
}

/// RESP encoder
pub struct RespEncoder;

impl RespEncoder {
    /// Encode a RESP value to bytes
    pub fn encode(value: &RespValue) -> Bytes {
        let mut buf = BytesMut::new();
        Self::encode_to(&mut buf, value);
        buf.freeze()
    }

    /// Encode a RESP value into an existing buffer
    pub fn encode_to(buf: &mut BytesMut, value: &RespValue) {
        match value {
            RespValue::SimpleString(s) => {
                buf.put_u8(b'+');
                buf.put_slice(s.as_bytes());
                buf.put_slice(CRLF);
            }
            RespValue::Error(e) => {
                buf.put_u8(b'-');
                buf.put_slice(e.as_bytes());
                buf.put_slice(CRLF);
            }
            RespValue::Integer(i) => {
                buf.put_u8(b':');
                // the decode grammar requires a sign, so always write one
                if *i >= 0 {
                    buf.put_u8(b'+');
                }
                buf.put_slice(i.to_string().as_bytes());
                buf.put_slice(CRLF);
            }
            RespValue::BulkString(Some(bytes)) => {
                buf.put_u8(b'$');
                buf.put_slice(bytes.len().to_string().as_bytes());
                buf.put_slice(CRLF);
                buf.put_slice(bytes);
                buf.put_slice(CRLF);
            }
            RespValue::BulkString(None) => {
                buf.put_slice(b"$-1\r\n");
            }
            RespValue::Array(arr) => {
                buf.put_u8(b'*');
                buf.put_slice(arr.len().to_string().as_bytes());
                buf.put_slice(CRLF);
                for elem in arr {
                    Self::encode_to(buf, elem);
                }
            }
            RespValue::Null => {
                buf.put_slice(b"_\r\n");
            }
        }
    }
}
